//! JSON-backed records and view specs.
//!
//! A records file is a JSON array of objects, as returned by a list endpoint.
//! A view spec names the columns to show, their value kinds, and the engine
//! options. Attribute values are coerced to the declared kind; anything that
//! does not fit becomes [`CellValue::Null`].

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use chrono::DateTime;
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::column::ColumnDescriptor;
use crate::engine::TableEngine;
use crate::error::ConfigError;
use crate::options::EngineOptions;
use crate::record::Record;
pub use crate::value::parse_date;
use crate::value::{CellValue, ValueKind};

/// Default attribute holding the record identifier.
pub const DEFAULT_ID_FIELD: &str = "id";

/// Error type for loading records and view specs.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("records must be a JSON array")]
    NotAnArray,
    #[error("record {0} is not a JSON object")]
    NotAnObject(usize),
}

/// One record decoded from JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRecord {
    id: String,
    fields: Map<String, Value>,
}

impl JsonRecord {
    /// Wraps an object. The ID comes from `id_field`, or from the record's
    /// position when that attribute is missing or null.
    pub fn new(position: usize, fields: Map<String, Value>, id_field: &str) -> Self {
        let id = match fields.get(id_field) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => format!("#{position}"),
            Some(other) => other.to_string(),
        };
        Self { id, fields }
    }

    /// Looks up an attribute; dots address nested objects (`"position.title"`).
    pub fn get(&self, key: &str) -> Option<&Value> {
        if let Some(v) = self.fields.get(key) {
            return Some(v);
        }
        let mut parts = key.split('.');
        let mut current = self.fields.get(parts.next()?)?;
        for part in parts {
            current = current.as_object()?.get(part)?;
        }
        Some(current)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl Record for JsonRecord {
    type Id = String;

    fn id(&self) -> String {
        self.id.clone()
    }
}

/// Coerces a JSON attribute to a cell value of `kind`.
///
/// Numbers are epoch seconds in date columns; the rest follows
/// [`CellValue::into_kind`].
pub fn coerce(value: Option<&Value>, kind: ValueKind) -> CellValue {
    let natural = match value {
        None | Some(Value::Null) => CellValue::Null,
        Some(Value::String(s)) => CellValue::Text(s.clone()),
        Some(Value::Bool(b)) => CellValue::Bool(*b),
        Some(Value::Number(n)) => match kind {
            ValueKind::Date => n
                .as_i64()
                .and_then(|secs| DateTime::from_timestamp(secs, 0))
                .into(),
            ValueKind::Text => CellValue::Text(n.to_string()),
            _ => n.as_f64().into(),
        },
        Some(other) => CellValue::Text(other.to_string()),
    };
    natural.into_kind(kind)
}

fn default_true() -> bool {
    true
}

/// Column declaration as written in a view spec.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnSpec {
    pub key: String,
    #[serde(default)]
    pub header: Option<String>,
    #[serde(default)]
    pub kind: ValueKind,
    #[serde(default = "default_true")]
    pub filterable: bool,
    #[serde(default = "default_true")]
    pub sortable: bool,
    #[serde(default)]
    pub hidden: bool,
}

impl ColumnSpec {
    pub fn new(key: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            key: key.into(),
            header: None,
            kind,
            filterable: true,
            sortable: true,
            hidden: false,
        }
    }

    pub fn to_descriptor(&self) -> ColumnDescriptor<JsonRecord> {
        let key = self.key.clone();
        let kind = self.kind;
        let mut col = ColumnDescriptor::new(self.key.clone(), kind, move |r: &JsonRecord| {
            coerce(r.get(&key), kind)
        })
        .with_header(self.header.clone().unwrap_or_else(|| self.key.clone()))
        .with_filterable(self.filterable)
        .with_sortable(self.sortable);
        if self.hidden {
            col = col.hidden();
        }
        col
    }
}

/// Full description of one list view.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViewSpec {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default = "default_id_field")]
    pub id_field: String,
    pub columns: Vec<ColumnSpec>,
    #[serde(default)]
    pub options: EngineOptions,
}

fn default_id_field() -> String {
    DEFAULT_ID_FIELD.to_string()
}

impl ViewSpec {
    /// Derives a spec from the attributes of every record, in order of first
    /// appearance. A column's kind follows the JSON type of its first non-null
    /// value; strings that parse as dates become date columns.
    pub fn infer(records: &[JsonRecord]) -> Self {
        let mut columns: Vec<ColumnSpec> = Vec::new();
        let mut seen: HashMap<&str, usize> = HashMap::new();
        let mut typed: HashSet<usize> = HashSet::new();
        for record in records {
            for (key, value) in record.fields() {
                let pos = *seen.entry(key.as_str()).or_insert_with(|| {
                    columns.push(ColumnSpec::new(key.clone(), ValueKind::Text));
                    columns.len() - 1
                });
                if !value.is_null() && typed.insert(pos) {
                    columns[pos].kind = infer_kind(value);
                }
            }
        }
        Self {
            title: None,
            id_field: default_id_field(),
            columns,
            options: EngineOptions::default(),
        }
    }

    /// Builds a configured engine for this view.
    pub fn build_engine(&self) -> Result<TableEngine<JsonRecord>, ConfigError> {
        let columns = self.columns.iter().map(ColumnSpec::to_descriptor).collect();
        TableEngine::configure(columns, self.options.clone())
    }
}

fn infer_kind(value: &Value) -> ValueKind {
    match value {
        Value::Number(_) => ValueKind::Number,
        Value::Bool(_) => ValueKind::Bool,
        Value::String(s) if parse_date(s).is_some() => ValueKind::Date,
        _ => ValueKind::Text,
    }
}

/// Decodes a JSON array of objects.
pub fn parse_records(content: &str, id_field: &str) -> Result<Vec<JsonRecord>, LoadError> {
    let Value::Array(items) = serde_json::from_str::<Value>(content)? else {
        return Err(LoadError::NotAnArray);
    };
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(fields) => Ok(JsonRecord::new(i, fields, id_field)),
            _ => Err(LoadError::NotAnObject(i)),
        })
        .collect()
}

/// Reads and decodes a records file.
pub fn load_records(path: &Path, id_field: &str) -> Result<Vec<JsonRecord>, LoadError> {
    let content = read(path)?;
    let records = parse_records(&content, id_field)?;
    debug!(path = %path.display(), count = records.len(), "records loaded");
    Ok(records)
}

/// Reads and decodes a view spec file.
pub fn load_view_spec(path: &Path) -> Result<ViewSpec, LoadError> {
    let content = read(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn read(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use std::io::Write;

    const CANDIDATES: &str = r#"[
        {"id": "c-1", "name": "Alice", "age": 30, "applied": "2025-01-10",
         "position": {"title": "Engineer"}, "verified": true},
        {"id": "c-2", "name": "bob", "age": "25", "applied": "2024-12-01T09:30:00Z",
         "position": {"title": "Recruiter"}, "verified": false},
        {"id": "c-3", "name": "Carol", "age": 25, "applied": null,
         "position": {"title": "Engineer"}}
    ]"#;

    #[test]
    fn parse_assigns_ids() {
        let records = parse_records(CANDIDATES, "id").unwrap();
        let ids: Vec<String> = records.iter().map(Record::id).collect();
        assert_eq!(ids, vec!["c-1", "c-2", "c-3"]);

        let records = parse_records(r#"[{"n": 7}, {"id": 12}]"#, "id").unwrap();
        assert_eq!(records[0].id(), "#0");
        assert_eq!(records[1].id(), "12");
    }

    #[test]
    fn parse_rejects_non_arrays() {
        assert!(matches!(
            parse_records(r#"{"id": 1}"#, "id"),
            Err(LoadError::NotAnArray)
        ));
        assert!(matches!(
            parse_records(r#"[{"id": 1}, 2]"#, "id"),
            Err(LoadError::NotAnObject(1))
        ));
        assert!(matches!(parse_records("[", "id"), Err(LoadError::Json(_))));
    }

    #[test]
    fn nested_lookup() {
        let records = parse_records(CANDIDATES, "id").unwrap();
        assert_eq!(records[1].get("position.title"), Some(&json!("Recruiter")));
        assert_eq!(records[1].get("position.missing"), None);
        assert_eq!(records[1].get("name.first"), None);
    }

    #[test]
    fn coercion_by_kind() {
        assert_eq!(
            coerce(Some(&json!("25")), ValueKind::Number),
            CellValue::Number(25.0)
        );
        assert_eq!(coerce(Some(&json!("n/a")), ValueKind::Number), CellValue::Null);
        assert_eq!(coerce(Some(&json!(3)), ValueKind::Text), CellValue::text("3"));
        assert_eq!(coerce(Some(&json!("yes")), ValueKind::Bool), CellValue::Bool(true));
        assert_eq!(coerce(None, ValueKind::Text), CellValue::Null);
        assert_eq!(coerce(Some(&Value::Null), ValueKind::Text), CellValue::Null);
        assert_eq!(
            coerce(Some(&json!("2025-01-10")), ValueKind::Date),
            CellValue::Date(Utc.with_ymd_and_hms(2025, 1, 10, 0, 0, 0).unwrap())
        );
        assert_eq!(
            coerce(Some(&json!("2024-12-01T11:30:00+02:00")), ValueKind::Date),
            CellValue::Date(Utc.with_ymd_and_hms(2024, 12, 1, 9, 30, 0).unwrap())
        );
        assert_eq!(coerce(Some(&json!("soon")), ValueKind::Date), CellValue::Null);
    }

    #[test]
    fn view_spec_drives_engine() {
        let spec: ViewSpec = serde_json::from_value(json!({
            "title": "Candidates",
            "columns": [
                {"key": "name", "header": "Name"},
                {"key": "age", "kind": "number"},
                {"key": "applied", "kind": "date"},
                {"key": "position.title", "header": "Position"},
                {"key": "verified", "kind": "bool", "hidden": true, "filterable": false}
            ],
            "options": {"page_size": 2, "default_sort_column": "age"}
        }))
        .unwrap();

        let mut engine = spec.build_engine().unwrap();
        engine.set_records(parse_records(CANDIDATES, &spec.id_field).unwrap());

        let view = engine.view();
        let ids: Vec<String> = view.rows.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["c-2", "c-3"]);
        assert_eq!(view.total_pages, 2);
        assert_eq!(view.visible_columns.len(), 4);

        engine.set_filter_text("engineer");
        assert_eq!(engine.view().total_filtered, 2);

        engine.set_filter_text("");
        engine.set_sort_column(Some("applied")).unwrap();
        let ids: Vec<String> = engine.view().rows.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["c-2", "c-1"]);
    }

    #[test]
    fn view_spec_rejects_unknown_fields() {
        let err = serde_json::from_value::<ViewSpec>(json!({
            "columns": [{"key": "name", "width": 10}]
        }));
        assert!(err.is_err());
    }

    #[test]
    fn bad_default_sort_is_config_error() {
        let spec: ViewSpec = serde_json::from_value(json!({
            "columns": [{"key": "name"}],
            "options": {"default_sort_column": "salary"}
        }))
        .unwrap();
        assert_eq!(
            spec.build_engine().err(),
            Some(ConfigError::UnknownColumn("salary".into()))
        );
    }

    #[test]
    fn infer_unions_keys_across_records() {
        let records = parse_records(
            r#"[{"id": 1, "name": "Ana", "score": null},
                {"id": 2, "name": "Ben", "score": 12, "referrer": "Dana"}]"#,
            "id",
        )
        .unwrap();
        let spec = ViewSpec::infer(&records);
        let kinds: Vec<(&str, ValueKind)> = spec
            .columns
            .iter()
            .map(|c| (c.key.as_str(), c.kind))
            .collect();
        assert!(kinds.contains(&("referrer", ValueKind::Text)));
        assert!(kinds.contains(&("score", ValueKind::Number)));
        assert_eq!(spec.columns.len(), 4);
    }

    #[test]
    fn infer_kinds_from_values() {
        let records = parse_records(CANDIDATES, "id").unwrap();
        let spec = ViewSpec::infer(&records);
        let kinds: Vec<(&str, ValueKind)> = spec
            .columns
            .iter()
            .map(|c| (c.key.as_str(), c.kind))
            .collect();
        assert!(kinds.contains(&("age", ValueKind::Number)));
        assert!(kinds.contains(&("applied", ValueKind::Date)));
        assert!(kinds.contains(&("verified", ValueKind::Bool)));
        assert!(kinds.contains(&("name", ValueKind::Text)));
        assert!(ViewSpec::infer(&[]).columns.is_empty());
    }

    #[test]
    fn load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("candidates.json");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(CANDIDATES.as_bytes()).unwrap();

        let records = load_records(&path, "id").unwrap();
        assert_eq!(records.len(), 3);

        let missing = load_records(&dir.path().join("nope.json"), "id");
        assert!(matches!(missing, Err(LoadError::Io { .. })));
    }
}
