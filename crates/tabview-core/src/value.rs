//! Typed cell values and their natural ordering.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;

use crate::fmt::format_value;

/// Declared value type of a column. Selects the comparator used for sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    #[default]
    Text,
    Number,
    Date,
    Bool,
}

impl ValueKind {
    /// Position used when one column yields values of different kinds.
    fn rank(self) -> u8 {
        match self {
            ValueKind::Bool => 0,
            ValueKind::Number => 1,
            ValueKind::Date => 2,
            ValueKind::Text => 3,
        }
    }
}

/// A single attribute value extracted from a record.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Date(DateTime<Utc>),
    Bool(bool),
    /// Missing or null attribute.
    #[default]
    Null,
}

impl CellValue {
    pub fn text(s: impl Into<String>) -> Self {
        CellValue::Text(s.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Kind of a non-null value.
    pub fn kind(&self) -> Option<ValueKind> {
        match self {
            CellValue::Text(_) => Some(ValueKind::Text),
            CellValue::Number(_) => Some(ValueKind::Number),
            CellValue::Date(_) => Some(ValueKind::Date),
            CellValue::Bool(_) => Some(ValueKind::Bool),
            CellValue::Null => None,
        }
    }

    /// Converts to `kind`, the column's declared type. Text is parsed into
    /// numbers, dates and bools; other values render into text. Anything that
    /// does not fit becomes `Null`.
    pub fn into_kind(self, kind: ValueKind) -> CellValue {
        match (kind, self) {
            (_, CellValue::Null) => CellValue::Null,
            (ValueKind::Text, CellValue::Text(s)) => CellValue::Text(s),
            (ValueKind::Text, other) => CellValue::Text(format_value(&other)),
            (ValueKind::Number, CellValue::Number(n)) => CellValue::Number(n),
            (ValueKind::Number, CellValue::Text(s)) => s.trim().parse::<f64>().ok().into(),
            (ValueKind::Date, CellValue::Date(d)) => CellValue::Date(d),
            (ValueKind::Date, CellValue::Text(s)) => parse_date(&s).into(),
            (ValueKind::Bool, CellValue::Bool(b)) => CellValue::Bool(b),
            (ValueKind::Bool, CellValue::Text(s)) => parse_bool(&s).into(),
            _ => CellValue::Null,
        }
    }

    /// Natural ascending order of two values.
    ///
    /// Text compares case-insensitively by code point, numbers with
    /// `f64::total_cmp`, dates by instant and bools as `false < true`.
    /// `Null` is greater than everything so it lands last in ascending order;
    /// callers keep it last for descending order too.
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (CellValue::Null, CellValue::Null) => Ordering::Equal,
            (CellValue::Null, _) => Ordering::Greater,
            (_, CellValue::Null) => Ordering::Less,
            (CellValue::Text(a), CellValue::Text(b)) => compare_text(a, b),
            (CellValue::Number(a), CellValue::Number(b)) => a.total_cmp(b),
            (CellValue::Date(a), CellValue::Date(b)) => a.cmp(b),
            (CellValue::Bool(a), CellValue::Bool(b)) => a.cmp(b),
            (a, b) => {
                // Both non-null here.
                let ra = a.kind().map(ValueKind::rank).unwrap_or(u8::MAX);
                let rb = b.kind().map(ValueKind::rank).unwrap_or(u8::MAX);
                ra.cmp(&rb)
            }
        }
    }
}

/// Parses RFC 3339, `YYYY-MM-DDTHH:MM:SS` (UTC) or `YYYY-MM-DD` (midnight UTC).
pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" => Some(true),
        "false" | "no" => Some(false),
        _ => None,
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<u32> for CellValue {
    fn from(n: u32) -> Self {
        CellValue::Number(f64::from(n))
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<DateTime<Utc>> for CellValue {
    fn from(d: DateTime<Utc>) -> Self {
        CellValue::Date(d)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(CellValue::Null)
    }
}
