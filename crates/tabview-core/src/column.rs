//! Column descriptors: how one field is extracted, displayed, filtered and sorted.

use std::fmt;

use crate::fmt::format_value;
use crate::value::{CellValue, ValueKind};

type Accessor<R> = Box<dyn Fn(&R) -> CellValue>;
type Renderer = Box<dyn Fn(&CellValue) -> String>;

/// Static definition of one table column.
pub struct ColumnDescriptor<R> {
    key: String,
    header: String,
    kind: ValueKind,
    accessor: Accessor<R>,
    renderer: Option<Renderer>,
    filterable: bool,
    sortable: bool,
    hidden: bool,
}

impl<R> ColumnDescriptor<R> {
    /// Creates a visible, filterable, sortable column.
    ///
    /// The header defaults to the key; `accessor` may compute a synthetic
    /// value that is not a stored attribute.
    pub fn new(
        key: impl Into<String>,
        kind: ValueKind,
        accessor: impl Fn(&R) -> CellValue + 'static,
    ) -> Self {
        let key = key.into();
        Self {
            header: key.clone(),
            key,
            kind,
            accessor: Box::new(accessor),
            renderer: None,
            filterable: true,
            sortable: true,
            hidden: false,
        }
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    /// Overrides the display rendering. Filtering matches this output too.
    pub fn with_renderer(mut self, renderer: impl Fn(&CellValue) -> String + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    pub fn with_filterable(mut self, filterable: bool) -> Self {
        self.filterable = filterable;
        self
    }

    pub fn with_sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    /// Hidden by default; can still be shown through visibility toggles.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn is_filterable(&self) -> bool {
        self.filterable
    }

    pub fn is_sortable(&self) -> bool {
        self.sortable
    }

    pub fn is_hidden_by_default(&self) -> bool {
        self.hidden
    }

    /// Extracts this column's value from a record, converted to the
    /// column's kind so sorting and rendering follow the declared type.
    pub fn value(&self, record: &R) -> CellValue {
        (self.accessor)(record).into_kind(self.kind)
    }

    /// Renders a value the way this column displays it.
    pub fn render_value(&self, value: &CellValue) -> String {
        match &self.renderer {
            Some(render) => render(value),
            None => format_value(value),
        }
    }

    /// Extracts and renders in one step.
    pub fn render(&self, record: &R) -> String {
        self.render_value(&self.value(record))
    }

    /// Case-insensitive substring match of the rendered value.
    ///
    /// `needle` must already be lowercased. Null values never match.
    pub(crate) fn matches(&self, record: &R, needle: &str) -> bool {
        let value = self.value(record);
        if value.is_null() {
            return false;
        }
        self.render_value(&value).to_lowercase().contains(needle)
    }
}

impl<R> fmt::Debug for ColumnDescriptor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDescriptor")
            .field("key", &self.key)
            .field("header", &self.header)
            .field("kind", &self.kind)
            .field("filterable", &self.filterable)
            .field("sortable", &self.sortable)
            .field("hidden", &self.hidden)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Candidate {
        name: String,
        score: Option<f64>,
    }

    fn name_column() -> ColumnDescriptor<Candidate> {
        ColumnDescriptor::new("name", ValueKind::Text, |c: &Candidate| {
            CellValue::text(c.name.clone())
        })
    }

    #[test]
    fn defaults() {
        let col = name_column();
        assert_eq!(col.header(), "name");
        assert!(col.is_filterable());
        assert!(col.is_sortable());
        assert!(!col.is_hidden_by_default());
    }

    #[test]
    fn custom_renderer_drives_matching() {
        let col = ColumnDescriptor::new("score", ValueKind::Number, |c: &Candidate| {
            CellValue::from(c.score)
        })
        .with_renderer(|v| match v {
            CellValue::Number(n) => format!("{n:.0} pts"),
            _ => String::new(),
        });
        let c = Candidate {
            name: "Dana".into(),
            score: Some(87.0),
        };
        assert_eq!(col.render(&c), "87 pts");
        assert!(col.matches(&c, "pts"));
    }

    #[test]
    fn null_never_matches() {
        let col = ColumnDescriptor::new("score", ValueKind::Number, |c: &Candidate| {
            CellValue::from(c.score)
        });
        let c = Candidate {
            name: "Eve".into(),
            score: None,
        };
        assert!(!col.matches(&c, "-"));
        assert!(!col.matches(&c, ""));
    }

    #[test]
    fn matching_ignores_case() {
        let c = Candidate {
            name: "Bob".into(),
            score: None,
        };
        assert!(name_column().matches(&c, "bo"));
        assert!(!name_column().matches(&c, "al"));
    }
}
