//! Derived page of a [`TableEngine`](crate::TableEngine) and UI-agnostic view models.
//!
//! [`TableView`] borrows straight from the engine. [`TableViewModel`] is the
//! rendered form (header strings, cell strings, style classes) with no
//! dependency on a rendering framework; the TUI maps style classes to ratatui
//! styles, a plain-text printer ignores them.

use crate::column::ColumnDescriptor;
use crate::engine::SortState;
use crate::fmt::format_pager;
use crate::record::Record;

/// One page of the filtered, sorted collection plus the state that shaped it.
pub struct TableView<'a, R: Record> {
    pub rows: Vec<&'a R>,
    pub total_filtered: usize,
    pub total_pages: usize,
    pub current_page: usize,
    pub page_size: usize,
    pub visible_columns: Vec<&'a ColumnDescriptor<R>>,
    pub sort: Option<&'a SortState>,
    pub filter_text: &'a str,
    pub selected: Option<&'a R::Id>,
}

impl<R: Record> TableView<'_, R> {
    /// Renders headers and cells of the visible columns.
    pub fn to_view_model(&self, title: impl Into<String>) -> TableViewModel<R::Id> {
        let headers = self
            .visible_columns
            .iter()
            .map(|c| c.header().to_string())
            .collect();

        let sort_column = self.sort.and_then(|s| {
            self.visible_columns
                .iter()
                .position(|c| c.key() == s.column)
        });

        let rows = self
            .rows
            .iter()
            .map(|record| {
                let id = record.id();
                let cells = self
                    .visible_columns
                    .iter()
                    .map(|col| {
                        let value = col.value(record);
                        if value.is_null() {
                            ViewCell::styled(col.render_value(&value), RowStyleClass::Dimmed)
                        } else {
                            ViewCell::plain(col.render_value(&value))
                        }
                    })
                    .collect();
                let style = if self.selected == Some(&id) {
                    RowStyleClass::Selected
                } else {
                    RowStyleClass::Normal
                };
                ViewRow { id, cells, style }
            })
            .collect();

        TableViewModel {
            title: title.into(),
            headers,
            rows,
            sort_column,
            sort_ascending: self.sort.is_none_or(|s| s.direction.is_ascending()),
            pager: format_pager(self.current_page, self.total_pages, self.total_filtered),
        }
    }
}

/// Row-level style classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RowStyleClass {
    #[default]
    Normal,
    /// Currently selected record (TUI: reversed).
    Selected,
    /// Placeholder content such as null cells (TUI: dark gray).
    Dimmed,
}

/// A single table cell with optional per-cell style override.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewCell {
    pub text: String,
    /// `None` = inherit row style.
    pub style: Option<RowStyleClass>,
}

impl ViewCell {
    pub fn plain(text: String) -> Self {
        Self { text, style: None }
    }

    pub fn styled(text: String, style: RowStyleClass) -> Self {
        Self {
            text,
            style: Some(style),
        }
    }
}

/// One table row, parameterized by record ID type.
#[derive(Debug, Clone)]
pub struct ViewRow<Id> {
    pub id: Id,
    pub cells: Vec<ViewCell>,
    pub style: RowStyleClass,
}

/// Complete page ready to be rendered by any frontend.
#[derive(Debug, Clone)]
pub struct TableViewModel<Id> {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<ViewRow<Id>>,
    /// Index into `headers` of the sorted column, if it is visible.
    pub sort_column: Option<usize>,
    pub sort_ascending: bool,
    pub pager: String,
}

impl<Id> TableViewModel<Id> {
    /// Column widths fitting the widest header or cell, capped at `max`.
    pub fn column_widths(&self, max: u16) -> Vec<u16> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                let widest = self
                    .rows
                    .iter()
                    .filter_map(|r| r.cells.get(i))
                    .map(|c| c.text.chars().count())
                    .chain(std::iter::once(h.chars().count() + 1))
                    .max()
                    .unwrap_or(0);
                widest.min(max as usize) as u16
            })
            .collect()
    }
}
