//! Static per-view engine options.

use std::collections::HashMap;

use serde::Deserialize;

use crate::engine::SortDirection;

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Options applied once when a view's engine is configured.
///
/// Every column key named here must exist in the view's column set,
/// otherwise [`TableEngine::configure`](crate::TableEngine::configure) fails.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineOptions {
    /// Rows per page (>= 1).
    pub page_size: usize,
    /// Column sorted on when the view mounts.
    pub default_sort_column: Option<String>,
    pub default_sort_direction: SortDirection,
    /// Initial visibility overrides, keyed by column.
    pub default_visibility: HashMap<String, bool>,
    /// Initial filter column set. `None` means every filterable column.
    pub default_filter_columns: Option<Vec<String>>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            default_sort_column: None,
            default_sort_direction: SortDirection::Ascending,
            default_visibility: HashMap::new(),
            default_filter_columns: None,
        }
    }
}

impl EngineOptions {
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_default_sort(mut self, column: impl Into<String>) -> Self {
        self.default_sort_column = Some(column.into());
        self
    }

    pub fn with_sort_direction(mut self, direction: SortDirection) -> Self {
        self.default_sort_direction = direction;
        self
    }

    pub fn with_visibility(mut self, column: impl Into<String>, visible: bool) -> Self {
        self.default_visibility.insert(column.into(), visible);
        self
    }

    pub fn with_filter_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_filter_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }
}
