//! Generic table engine: filtering, sorting, column visibility, paging and
//! selection over a snapshot of records.
//!
//! The displayed page is always `paginate(sort(filter(records)))`. Every
//! state-mutating call recomputes the filtered+sorted index order right away,
//! so [`TableEngine::view`] is a pure slice of already-derived state and can be
//! called any number of times.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use serde::Deserialize;
use tracing::{debug, trace};

use crate::column::ColumnDescriptor;
use crate::error::ConfigError;
use crate::options::EngineOptions;
use crate::record::Record;
use crate::value::CellValue;
use crate::view::TableView;

/// Sort direction for the active sort column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn is_ascending(self) -> bool {
        self == SortDirection::Ascending
    }
}

/// The single active sort column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    pub column: String,
    pub direction: SortDirection,
}

/// Client-side table state for one list view.
///
/// Owns the current record snapshot; filter, sort and page operations never
/// modify it, they only reorder the derived index list.
pub struct TableEngine<R: Record> {
    columns: Vec<ColumnDescriptor<R>>,
    /// Column key -> position in `columns`.
    index: HashMap<String, usize>,
    initial_visibility: HashMap<String, bool>,
    records: Vec<R>,
    filter_text: String,
    /// Positions in `columns`, in configuration order.
    filter_columns: Vec<usize>,
    sort: Option<SortState>,
    visibility: HashMap<String, bool>,
    page: usize,
    page_size: usize,
    /// Record indices after filter and sort.
    derived: Vec<usize>,
    /// Tracked record ID; follows the record across sort/filter/page changes.
    selected: Option<R::Id>,
}

impl<R: Record> TableEngine<R> {
    /// Validates the column set and options and builds a fresh engine with
    /// no records, empty filter and page 0.
    pub fn configure(
        columns: Vec<ColumnDescriptor<R>>,
        options: EngineOptions,
    ) -> Result<Self, ConfigError> {
        if options.page_size == 0 {
            return Err(ConfigError::InvalidPageSize);
        }

        let mut index = HashMap::with_capacity(columns.len());
        for (i, col) in columns.iter().enumerate() {
            if index.insert(col.key().to_string(), i).is_some() {
                return Err(ConfigError::DuplicateColumn(col.key().to_string()));
            }
        }

        let sort = match options.default_sort_column {
            Some(key) => {
                let pos = lookup(&index, &key)?;
                if !columns[pos].is_sortable() {
                    return Err(ConfigError::NotSortable(key));
                }
                Some(SortState {
                    column: key,
                    direction: options.default_sort_direction,
                })
            }
            None => None,
        };

        for key in options.default_visibility.keys() {
            lookup(&index, key)?;
        }

        let filter_columns = match &options.default_filter_columns {
            Some(keys) => resolve_filter_columns(&columns, &index, keys)?,
            None => columns
                .iter()
                .enumerate()
                .filter(|(_, c)| c.is_filterable())
                .map(|(i, _)| i)
                .collect(),
        };

        debug!(
            columns = columns.len(),
            page_size = options.page_size,
            sort = ?sort.as_ref().map(|s| s.column.as_str()),
            "table engine configured"
        );

        Ok(Self {
            columns,
            index,
            initial_visibility: options.default_visibility.clone(),
            records: Vec::new(),
            filter_text: String::new(),
            filter_columns,
            sort,
            visibility: options.default_visibility,
            page: 0,
            page_size: options.page_size,
            derived: Vec::new(),
            selected: None,
        })
    }

    // -----------------------------------------------------------------------
    // Records
    // -----------------------------------------------------------------------

    /// Replaces the record snapshot. Filter and sort state are kept; the page
    /// index is re-clamped against the new filtered count.
    pub fn set_records(&mut self, records: Vec<R>) {
        self.records = records;
        self.refresh();
        debug!(
            records = self.records.len(),
            filtered = self.derived.len(),
            page = self.page,
            "records replaced"
        );
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    // -----------------------------------------------------------------------
    // Filter
    // -----------------------------------------------------------------------

    /// Sets the filter text and returns to the first page.
    pub fn set_filter_text(&mut self, text: impl Into<String>) {
        self.filter_text = text.into();
        self.page = 0;
        self.refresh();
    }

    /// Sets the columns the filter text is matched against and returns to the
    /// first page. Duplicate keys are ignored.
    pub fn set_filter_columns<I, S>(&mut self, keys: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keys: Vec<S> = keys.into_iter().collect();
        self.filter_columns = resolve_filter_columns(&self.columns, &self.index, &keys)?;
        self.page = 0;
        self.refresh();
        Ok(())
    }

    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    /// Keys of the active filter columns.
    pub fn filter_columns(&self) -> Vec<&str> {
        self.filter_columns
            .iter()
            .map(|&i| self.columns[i].key())
            .collect()
    }

    // -----------------------------------------------------------------------
    // Sort
    // -----------------------------------------------------------------------

    /// Sets or clears the sort column. A different column replaces the prior
    /// one and starts ascending; re-selecting the active column keeps its
    /// direction. `None` restores snapshot order. The page index is kept
    /// (clamped), not reset.
    pub fn set_sort_column(&mut self, key: Option<&str>) -> Result<(), ConfigError> {
        self.sort = match key {
            None => None,
            Some(key) => {
                let pos = lookup(&self.index, key)?;
                if !self.columns[pos].is_sortable() {
                    return Err(ConfigError::NotSortable(key.to_string()));
                }
                match self.sort.take() {
                    Some(current) if current.column == key => Some(current),
                    _ => Some(SortState {
                        column: key.to_string(),
                        direction: SortDirection::Ascending,
                    }),
                }
            }
        };
        self.refresh();
        Ok(())
    }

    /// Flips the direction of the active sort. No-op when unsorted.
    pub fn toggle_sort_direction(&mut self) {
        if let Some(sort) = self.sort.as_mut() {
            sort.direction = sort.direction.toggled();
            self.refresh();
        }
    }

    /// Moves the sort to the next sortable column in column order; after the
    /// last one sorting is cleared, and from unsorted the first one is picked.
    pub fn cycle_sort_column(&mut self) {
        let start = match &self.sort {
            Some(sort) => self.index[&sort.column] + 1,
            None => 0,
        };
        let next = self.columns[start.min(self.columns.len())..]
            .iter()
            .find(|c| c.is_sortable())
            .map(|c| c.key().to_string());
        self.sort = next.map(|column| SortState {
            column,
            direction: SortDirection::Ascending,
        });
        self.refresh();
    }

    pub fn sort(&self) -> Option<&SortState> {
        self.sort.as_ref()
    }

    // -----------------------------------------------------------------------
    // Visibility
    // -----------------------------------------------------------------------

    /// Shows or hides a column. Rendering only; filter and sort keep using it.
    pub fn set_visibility(&mut self, key: &str, visible: bool) -> Result<(), ConfigError> {
        lookup(&self.index, key)?;
        self.visibility.insert(key.to_string(), visible);
        Ok(())
    }

    /// Flips a column's visibility and returns the new state.
    pub fn toggle_visibility(&mut self, key: &str) -> Result<bool, ConfigError> {
        let visible = !self.is_visible(key)?;
        self.visibility.insert(key.to_string(), visible);
        Ok(visible)
    }

    /// Restores the visibility configured at setup.
    pub fn reset_visibility(&mut self) {
        self.visibility = self.initial_visibility.clone();
    }

    pub fn is_visible(&self, key: &str) -> Result<bool, ConfigError> {
        let pos = lookup(&self.index, key)?;
        Ok(self.column_visible(&self.columns[pos]))
    }

    fn column_visible(&self, col: &ColumnDescriptor<R>) -> bool {
        self.visibility
            .get(col.key())
            .copied()
            .unwrap_or(!col.is_hidden_by_default())
    }

    // -----------------------------------------------------------------------
    // Paging
    // -----------------------------------------------------------------------

    /// Sets the page index, clamped into range.
    pub fn set_page(&mut self, page: usize) {
        self.page = page;
        self.clamp_page();
    }

    pub fn next_page(&mut self) {
        self.set_page(self.page.saturating_add(1));
    }

    pub fn prev_page(&mut self) {
        self.set_page(self.page.saturating_sub(1));
    }

    pub fn first_page(&mut self) {
        self.page = 0;
    }

    pub fn last_page(&mut self) {
        self.set_page(usize::MAX);
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// `ceil(filtered / page_size)`, 0 when nothing matches.
    pub fn total_pages(&self) -> usize {
        self.derived.len().div_ceil(self.page_size)
    }

    fn clamp_page(&mut self) {
        let pages = self.total_pages();
        self.page = if pages == 0 {
            0
        } else {
            self.page.min(pages - 1)
        };
    }

    // -----------------------------------------------------------------------
    // Selection
    // -----------------------------------------------------------------------

    /// Selects the record with `id` if it is in the filtered set, moving to
    /// the page that shows it. Returns whether the selection took.
    pub fn select(&mut self, id: &R::Id) -> bool {
        match self.position_of(id) {
            Some(pos) => {
                self.selected = Some(id.clone());
                self.page = pos / self.page_size;
                true
            }
            None => false,
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Moves the selection one row down (across page boundaries).
    /// With nothing selected, selects the first row of the current page.
    pub fn select_next(&mut self) {
        self.step_selection(1);
    }

    /// Moves the selection one row up (across page boundaries).
    pub fn select_prev(&mut self) {
        self.step_selection(-1);
    }

    fn step_selection(&mut self, delta: isize) {
        if self.derived.is_empty() {
            return;
        }
        let target = match self.selected.as_ref().and_then(|id| self.position_of(id)) {
            Some(pos) => pos
                .saturating_add_signed(delta)
                .min(self.derived.len() - 1),
            None => (self.page * self.page_size).min(self.derived.len() - 1),
        };
        let id = self.records[self.derived[target]].id();
        self.select(&id);
    }

    pub fn selected(&self) -> Option<&R::Id> {
        self.selected.as_ref()
    }

    pub fn selected_record(&self) -> Option<&R> {
        let id = self.selected.as_ref()?;
        self.position_of(id).map(|pos| &self.records[self.derived[pos]])
    }

    fn position_of(&self, id: &R::Id) -> Option<usize> {
        self.derived
            .iter()
            .position(|&i| self.records[i].id() == *id)
    }

    // -----------------------------------------------------------------------
    // Columns
    // -----------------------------------------------------------------------

    pub fn columns(&self) -> &[ColumnDescriptor<R>] {
        &self.columns
    }

    pub fn column(&self, key: &str) -> Option<&ColumnDescriptor<R>> {
        self.index.get(key).map(|&i| &self.columns[i])
    }

    // -----------------------------------------------------------------------
    // Derivation
    // -----------------------------------------------------------------------

    /// Current page and everything needed to render it. Pure.
    pub fn view(&self) -> TableView<'_, R> {
        let total = self.derived.len();
        let start = (self.page * self.page_size).min(total);
        let end = (start + self.page_size).min(total);
        TableView {
            rows: self.derived[start..end]
                .iter()
                .map(|&i| &self.records[i])
                .collect(),
            total_filtered: total,
            total_pages: self.total_pages(),
            current_page: self.page,
            page_size: self.page_size,
            visible_columns: self
                .columns
                .iter()
                .filter(|c| self.column_visible(c))
                .collect(),
            sort: self.sort.as_ref(),
            filter_text: &self.filter_text,
            selected: self.selected.as_ref(),
        }
    }

    /// Recomputes the filtered+sorted order, clamps the page and drops a
    /// selection that is no longer in the filtered set.
    fn refresh(&mut self) {
        let needle = self.filter_text.to_lowercase();
        let mut derived: Vec<usize> = (0..self.records.len())
            .filter(|&i| {
                needle.is_empty()
                    || self
                        .filter_columns
                        .iter()
                        .any(|&c| self.columns[c].matches(&self.records[i], &needle))
            })
            .collect();

        if let Some(sort) = &self.sort {
            let col = &self.columns[self.index[&sort.column]];
            let mut keyed: Vec<(usize, CellValue)> = derived
                .iter()
                .map(|&i| (i, col.value(&self.records[i])))
                .collect();
            // Stable: ties keep snapshot order.
            keyed.sort_by(|(_, a), (_, b)| compare_directed(a, b, sort.direction));
            derived = keyed.into_iter().map(|(i, _)| i).collect();
        }

        self.derived = derived;
        self.clamp_page();

        let stale = self
            .selected
            .as_ref()
            .is_some_and(|id| self.position_of(id).is_none());
        if stale {
            self.selected = None;
        }

        trace!(
            filtered = self.derived.len(),
            page = self.page,
            "view derived"
        );
    }
}

/// Orders two values in `direction`, keeping nulls last either way.
fn compare_directed(a: &CellValue, b: &CellValue, direction: SortDirection) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => match direction {
            SortDirection::Ascending => a.compare(b),
            SortDirection::Descending => a.compare(b).reverse(),
        },
    }
}

fn lookup(index: &HashMap<String, usize>, key: &str) -> Result<usize, ConfigError> {
    index
        .get(key)
        .copied()
        .ok_or_else(|| ConfigError::UnknownColumn(key.to_string()))
}

fn resolve_filter_columns<R, S: AsRef<str>>(
    columns: &[ColumnDescriptor<R>],
    index: &HashMap<String, usize>,
    keys: &[S],
) -> Result<Vec<usize>, ConfigError> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(keys.len());
    for key in keys {
        let key = key.as_ref();
        let pos = lookup(index, key)?;
        if !columns[pos].is_filterable() {
            return Err(ConfigError::NotFilterable(key.to_string()));
        }
        if seen.insert(pos) {
            out.push(pos);
        }
    }
    out.sort_unstable();
    Ok(out)
}
