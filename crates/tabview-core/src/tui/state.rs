//! Host-view state around the engine: input mode, popups, load status.

use serde_json::Value;
use tracing::warn;

use crate::engine::TableEngine;
use crate::json::{JsonRecord, LoadError};

/// Input mode for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Filter,
}

/// Active popup. Only one popup can be open at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PopupState {
    #[default]
    None,
    Help,
    /// Detail of the selected record.
    Detail { scroll: usize },
}

/// Everything the render and input layers share.
pub struct AppState {
    pub title: String,
    pub engine: TableEngine<JsonRecord>,
    pub input_mode: InputMode,
    /// Filter text being edited; applied on every keystroke.
    pub filter_input: String,
    pub popup: PopupState,
    /// No snapshot has been delivered yet.
    pub loading: bool,
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(title: impl Into<String>, engine: TableEngine<JsonRecord>) -> Self {
        Self {
            title: title.into(),
            engine,
            input_mode: InputMode::Normal,
            filter_input: String::new(),
            popup: PopupState::None,
            loading: true,
            status_message: None,
        }
    }

    /// Applies a fetch result. On failure the previous snapshot stays on screen.
    pub fn apply_records(&mut self, result: Result<Vec<JsonRecord>, LoadError>) {
        match result {
            Ok(records) => {
                self.engine.set_records(records);
                self.loading = false;
                self.status_message = None;
            }
            Err(e) => {
                warn!(error = %e, "record refresh failed, keeping previous snapshot");
                self.status_message = Some(format!("Refresh failed: {e}"));
            }
        }
    }

    pub fn filterable_keys(&self) -> Vec<String> {
        self.engine
            .columns()
            .iter()
            .filter(|c| c.is_filterable())
            .map(|c| c.key().to_string())
            .collect()
    }

    /// Pushes `filter_input` into the engine.
    pub fn apply_filter_input(&mut self) {
        self.engine.set_filter_text(self.filter_input.clone());
    }

    /// Cycles the filter column set: all filterable columns, then each one
    /// alone, then back to all. Starts from whatever set the engine holds, so
    /// a configured subset moves on to its next column.
    pub fn cycle_filter_scope(&mut self) {
        let keys = self.filterable_keys();
        let Some(first) = keys.first().cloned() else {
            return;
        };
        let active: Vec<String> = self
            .engine
            .filter_columns()
            .into_iter()
            .map(str::to_string)
            .collect();
        let next = match active.as_slice() {
            [single] if keys.len() > 1 => match keys.iter().position(|k| k == single) {
                Some(i) if i + 1 < keys.len() => vec![keys[i + 1].clone()],
                _ => keys,
            },
            _ => vec![first],
        };
        if let Err(e) = self.engine.set_filter_columns(&next) {
            self.status_message = Some(e.to_string());
        }
    }

    /// Label of the engine's filter column set: `all`, or the headers in use.
    pub fn filter_scope_label(&self) -> String {
        let active = self.engine.filter_columns();
        if active.len() == self.filterable_keys().len() {
            return "all".to_string();
        }
        active
            .iter()
            .filter_map(|k| self.engine.column(k))
            .map(|c| c.header().to_string())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Toggles the visibility of the `n`-th column (1-based, configuration order).
    pub fn toggle_column(&mut self, n: usize) {
        let Some(key) = n
            .checked_sub(1)
            .and_then(|i| self.engine.columns().get(i))
            .map(|c| c.key().to_string())
        else {
            return;
        };
        match self.engine.toggle_visibility(&key) {
            Ok(visible) => {
                self.status_message = Some(format!(
                    "{key} {}",
                    if visible { "shown" } else { "hidden" }
                ))
            }
            Err(e) => self.status_message = Some(e.to_string()),
        }
    }

    /// `key: value` lines for the selected record, in attribute order.
    pub fn detail_lines(&self) -> Vec<String> {
        let Some(record) = self.engine.selected_record() else {
            return vec!["No record selected".to_string()];
        };
        record
            .fields()
            .iter()
            .map(|(k, v)| match v {
                Value::String(s) => format!("{k}: {s}"),
                other => format!("{k}: {other}"),
            })
            .collect()
    }

    pub fn any_popup_open(&self) -> bool {
        self.popup != PopupState::None
    }
}
