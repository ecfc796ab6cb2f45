//! TUI host view: one ratatui list view over a JSON-backed [`TableEngine`].
//!
//! [`TableEngine`]: crate::TableEngine

mod app;
mod event;
mod input;
mod render;
mod state;
mod style;

pub use app::{App, RecordSource};
pub use input::{KeyAction, handle_key};
pub use state::{AppState, InputMode, PopupState};
