//! tabview-core: client-side tabular data engine.
//!
//! Provides:
//! - `engine`: [`TableEngine`]: filtering, sorting, column visibility, paging
//! - `column` / `value`: typed column descriptors and cell values
//! - `view`: the derived page ([`TableView`]) and UI-agnostic view models
//! - `fmt`: shared formatting helpers for cell values
//!
//! With `json` feature (default):
//! - `json`: JSON-backed records and view specs loaded from disk
//!
//! With `tui` feature:
//! - `tui`: ratatui host view over a JSON-backed engine

pub mod column;
pub mod engine;
pub mod error;
pub mod fmt;
pub mod options;
pub mod record;
pub mod value;
pub mod view;

#[cfg(feature = "json")]
pub mod json;

#[cfg(feature = "tui")]
pub mod tui;

pub use column::ColumnDescriptor;
pub use engine::{SortDirection, SortState, TableEngine};
pub use error::ConfigError;
pub use options::EngineOptions;
pub use record::Record;
pub use value::{CellValue, ValueKind};
pub use view::{TableView, TableViewModel};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
