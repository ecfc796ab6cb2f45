//! Configuration errors raised while setting up or driving a [`TableEngine`].
//!
//! These are development-time failures: a view referenced a column key that
//! its own column set does not define. Record data never produces an error.
//!
//! [`TableEngine`]: crate::TableEngine

use thiserror::Error;

/// Error type for malformed table configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A key was referenced that no configured column defines.
    #[error("unknown column '{0}'")]
    UnknownColumn(String),
    /// Two columns were configured with the same key.
    #[error("duplicate column '{0}'")]
    DuplicateColumn(String),
    /// Page size must be at least one row.
    #[error("page size must be at least 1")]
    InvalidPageSize,
    /// The column exists but was declared non-sortable.
    #[error("column '{0}' is not sortable")]
    NotSortable(String),
    /// The column exists but was declared non-filterable.
    #[error("column '{0}' does not participate in filtering")]
    NotFilterable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_column() {
        assert_eq!(
            ConfigError::UnknownColumn("age".into()).to_string(),
            "unknown column 'age'"
        );
        assert_eq!(
            ConfigError::NotSortable("photo".into()).to_string(),
            "column 'photo' is not sortable"
        );
    }
}
