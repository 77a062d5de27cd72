//! Error types for landeval.
//!
//! Library crates use [`LandEvalError`] via `thiserror`.
//! The CLI app wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all landeval operations.
#[derive(Debug, thiserror::Error)]
pub enum LandEvalError {
    /// The master dataset file does not exist.
    #[error("master dataset not found at {path}")]
    DatasetNotFound { path: PathBuf },

    /// The dataset is structurally unusable (e.g., identifier column missing).
    #[error("schema error: {message}")]
    Schema { message: String },

    /// The requested identifier does not match any record.
    #[error("no record found for identifier '{id}'")]
    NoMatchingRecord { id: String },

    /// CSV read or write error.
    #[error("csv error: {0}")]
    Csv(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Analysis engine boundary error (spawn, protocol, or execution).
    #[error("engine error: {0}")]
    Engine(String),

    /// Report rendering error (rich path; triggers fallback upstream).
    #[error("render error: {0}")]
    Render(String),

    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Data validation error (selection input, empty dataset, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, LandEvalError>;

impl LandEvalError {
    /// Create a schema error from any displayable message.
    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema {
            message: msg.into(),
        }
    }

    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<csv::Error> for LandEvalError {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = LandEvalError::schema("StockNumber column not found");
        assert_eq!(
            err.to_string(),
            "schema error: StockNumber column not found"
        );

        let err = LandEvalError::NoMatchingRecord { id: "A1".into() };
        assert!(err.to_string().contains("'A1'"));
    }

    #[test]
    fn dataset_not_found_names_path() {
        let err = LandEvalError::DatasetNotFound {
            path: PathBuf::from("database/master.csv"),
        };
        assert!(err.to_string().contains("database/master.csv"));
    }
}
