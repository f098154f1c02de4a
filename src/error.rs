//! Error types for Resumen-DB

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Resumen-DB error types
#[derive(Error, Debug)]
pub enum Error {
    /// A metric key was recorded twice without an explicit overwrite
    #[error("metric \"{0}\" already recorded\nUse overwrite_metric() to replace the value for this key")]
    DuplicateMetric(String),

    /// The persisted summary file exists but cannot be parsed as tabular data
    #[error("summary file {path} is malformed: {reason}")]
    MalformedFile {
        /// Path of the offending file
        path: PathBuf,
        /// Parser diagnostic
        reason: String,
    },

    /// Positional row lookup outside the table
    #[error("row index {index} out of range (table has {rows} rows)")]
    RowOutOfRange {
        /// Requested zero-based index
        index: usize,
        /// Current number of rows
        rows: usize,
    },

    /// Storage-level failure (directory resolution, file replacement)
    #[error("storage error: {0}")]
    StorageError(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Arrow error
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}
