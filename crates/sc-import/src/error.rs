//! Error types for instrument export imports.

use std::path::PathBuf;

use sc_core::CoreError;
use thiserror::Error;

/// Result type for import operations.
pub type ImportResult<T> = Result<T, ImportError>;

/// Errors that make a whole file unusable.
///
/// Individual bad lines are not errors; they surface as
/// [`MalformedLine`](crate::MalformedLine) warnings.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Failed to read {path}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("No valid data rows in {path}")]
    NoValidRows { path: PathBuf },

    #[error("Imported data from {path} is not a valid series: {source}")]
    InvalidSeries { path: PathBuf, source: CoreError },
}
