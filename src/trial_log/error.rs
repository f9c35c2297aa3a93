//! Trial log export errors.

use std::path::PathBuf;
use thiserror::Error;

/// Export was requested before any trial was logged.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("no trials have been logged yet")]
pub struct EmptyLogError;

/// Errors that can occur while exporting the trial log.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Empty(#[from] EmptyLogError),

    /// Serialization to JSON failed
    #[error("failed to serialize trial log: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
