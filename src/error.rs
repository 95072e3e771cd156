//! Error types for the task core.
//!
//! - `MutationError`: a rejected create/update/delete/toggle; the collection
//!   is left unchanged.
//! - `StorageError`: key-value store read/write failures. Never fatal; the
//!   session keeps running in memory.

use std::path::PathBuf;
use thiserror::Error;

use crate::models::TaskId;
pub use crate::models::ValidationError;

pub type StorageResult<T> = std::result::Result<T, StorageError>;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Corrupt data under key '{key}': {reason}")]
    Corrupt { key: String, reason: String },

    #[error("Invalid storage key '{0}'")]
    InvalidKey(String),
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MutationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Task not found: {0}")]
    NotFound(TaskId),

    #[error("Task id already in use: {0}")]
    DuplicateId(TaskId),
}
