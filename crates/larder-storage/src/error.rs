use std::path::PathBuf;

use larder_core::error::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("corrupt data file {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error("invalid image reference: {0}")]
    InvalidReference(String),
}

impl StorageError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] CoreError),

    #[error("recipe not found: {id}")]
    NotFound { id: String },

    #[error("failed to persist recipes: {0}")]
    Persistence(#[source] StorageError),

    #[error("image storage error: {0}")]
    Image(#[source] StorageError),
}

impl StoreError {
    pub fn not_found(id: &str) -> Self {
        StoreError::NotFound { id: id.to_string() }
    }
}
