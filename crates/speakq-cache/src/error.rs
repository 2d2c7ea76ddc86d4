//! Storage error types.
//!
//! These never escape [`SpeechCache::lookup`](crate::SpeechCache) or
//! [`SpeechCache::store`](crate::SpeechCache): the cache degrades to a miss or
//! a dropped write. They do surface from the maintenance operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors reading or writing persisted character data.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The write would exceed the store's byte quota.
    #[error("Storage quota exceeded: {needed} bytes needed, quota is {quota}")]
    QuotaExceeded {
        /// Total bytes the store would hold after the write.
        needed: u64,
        /// Configured quota.
        quota: u64,
    },

    /// Key contains characters that cannot be used as a storage name.
    #[error("Invalid storage key '{0}'")]
    InvalidKey(String),

    /// Filesystem error.
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Persisted cache data is not a valid record list.
    #[error("Cache data is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
