#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

mod cache;
mod error;
mod file_store;
mod record;
mod storage;

// ============================================================================
// Public API
// ============================================================================

pub use cache::{CacheStats, DEFAULT_CACHE_KEY, SpeechCache};
pub use error::{StorageError, StorageResult};
pub use file_store::FileStore;
pub use record::CacheRecord;
pub use storage::{KeyValueStore, MemoryStore};

// Silence unused dev-dependency warnings (used by tests/ only)
#[cfg(test)]
use tempfile as _;
