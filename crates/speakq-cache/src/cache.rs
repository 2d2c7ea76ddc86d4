//! [`SpeechCache`]: the `AudioCache` adapter.
//!
//! The whole cache is one JSON array stored under a single key. Every lookup
//! reads and scans it front to back; every store appends one record and
//! rewrites it. Duplicates are kept, and the first matching record wins.

use std::collections::HashSet;

use serde::Serialize;
use speakq_core::AudioCache;

use crate::error::StorageResult;
use crate::record::CacheRecord;
use crate::storage::KeyValueStore;

/// Storage key the record list is kept under unless overridden.
pub const DEFAULT_CACHE_KEY: &str = "speech_dictionary";

/// Summary of what the cache holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of records, duplicates included.
    pub entries: usize,
    /// Number of distinct texts.
    pub distinct_texts: usize,
    /// Decoded audio bytes across all records.
    pub audio_bytes: u64,
}

/// Text → audio cache persisted through a [`KeyValueStore`].
#[derive(Debug)]
pub struct SpeechCache<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> SpeechCache<S> {
    /// Cache records in `store` under [`DEFAULT_CACHE_KEY`].
    pub fn new(store: S) -> Self {
        Self {
            store,
            key: DEFAULT_CACHE_KEY.to_string(),
        }
    }

    /// Use a different storage key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// The underlying store.
    pub const fn backing_store(&self) -> &S {
        &self.store
    }

    /// All persisted records, in insertion order.
    ///
    /// An absent entry is an empty cache; an unparsable one is an error.
    pub fn records(&self) -> StorageResult<Vec<CacheRecord>> {
        match self.store.get_item(&self.key)? {
            None => Ok(Vec::new()),
            Some(raw) => Ok(serde_json::from_str(&raw)?),
        }
    }

    /// Count records, distinct texts and audio bytes.
    pub fn stats(&self) -> StorageResult<CacheStats> {
        let records = self.records()?;
        let distinct_texts = records
            .iter()
            .map(|r| r.message.as_str())
            .collect::<HashSet<_>>()
            .len();
        let audio_bytes = records
            .iter()
            .filter_map(|r| r.audio().ok())
            .map(|a| a.len() as u64)
            .sum();
        Ok(CacheStats {
            entries: records.len(),
            distinct_texts,
            audio_bytes,
        })
    }

    /// Drop every record.
    pub fn clear(&self) -> StorageResult<()> {
        self.store.remove_item(&self.key)?;
        tracing::info!(key = %self.key, "Speech cache cleared");
        Ok(())
    }

    fn append(&self, text: &str, audio: &[u8]) -> StorageResult<()> {
        let mut records = self.records()?;
        records.push(CacheRecord::encode(text, audio));
        let raw = serde_json::to_string(&records)?;
        self.store.set_item(&self.key, &raw)
    }
}

impl<S: KeyValueStore> AudioCache for SpeechCache<S> {
    fn lookup(&self, text: &str) -> Option<Vec<u8>> {
        let records = match self.records() {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(error = %e, "Speech cache unreadable, treating as miss");
                return None;
            }
        };

        let record = records.iter().find(|r| r.message == text)?;
        match record.audio() {
            Ok(audio) => {
                tracing::debug!(text_len = text.len(), bytes = audio.len(), "Speech cache hit");
                Some(audio)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Cached audio is not valid base64, treating as miss");
                None
            }
        }
    }

    fn store(&self, text: &str, audio: &[u8]) {
        match self.append(text, audio) {
            Ok(()) => {
                tracing::debug!(text_len = text.len(), bytes = audio.len(), "Stored speech in cache");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to cache speech, continuing without it");
            }
        }
    }
}
