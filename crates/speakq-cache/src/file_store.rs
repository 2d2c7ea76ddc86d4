//! File-backed [`KeyValueStore`].
//!
//! Each key is one `<key>.json` file inside the store directory. Writes go to a
//! sibling temp file first and are renamed into place, so a crash mid-write
//! leaves the previous value intact.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{StorageError, StorageResult};
use crate::storage::KeyValueStore;

const VALUE_EXTENSION: &str = "json";
const TEMP_EXTENSION: &str = "json.tmp";

/// Directory-backed store.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    quota_bytes: Option<u64>,
}

impl FileStore {
    /// Store values under `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            quota_bytes: None,
        }
    }

    /// Refuse writes that would grow the directory's values past
    /// `quota_bytes`.
    #[must_use]
    pub const fn with_quota(mut self, quota_bytes: u64) -> Self {
        self.quota_bytes = Some(quota_bytes);
        self
    }

    /// Directory the values live in.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn value_path(&self, key: &str) -> StorageResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.{VALUE_EXTENSION}")))
    }

    /// Bytes held by every value except the one at `exclude`.
    fn used_bytes_excluding(&self, exclude: &Path) -> StorageResult<u64> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(StorageError::io(&self.dir, e)),
        };

        let mut total = 0;
        for entry in entries {
            let entry = entry.map_err(|e| StorageError::io(&self.dir, e))?;
            let path = entry.path();
            if path == exclude || path.extension().and_then(|e| e.to_str()) != Some(VALUE_EXTENSION)
            {
                continue;
            }
            let meta = entry.metadata().map_err(|e| StorageError::io(&path, e))?;
            total += meta.len();
        }
        Ok(total)
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.value_path(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::io(path, e)),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.value_path(key)?;

        if let Some(quota) = self.quota_bytes {
            let needed = self.used_bytes_excluding(&path)? + value.len() as u64;
            if needed > quota {
                return Err(StorageError::QuotaExceeded { needed, quota });
            }
        }

        fs::create_dir_all(&self.dir).map_err(|e| StorageError::io(&self.dir, e))?;

        let tmp = path.with_extension(TEMP_EXTENSION);
        fs::write(&tmp, value).map_err(|e| StorageError::io(&tmp, e))?;
        fs::rename(&tmp, &path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            StorageError::io(&path, e)
        })?;

        tracing::trace!(path = %path.display(), bytes = value.len(), "Stored value");
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        let path = self.value_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::io(path, e)),
        }
    }
}
