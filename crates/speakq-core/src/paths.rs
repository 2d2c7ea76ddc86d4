//! Data directory resolution.
//!
//! Resolution order for the data root:
//! 1. `SPEAKQ_DATA_DIR` environment variable (highest priority)
//! 2. System data directory (e.g., `~/.local/share/speakq`)

use std::env;
use std::path::PathBuf;

/// Environment variable that overrides the data root.
pub const DATA_DIR_ENV: &str = "SPEAKQ_DATA_DIR";

const APP_DIR_NAME: &str = "speakq";

/// Errors resolving application directories.
#[derive(Debug, thiserror::Error)]
pub enum PathError {
    /// The platform exposes no data directory and no override was given.
    #[error("Could not determine a data directory; set {DATA_DIR_ENV}")]
    NoDataDir,
}

/// Root directory for speakq data.
pub fn data_root() -> Result<PathBuf, PathError> {
    if let Some(dir) = env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    dirs::data_dir()
        .map(|d| d.join(APP_DIR_NAME))
        .ok_or(PathError::NoDataDir)
}

/// Directory holding the persisted speech cache.
pub fn cache_dir() -> Result<PathBuf, PathError> {
    Ok(data_root()?.join("cache"))
}
