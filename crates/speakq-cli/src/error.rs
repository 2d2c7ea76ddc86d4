//! CLI-specific error types and exit-code mapping.

use std::path::PathBuf;

use speakq_cache::StorageError;
use speakq_client::ClientError;
use speakq_core::{PathError, SettingsError, SpeechError};
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Speech settings failed validation.
    #[error("Configuration error: {0}")]
    Settings(#[from] SettingsError),

    /// No data directory could be determined for the cache.
    #[error("Configuration error: {0}")]
    Path(#[from] PathError),

    /// The speech cache could not be read or written.
    #[error("Cache error: {0}")]
    Storage(#[from] StorageError),

    /// The synthesis client could not be built.
    #[error("Synthesis client error: {0}")]
    Client(#[from] ClientError),

    /// A request could not be resolved or played.
    #[error("{0}")]
    Speech(#[from] SpeechError),

    /// Writing an output file failed.
    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// This build has no audio output.
    #[error("Playback is not available in this build; rebuild with --features local-playback")]
    PlaybackUnavailable,
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow sysexits.h where one fits.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Settings(_) | Self::Path(_) => 78, // EX_CONFIG
            Self::Storage(_) | Self::Io { .. } => 74, // EX_IOERR
            Self::Client(_) | Self::Speech(_) => 69, // EX_UNAVAILABLE
            Self::PlaybackUnavailable => 70,         // EX_SOFTWARE
        }
    }
}
