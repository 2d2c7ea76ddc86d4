//! Settings domain types and validation.
//!
//! [`SpeechSettings`] is the raw, user-supplied shape (every field optional,
//! camelCase on the wire). It is validated exactly once, at construction, into
//! a [`SpeechConfig`] that the rest of the system trusts.

use serde::{Deserialize, Serialize};

/// Whether synthesized speech is cached when the setting is absent.
pub const DEFAULT_CACHE_SPEECH: bool = true;

/// Output volume when the setting is absent.
pub const DEFAULT_VOLUME: f64 = 1.0;

/// Raw speech settings as provided by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SpeechSettings {
    /// Base URL of the synthesis server. Required.
    pub url: Option<String>,

    /// Serve and store synthesized audio through the local cache.
    pub cache_speech: Option<bool>,

    /// Global output volume (1.0 = unity).
    pub volume: Option<f64>,
}

impl SpeechSettings {
    /// Settings with only the server URL filled in.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }
}

/// Validated configuration consumed by the queue and its adapters.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechConfig {
    /// Server base URL, without a trailing slash.
    pub server_url: String,

    /// Whether the cache-first resolution policy is active.
    pub cache_speech: bool,

    /// Global output volume.
    pub volume: f64,
}

impl SpeechConfig {
    /// Toggle caching.
    #[must_use]
    pub const fn with_cache_speech(mut self, cache_speech: bool) -> Self {
        self.cache_speech = cache_speech;
        self
    }

    /// Override the volume.
    #[must_use]
    pub const fn with_volume(mut self, volume: f64) -> Self {
        self.volume = volume;
        self
    }
}

/// Configuration error. Fatal: construction must not proceed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SettingsError {
    #[error("A valid server url must be provided")]
    MissingUrl,

    #[error("Invalid server url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Volume must be a finite, non-negative number, got {0}")]
    InvalidVolume(f64),
}

/// Validate raw settings and fill in defaults.
///
/// One trailing `/` is stripped from the URL so request paths can be appended
/// verbatim.
pub fn validate_settings(settings: &SpeechSettings) -> Result<SpeechConfig, SettingsError> {
    let raw_url = settings
        .url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or(SettingsError::MissingUrl)?;

    url::Url::parse(raw_url).map_err(|e| SettingsError::InvalidUrl {
        url: raw_url.to_string(),
        reason: e.to_string(),
    })?;

    let server_url = raw_url.strip_suffix('/').unwrap_or(raw_url).to_string();

    let volume = settings.volume.unwrap_or(DEFAULT_VOLUME);
    if !volume.is_finite() || volume < 0.0 {
        return Err(SettingsError::InvalidVolume(volume));
    }

    let config = SpeechConfig {
        server_url,
        cache_speech: settings.cache_speech.unwrap_or(DEFAULT_CACHE_SPEECH),
        volume,
    };
    tracing::debug!(?config, "Speech settings validated");
    Ok(config)
}
