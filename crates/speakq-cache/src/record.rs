//! Persisted cache record layout.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

/// One synthesized utterance as it is persisted.
///
/// The audio bytes are kept as standard (padded) base64 text because the
/// storage layer only accepts character data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheRecord {
    /// Request text the audio was synthesized from.
    #[serde(rename = "Message")]
    pub message: String,

    /// Base64-encoded audio bytes.
    #[serde(rename = "AudioStream")]
    pub audio_stream: String,
}

impl CacheRecord {
    /// Build a record, encoding `audio` for storage.
    pub fn encode(message: impl Into<String>, audio: &[u8]) -> Self {
        Self {
            message: message.into(),
            audio_stream: STANDARD.encode(audio),
        }
    }

    /// Decode the stored audio back into raw bytes.
    pub fn audio(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(&self.audio_stream)
    }
}
