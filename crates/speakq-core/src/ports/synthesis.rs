//! Speech synthesis port.

use async_trait::async_trait;

use crate::error::SpeechError;

/// Converts text into encoded audio bytes, usually over the network.
///
/// The queue treats this as an opaque, possibly slow call. No timeout is
/// imposed on it: a call that never returns stalls the queue.
#[async_trait]
pub trait SynthesisBackend: Send + Sync {
    /// Synthesize `text`, returning the raw audio bytes (e.g. a WAV file).
    ///
    /// Failures should be reported as [`SpeechError::Synthesis`] with enough
    /// detail (status, server message) to diagnose them from the logs.
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError>;
}
