//! Speech settlement error types.

/// Why a single request failed to play.
///
/// A `SpeechError` never stops the queue: the request is dropped and the next
/// backlog entry is promoted. It is only surfaced to the request's own caller
/// (through its `SpeechHandle`) and to the event stream.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpeechError {
    /// The synthesis call failed (network error or non-ok response).
    #[error("Speech synthesis failed: {0}")]
    Synthesis(String),

    /// The audio bytes could not be decoded into a playable buffer.
    #[error("Failed to decode audio: {0}")]
    Decode(String),

    /// The audio output device or sink could not be opened.
    #[error("Failed to open audio output: {0}")]
    Output(String),

    /// The dedicated audio thread is gone.
    #[error("Audio thread died unexpectedly")]
    AudioThreadDied,

    /// The request was discarded or aborted by `shut_up`.
    #[error("Speech interrupted")]
    Interrupted,
}

impl SpeechError {
    /// Whether the failure came from a `shut_up` rather than a real fault.
    #[must_use]
    pub const fn is_interrupted(&self) -> bool {
        matches!(self, Self::Interrupted)
    }
}
