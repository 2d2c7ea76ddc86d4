//! Synthesized-audio cache port.

/// Persisted mapping from request text to previously synthesized audio.
///
/// Both operations are infallible from the caller's point of view: a cache
/// that cannot be read behaves as a miss, and a write the underlying storage
/// rejects is dropped.
pub trait AudioCache: Send + Sync {
    /// Audio previously stored for exactly `text`, if any.
    fn lookup(&self, text: &str) -> Option<Vec<u8>>;

    /// Remember `audio` for `text`. Best-effort.
    fn store(&self, text: &str, audio: &[u8]);
}
