//! Port definitions: the seams between the queue and the outside world.
//!
//! The queue depends only on these traits. Adapter crates implement them:
//!
//! | Port | Adapter |
//! |------|---------|
//! | [`SynthesisBackend`] | `speakq-client` (HTTP) |
//! | [`AudioCache`] | `speakq-cache` (JSON records over a key/value store) |
//! | [`AudioRenderer`] | `speakq-voice` (`rodio`, feature `local-playback`) |
//!
//! All ports are object-safe and `Send + Sync` so they can be shared as
//! `Arc<dyn …>` with the queue's driver task.

mod cache;
mod renderer;
mod synthesis;

pub use cache::AudioCache;
pub use renderer::{AudioRenderer, Playback, PlaybackCompletion};
pub use synthesis::SynthesisBackend;
