#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod queue;
pub mod resolver;

#[cfg(feature = "local-playback")]
mod audio_thread;
#[cfg(feature = "local-playback")]
mod playback;
#[cfg(feature = "local-playback")]
mod renderer;

pub use queue::{SpeechHandle, SpeechQueue};
pub use resolver::Resolver;

#[cfg(feature = "local-playback")]
pub use renderer::LocalRenderer;

// Silence unused dev-dependency warnings (used by tests/ only)
#[cfg(test)]
use speakq_cache as _;
