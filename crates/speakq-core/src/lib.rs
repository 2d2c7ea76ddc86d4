#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod audio;
pub mod error;
pub mod events;
pub mod paths;
pub mod ports;
pub mod request;
pub mod settings;

// Re-export commonly used types for convenience
pub use audio::AudioParameters;
pub use error::SpeechError;
pub use events::SpeechEvent;
pub use paths::{PathError, cache_dir, data_root};
pub use ports::{AudioCache, AudioRenderer, Playback, PlaybackCompletion, SynthesisBackend};
pub use request::{RequestId, SpeechCallback, SpeechRequest};
pub use settings::{
    DEFAULT_CACHE_SPEECH, DEFAULT_VOLUME, SettingsError, SpeechConfig, SpeechSettings,
    validate_settings,
};
