//! Speech requests.
//!
//! A [`SpeechRequest`] is built by the caller, handed to the queue and never
//! touched again by the caller. The queue owns it until it has been played
//! (or dropped), and is the only party that invokes its callbacks.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

static NEXT_REQUEST_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier assigned when a request is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestId(u64);

impl RequestId {
    fn next() -> Self {
        Self(NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle callback, invoked at most once with the request it belongs to.
pub type SpeechCallback = Box<dyn FnOnce(&SpeechRequest) + Send + 'static>;

/// A single text-to-speak request.
///
/// Only `text` identifies the request for caching; pitch and speed affect
/// playback, not which audio is fetched.
pub struct SpeechRequest {
    id: RequestId,
    text: String,
    pitch: f64,
    speed: f64,
    on_start: Option<SpeechCallback>,
    on_end: Option<SpeechCallback>,
}

impl SpeechRequest {
    /// Create a request with neutral pitch and speed (`1.0`).
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: RequestId::next(),
            text: text.into(),
            pitch: 1.0,
            speed: 1.0,
            on_start: None,
            on_end: None,
        }
    }

    /// Set the pitch multiplier.
    #[must_use]
    pub const fn with_pitch(mut self, pitch: f64) -> Self {
        self.pitch = pitch;
        self
    }

    /// Set the speed multiplier.
    #[must_use]
    pub const fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    /// Register a callback fired as playback begins.
    #[must_use]
    pub fn on_start(mut self, callback: impl FnOnce(&Self) + Send + 'static) -> Self {
        self.on_start = Some(Box::new(callback));
        self
    }

    /// Register a callback fired when playback completes naturally.
    #[must_use]
    pub fn on_end(mut self, callback: impl FnOnce(&Self) + Send + 'static) -> Self {
        self.on_end = Some(Box::new(callback));
        self
    }

    #[must_use]
    pub const fn id(&self) -> RequestId {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub const fn pitch(&self) -> f64 {
        self.pitch
    }

    #[must_use]
    pub const fn speed(&self) -> f64 {
        self.speed
    }

    /// Fire the `on_start` callback. Subsequent calls are no-ops.
    pub fn notify_started(&mut self) {
        if let Some(callback) = self.on_start.take() {
            callback(&*self);
        }
    }

    /// Fire the `on_end` callback. Subsequent calls are no-ops.
    pub fn notify_ended(&mut self) {
        if let Some(callback) = self.on_end.take() {
            callback(&*self);
        }
    }
}

impl fmt::Debug for SpeechRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpeechRequest")
            .field("id", &self.id)
            .field("text", &self.text)
            .field("pitch", &self.pitch)
            .field("speed", &self.speed)
            .field("on_start", &self.on_start.is_some())
            .field("on_end", &self.on_end.is_some())
            .finish()
    }
}
