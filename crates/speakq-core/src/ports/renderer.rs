//! Audio rendering port.
//!
//! Rendering is split in two phases so the queue can fire `on_start` exactly
//! when audio begins:
//!
//! 1. [`AudioRenderer::start`] decodes the bytes and starts output, returning a
//!    [`Playback`] once sound is actually playing.
//! 2. [`Playback::finished`] resolves when the audio drains naturally.
//!
//! Stopping (via [`AudioRenderer::stop`] or [`Playback::cancel`]) drops the
//! renderer's [`PlaybackCompletion`] without completing it, so
//! `finished` reports [`SpeechError::Interrupted`] instead of success.

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::audio::AudioParameters;
use crate::error::SpeechError;

/// Decodes and plays audio.
#[async_trait]
pub trait AudioRenderer: Send + Sync {
    /// Decode `audio` and start playing it with `params` applied.
    ///
    /// Returns once playback has begun. A decode failure is reported as
    /// [`SpeechError::Decode`].
    async fn start(&self, audio: Vec<u8>, params: AudioParameters)
    -> Result<Playback, SpeechError>;

    /// Halt whatever is playing right now, without completing it.
    fn stop(&self);
}

type CancelHook = Box<dyn FnOnce() + Send + Sync + 'static>;

/// An in-progress playback, handed back by [`AudioRenderer::start`].
pub struct Playback {
    done: oneshot::Receiver<()>,
    cancel: Option<CancelHook>,
}

/// Renderer-side half of a [`Playback`]: complete it when audio drains.
#[derive(Debug)]
pub struct PlaybackCompletion(oneshot::Sender<()>);

impl Playback {
    /// Create a playback and its completion handle.
    #[must_use]
    pub fn channel() -> (Self, PlaybackCompletion) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                done: rx,
                cancel: None,
            },
            PlaybackCompletion(tx),
        )
    }

    /// Attach a hook that stops exactly this playback.
    #[must_use]
    pub fn with_cancel(mut self, cancel: impl FnOnce() + Send + Sync + 'static) -> Self {
        self.cancel = Some(Box::new(cancel));
        self
    }

    /// Wait until playback completes naturally.
    pub async fn finished(self) -> Result<(), SpeechError> {
        self.done.await.map_err(|_| SpeechError::Interrupted)
    }

    /// Stop this playback without completing it.
    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Playback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Playback")
            .field("cancellable", &self.cancel.is_some())
            .finish_non_exhaustive()
    }
}

impl PlaybackCompletion {
    /// Mark the playback as finished naturally.
    pub fn complete(self) {
        // The queue may already have given up on this playback.
        let _ = self.0.send(());
    }

    /// Whether the queue has stopped waiting for this playback.
    #[must_use]
    pub fn is_abandoned(&self) -> bool {
        self.0.is_closed()
    }
}
