//! Speech queue: single-flight, FIFO playback of speech requests.
//!
//! The queue is a two-state machine:
//!
//! ```text
//!   Idle ──speak──► Speaking ──settled, backlog empty──► Idle
//!                    │   ▲
//!                    └───┘  speak: enqueue
//!                           settled, backlog non-empty: pop head and play
//!   Speaking ──shut_up──► Idle   (backlog discarded, in-flight aborted)
//! ```
//!
//! A request submitted while idle starts immediately and never enters the
//! backlog. Each request runs to a *settlement* (played, failed or
//! interrupted); a failed request is dropped and the next one is promoted, so
//! no error can leave the queue stuck in `Speaking`.
//!
//! Playback is driven by one task per busy period. `shut_up` bumps a
//! generation counter and aborts that task; a driver that wakes up under a
//! stale generation stops whatever it started and exits without touching the
//! queue state.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use speakq_core::{
    AudioCache, AudioParameters, AudioRenderer, RequestId, SettingsError, SpeechConfig,
    SpeechError, SpeechEvent, SpeechRequest, SynthesisBackend,
};
use tokio::sync::{mpsc, oneshot};
use tokio::task::AbortHandle;

use crate::resolver::Resolver;

type Settlement = Result<(), SpeechError>;

/// A request waiting for (or undergoing) playback.
struct Pending {
    request: SpeechRequest,
    reply: Option<oneshot::Sender<Settlement>>,
}

struct QueueState {
    /// True iff exactly one request is being resolved or rendered.
    speaking: bool,
    /// Never contains the in-flight request.
    backlog: VecDeque<Pending>,
    /// Incremented by every `shut_up`.
    generation: u64,
    driver: Option<AbortHandle>,
    volume: f64,
}

struct Inner {
    resolver: Resolver,
    renderer: Arc<dyn AudioRenderer>,
    state: Mutex<QueueState>,
    event_tx: mpsc::UnboundedSender<SpeechEvent>,
}

/// Handle to a sequential speech queue.
///
/// Cheap to clone; clones share the same backlog and playback state.
#[derive(Clone)]
pub struct SpeechQueue {
    inner: Arc<Inner>,
}

/// Completion handle returned by [`SpeechQueue::speak_and_await`].
#[derive(Debug)]
pub struct SpeechHandle {
    id: RequestId,
    rx: oneshot::Receiver<Settlement>,
}

impl SpeechHandle {
    /// Identifier of the request this handle tracks.
    pub const fn id(&self) -> RequestId {
        self.id
    }

    /// Wait for the request to settle.
    ///
    /// `Ok(())` once it finished playing (after its `on_end` fired), its own
    /// error if resolution or rendering failed, or
    /// [`SpeechError::Interrupted`] if `shut_up` discarded it.
    pub async fn wait(self) -> Settlement {
        self.rx.await.unwrap_or(Err(SpeechError::Interrupted))
    }
}

impl SpeechQueue {
    /// Create an idle queue.
    ///
    /// `cache` is only consulted when `config.cache_speech` is set. Returns
    /// the queue and a receiver for [`SpeechEvent`]s.
    pub fn new(
        config: &SpeechConfig,
        backend: Arc<dyn SynthesisBackend>,
        cache: Arc<dyn AudioCache>,
        renderer: Arc<dyn AudioRenderer>,
    ) -> (Self, mpsc::UnboundedReceiver<SpeechEvent>) {
        Self::with_resolver(
            Resolver::for_config(config, backend, cache),
            renderer,
            config.volume,
        )
    }

    /// Create an idle queue around an existing resolver.
    pub fn with_resolver(
        resolver: Resolver,
        renderer: Arc<dyn AudioRenderer>,
        volume: f64,
    ) -> (Self, mpsc::UnboundedReceiver<SpeechEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let inner = Inner {
            resolver,
            renderer,
            state: Mutex::new(QueueState {
                speaking: false,
                backlog: VecDeque::new(),
                generation: 0,
                driver: None,
                volume,
            }),
            event_tx,
        };
        (
            Self {
                inner: Arc::new(inner),
            },
            event_rx,
        )
    }

    /// Play `request` now if idle, otherwise append it to the backlog.
    ///
    /// Never waits for playback. Must be called from within a Tokio runtime.
    pub fn speak(&self, request: SpeechRequest) {
        self.submit(Pending {
            request,
            reply: None,
        });
    }

    /// Like [`speak`](Self::speak), but returns a handle that settles with
    /// this request's outcome. Sequencing is identical.
    pub fn speak_and_await(&self, request: SpeechRequest) -> SpeechHandle {
        let (tx, rx) = oneshot::channel();
        let id = request.id();
        self.submit(Pending {
            request,
            reply: Some(tx),
        });
        SpeechHandle { id, rx }
    }

    /// Halt the in-flight request and discard the backlog.
    ///
    /// After this returns the queue is idle: no discarded request will fire
    /// `on_start` or `on_end`, and their handles settle with
    /// [`SpeechError::Interrupted`]. A no-op when already idle.
    pub fn shut_up(&self) {
        let (backlog, driver) = {
            let mut state = self.inner.state();
            if !state.speaking {
                return;
            }
            state.speaking = false;
            state.generation += 1;
            (std::mem::take(&mut state.backlog), state.driver.take())
        };

        if let Some(driver) = driver {
            driver.abort();
        }
        self.inner.renderer.stop();

        let discarded = backlog.len();
        // Dropping the backlog drops its reply senders: handles see Interrupted.
        drop(backlog);

        tracing::info!(discarded, "Speech queue cleared");
        self.inner.emit(SpeechEvent::Cleared { discarded });
    }

    /// Whether a request is being resolved or played. Advisory.
    pub fn is_speaking(&self) -> bool {
        self.inner.state().speaking
    }

    /// Number of requests waiting behind the in-flight one. Advisory.
    pub fn backlog_len(&self) -> usize {
        self.inner.state().backlog.len()
    }

    /// Current global volume.
    pub fn volume(&self) -> f64 {
        self.inner.state().volume
    }

    /// Change the global volume for requests that start after this call.
    pub fn set_volume(&self, volume: f64) -> Result<(), SettingsError> {
        if !volume.is_finite() || volume < 0.0 {
            return Err(SettingsError::InvalidVolume(volume));
        }
        self.inner.state().volume = volume;
        tracing::debug!(volume, "Volume changed");
        Ok(())
    }

    fn submit(&self, pending: Pending) {
        let id = pending.request.id();
        let mut state = self.inner.state();

        if state.speaking {
            state.backlog.push_back(pending);
            let position = state.backlog.len();
            drop(state);
            tracing::debug!(%id, position, "Request queued");
            self.inner.emit(SpeechEvent::Queued { id, position });
            return;
        }

        // Claim the queue before the driver exists so concurrent submits enqueue.
        state.speaking = true;
        let generation = state.generation;
        let inner = Arc::clone(&self.inner);
        let driver = tokio::spawn(inner.drive(generation, pending));
        state.driver = Some(driver.abort_handle());
        tracing::debug!(%id, "Speaking");
    }
}

impl Inner {
    fn state(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_stale(&self, generation: u64) -> bool {
        self.state().generation != generation
    }

    fn emit(&self, event: SpeechEvent) {
        if self.event_tx.send(event).is_err() {
            tracing::trace!("Speech event receiver dropped");
        }
    }

    /// Play `pending`, then keep promoting backlog heads until the backlog is
    /// empty or the generation moves on.
    async fn drive(self: Arc<Self>, generation: u64, mut pending: Pending) {
        loop {
            let id = pending.request.id();
            let settlement = self.play_one(generation, &mut pending.request).await;

            match &settlement {
                Ok(()) => {
                    tracing::debug!(%id, "Finished speaking");
                    self.emit(SpeechEvent::Finished { id });
                }
                Err(e) if e.is_interrupted() => {
                    tracing::debug!(%id, "Speech interrupted");
                }
                Err(e) => {
                    tracing::warn!(%id, error = %e, "Dropping speech request");
                    self.emit(SpeechEvent::Failed {
                        id,
                        error: e.to_string(),
                    });
                }
            }
            if let Some(reply) = pending.reply.take() {
                let _ = reply.send(settlement);
            }

            let next = {
                let mut state = self.state();
                if state.generation != generation {
                    return;
                }
                let next = state.backlog.pop_front();
                if next.is_none() {
                    state.speaking = false;
                    state.driver = None;
                }
                next
            };

            let Some(next) = next else {
                tracing::debug!("Speech queue idle");
                self.emit(SpeechEvent::Idle);
                return;
            };
            pending = next;
        }
    }

    async fn play_one(&self, generation: u64, request: &mut SpeechRequest) -> Settlement {
        let text = request.text().to_owned();
        let audio = self.resolver.resolve(&text).await?;

        let params = {
            let state = self.state();
            if state.generation != generation {
                return Err(SpeechError::Interrupted);
            }
            AudioParameters::derive(request.pitch(), request.speed(), state.volume)
        };

        let playback = self.renderer.start(audio, params).await?;
        if self.is_stale(generation) {
            playback.cancel();
            return Err(SpeechError::Interrupted);
        }

        tracing::debug!(id = %request.id(), text_len = text.len(), ?params, "Playback started");
        self.emit(SpeechEvent::Started {
            id: request.id(),
            text,
        });
        if self.is_stale(generation) {
            playback.cancel();
            return Err(SpeechError::Interrupted);
        }
        request.notify_started();

        // A completed playback resolves without yielding to the abort.
        playback.finished().await?;
        if self.is_stale(generation) {
            return Err(SpeechError::Interrupted);
        }
        request.notify_ended();
        Ok(())
    }
}
