//! Dedicated audio output thread.
//!
//! [`AudioPlayback`] holds a `rodio::OutputStream`, which is `!Send` on some
//! platforms, so it is confined to one OS thread and driven over a command
//! channel. [`AudioThreadHandle`] is the `Send + Sync` proxy.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc;
use std::thread;

use speakq_core::{AudioParameters, PlaybackCompletion, SpeechError};
use tokio::sync::oneshot;

use crate::playback::AudioPlayback;

// ── Commands ───────────────────────────────────────────────────────

enum AudioCommand {
    /// Decode and start playing. Refused if `epoch` is no longer current.
    Play {
        audio: Vec<u8>,
        params: AudioParameters,
        token: u64,
        epoch: u64,
        completion: PlaybackCompletion,
        reply: oneshot::Sender<Result<(), SpeechError>>,
    },

    /// Stop playback: any sink with `None`, only `token`'s sink otherwise.
    Stop { token: Option<u64> },

    /// Shut down the audio thread, releasing the output stream.
    Shutdown,
}

// ── Handle (Send + Sync proxy) ─────────────────────────────────────

/// `Send + Sync` handle to the audio thread.
///
/// Every [`stop_all`](Self::stop_all) advances an epoch shared with the
/// thread. A `Play` captured under an older epoch is refused, so a start that
/// races with a stop never begins sounding after the stop.
pub struct AudioThreadHandle {
    cmd_tx: mpsc::Sender<AudioCommand>,
    epoch: Arc<AtomicU64>,
    thread: Option<thread::JoinHandle<()>>,
}

impl AudioThreadHandle {
    /// Spawn the audio thread and open the default output device on it.
    pub fn spawn() -> Result<Self, SpeechError> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<AudioCommand>();
        let (init_tx, init_rx) = mpsc::channel::<Result<(), SpeechError>>();
        let epoch = Arc::new(AtomicU64::new(0));
        let thread_epoch = Arc::clone(&epoch);

        let thread = thread::Builder::new()
            .name("speakq-audio".into())
            .spawn(move || Self::run(&thread_epoch, &cmd_rx, &init_tx))
            .map_err(|e| SpeechError::Output(format!("failed to spawn audio thread: {e}")))?;

        // Wait for the audio thread to finish initialisation.
        init_rx.recv().map_err(|_| SpeechError::AudioThreadDied)??;

        Ok(Self {
            cmd_tx,
            epoch,
            thread: Some(thread),
        })
    }

    /// Start playing `audio`; resolves once sound is playing.
    pub async fn play(
        &self,
        audio: Vec<u8>,
        params: AudioParameters,
        token: u64,
        completion: PlaybackCompletion,
    ) -> Result<(), SpeechError> {
        let (reply, rx) = oneshot::channel();
        self.cmd_tx
            .send(AudioCommand::Play {
                audio,
                params,
                token,
                epoch: self.epoch.load(Ordering::SeqCst),
                completion,
                reply,
            })
            .map_err(|_| SpeechError::AudioThreadDied)?;
        rx.await.map_err(|_| SpeechError::AudioThreadDied)?
    }

    /// Stop whatever is playing and refuse plays issued before this call.
    pub fn stop_all(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        let _ = self.cmd_tx.send(AudioCommand::Stop { token: None });
    }

    /// A hook that stops `token`'s playback and nothing else.
    pub fn stop_hook(&self, token: u64) -> impl FnOnce() + Send + Sync + 'static {
        let cmd_tx = self.cmd_tx.clone();
        move || {
            let _ = cmd_tx.send(AudioCommand::Stop { token: Some(token) });
        }
    }

    // ── Audio thread event loop ────────────────────────────────────

    fn run(
        epoch: &AtomicU64,
        cmd_rx: &mpsc::Receiver<AudioCommand>,
        init_tx: &mpsc::Sender<Result<(), SpeechError>>,
    ) {
        let mut playback = match AudioPlayback::new() {
            Ok(p) => p,
            Err(e) => {
                let _ = init_tx.send(Err(e));
                return;
            }
        };

        if init_tx.send(Ok(())).is_err() {
            // Caller dropped, nothing to do.
            return;
        }

        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                AudioCommand::Play {
                    audio,
                    params,
                    token,
                    epoch: issued,
                    completion,
                    reply,
                } => {
                    let result = if issued != epoch.load(Ordering::SeqCst)
                        || completion.is_abandoned()
                    {
                        Err(SpeechError::Interrupted)
                    } else {
                        playback.play(audio, params, token, completion)
                    };
                    let _ = reply.send(result);
                }

                AudioCommand::Stop { token } => playback.stop(token),

                AudioCommand::Shutdown => break,
            }
        }

        playback.stop(None);
        tracing::debug!("Audio thread shutting down");
    }
}

impl Drop for AudioThreadHandle {
    fn drop(&mut self) {
        // The thread may already be dead.
        let _ = self.cmd_tx.send(AudioCommand::Shutdown);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}
