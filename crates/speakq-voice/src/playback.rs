//! Audio playback via `rodio`.
//!
//! Lives on the audio thread: `OutputStream` is `!Send` on some platforms.

use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use speakq_core::{AudioParameters, PlaybackCompletion, SpeechError};

/// The sink currently playing, tagged with its playback token.
struct ActiveSink {
    token: u64,
    sink: Arc<Sink>,
    stopped: Arc<AtomicBool>,
}

/// Owns the output stream and at most one playing sink.
pub struct AudioPlayback {
    /// rodio output stream (must be kept alive).
    _stream: OutputStream,

    /// Handle used to create sinks.
    stream_handle: OutputStreamHandle,

    current: Option<ActiveSink>,
}

impl AudioPlayback {
    /// Open the default output device.
    pub fn new() -> Result<Self, SpeechError> {
        let (stream, stream_handle) =
            OutputStream::try_default().map_err(|e| SpeechError::Output(e.to_string()))?;

        tracing::info!("Audio playback initialized on default output device");

        Ok(Self {
            _stream: stream,
            stream_handle,
            current: None,
        })
    }

    /// Decode `audio` and start playing it.
    ///
    /// Returns once the sink is running. `completion` is completed by a
    /// watcher thread when the sink drains, unless the sink is stopped first.
    pub fn play(
        &mut self,
        audio: Vec<u8>,
        params: AudioParameters,
        token: u64,
        completion: PlaybackCompletion,
    ) -> Result<(), SpeechError> {
        let source =
            Decoder::new(Cursor::new(audio)).map_err(|e| SpeechError::Decode(e.to_string()))?;

        self.stop(None);

        let sink =
            Sink::try_new(&self.stream_handle).map_err(|e| SpeechError::Output(e.to_string()))?;

        #[allow(clippy::cast_possible_truncation)] // rodio takes f32 factors
        let (rate, gain) = (params.effective_rate() as f32, params.gain as f32);
        sink.append(source.speed(rate).amplify(gain));

        let sink = Arc::new(sink);
        let stopped = Arc::new(AtomicBool::new(false));
        spawn_completion_watcher(Arc::clone(&sink), Arc::clone(&stopped), completion);

        self.current = Some(ActiveSink {
            token,
            sink,
            stopped,
        });

        tracing::debug!(token, rate, gain, "Audio playback started");
        Ok(())
    }

    /// Stop the playing sink. With `Some(token)`, only if it is that playback.
    pub fn stop(&mut self, token: Option<u64>) {
        let matches = self
            .current
            .as_ref()
            .is_some_and(|active| token.is_none_or(|t| t == active.token));
        if !matches {
            return;
        }
        if let Some(active) = self.current.take() {
            active.stopped.store(true, Ordering::SeqCst);
            active.sink.stop();
            tracing::debug!(token = active.token, "Audio playback stopped");
        }
    }
}

/// Block a background thread on the sink until it drains or is stopped.
///
/// `sleep_until_end` also returns on `stop()`, so the `stopped` flag decides
/// whether the drain was natural.
fn spawn_completion_watcher(
    sink: Arc<Sink>,
    stopped: Arc<AtomicBool>,
    completion: PlaybackCompletion,
) {
    std::thread::spawn(move || {
        sink.sleep_until_end();

        if stopped.load(Ordering::SeqCst) {
            // Dropping `completion` reports the playback as interrupted.
            return;
        }
        tracing::debug!("Playback finished naturally");
        completion.complete();
    });
}
