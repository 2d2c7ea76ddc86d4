//! [`AudioRenderer`] on the local output device.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use speakq_core::{AudioParameters, AudioRenderer, Playback, SpeechError};

use crate::audio_thread::AudioThreadHandle;

/// Plays speech on the default output device.
///
/// Audio is decoded from its container (WAV), resampled by the parameters'
/// effective rate and amplified by their gain.
pub struct LocalRenderer {
    audio: AudioThreadHandle,
    next_token: AtomicU64,
}

impl LocalRenderer {
    /// Open the default output device on a dedicated audio thread.
    pub fn spawn() -> Result<Self, SpeechError> {
        Ok(Self {
            audio: AudioThreadHandle::spawn()?,
            next_token: AtomicU64::new(1),
        })
    }
}

#[async_trait]
impl AudioRenderer for LocalRenderer {
    async fn start(
        &self,
        audio: Vec<u8>,
        params: AudioParameters,
    ) -> Result<Playback, SpeechError> {
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        let (playback, completion) = Playback::channel();
        self.audio.play(audio, params, token, completion).await?;
        Ok(playback.with_cancel(self.audio.stop_hook(token)))
    }

    fn stop(&self) {
        self.audio.stop_all();
    }
}
