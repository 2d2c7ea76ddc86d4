//! Cache-first audio resolution.
//!
//! ```text
//! lookup(text) ──hit──► audio
//!      │
//!     miss
//!      ▼
//! synthesize(text) ──ok──► store(text, audio) ──► audio
//!      │
//!     err ──► SpeechError::Synthesis
//! ```
//!
//! With caching disabled the cache is neither read nor written.

use std::sync::Arc;

use speakq_core::{AudioCache, SpeechConfig, SpeechError, SynthesisBackend};

/// Turns request text into audio bytes.
#[derive(Clone)]
pub struct Resolver {
    backend: Arc<dyn SynthesisBackend>,
    cache: Option<Arc<dyn AudioCache>>,
}

impl Resolver {
    /// Resolve through `backend`, consulting `cache` first when present.
    pub fn new(backend: Arc<dyn SynthesisBackend>, cache: Option<Arc<dyn AudioCache>>) -> Self {
        Self { backend, cache }
    }

    /// Build a resolver honouring `config.cache_speech`.
    pub fn for_config(
        config: &SpeechConfig,
        backend: Arc<dyn SynthesisBackend>,
        cache: Arc<dyn AudioCache>,
    ) -> Self {
        Self::new(backend, config.cache_speech.then_some(cache))
    }

    /// Whether the cache-first policy is active.
    pub const fn caching(&self) -> bool {
        self.cache.is_some()
    }

    /// Audio for `text`.
    ///
    /// A failed cache write does not fail resolution; the synthesized bytes
    /// are still returned.
    pub async fn resolve(&self, text: &str) -> Result<Vec<u8>, SpeechError> {
        if let Some(cache) = &self.cache {
            if let Some(audio) = cache.lookup(text) {
                return Ok(audio);
            }
            tracing::debug!(text_len = text.len(), "Cache miss, synthesizing");
        }

        let audio = self.backend.synthesize(text).await?;

        if let Some(cache) = &self.cache {
            cache.store(text, &audio);
        }
        Ok(audio)
    }
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("caching", &self.caching())
            .finish_non_exhaustive()
    }
}
