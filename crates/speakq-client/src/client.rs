//! Synthesis client implementing the [`SynthesisBackend`] port.

use async_trait::async_trait;
use speakq_core::{SpeechError, SynthesisBackend};

use crate::config::SynthesisClientConfig;
use crate::endpoint::synthesis_url;
use crate::error::ClientResult;
use crate::http::{HttpBackend, ReqwestBackend};

/// Default synthesis client using the reqwest HTTP backend.
pub type DefaultSynthesisClient = SynthesisClient<ReqwestBackend>;

/// Client for the synthesis server's inference endpoint.
///
/// Generic over the HTTP backend so tests can substitute a fake. Use
/// [`DefaultSynthesisClient`] in production.
pub struct SynthesisClient<B: HttpBackend> {
    backend: B,
    config: SynthesisClientConfig,
}

impl DefaultSynthesisClient {
    /// Create a client for the server described by `config`.
    pub fn new(config: &SynthesisClientConfig) -> ClientResult<Self> {
        Ok(Self {
            backend: ReqwestBackend::new(config)?,
            config: config.clone(),
        })
    }
}

impl<B: HttpBackend> SynthesisClient<B> {
    #[cfg(test)]
    pub(crate) const fn with_backend(config: SynthesisClientConfig, backend: B) -> Self {
        Self { backend, config }
    }

    /// Fetch the encoded audio for `text`.
    pub async fn fetch(&self, text: &str) -> ClientResult<Vec<u8>> {
        let url = synthesis_url(&self.config.base_url, &self.config.infer_path, text)?;
        tracing::debug!(%url, chars = text.chars().count(), "Requesting synthesis");

        let audio = self.backend.get_bytes(&url).await?;
        tracing::debug!(bytes = audio.len(), "Synthesis complete");
        Ok(audio)
    }
}

#[async_trait]
impl<B: HttpBackend> SynthesisBackend for SynthesisClient<B> {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError> {
        self.fetch(text)
            .await
            .map_err(|e| SpeechError::Synthesis(e.to_string()))
    }
}
