//! HTTP backend abstraction for the synthesis server.
//!
//! The client is generic over [`HttpBackend`] so request construction and
//! error mapping can be tested without a network.

use async_trait::async_trait;
use url::Url;

use crate::config::SynthesisClientConfig;
use crate::error::{ClientError, ClientResult};

/// Something that can `GET` a URL and hand back the body bytes.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    /// Fetch `url`. Non-success statuses are errors.
    async fn get_bytes(&self, url: &Url) -> ClientResult<Vec<u8>>;
}

/// Production backend using reqwest.
///
/// No retries: a failed synthesis is reported once and the queue moves on.
pub struct ReqwestBackend {
    client: reqwest::Client,
}

impl ReqwestBackend {
    /// Build the underlying HTTP client from `config`.
    pub fn new(config: &SynthesisClientConfig) -> ClientResult<Self> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn get_bytes(&self, url: &Url) -> ClientResult<Vec<u8>> {
        let response = self.client.get(url.as_str()).send().await?;
        let status = response.status();

        if !status.is_success() {
            // The body is the server's explanation; keep it for the error.
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::ServerRejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

// ============================================================================
// Fake Backend for Testing
// ============================================================================
