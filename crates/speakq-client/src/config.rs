//! Public configuration for the synthesis client.

use std::time::Duration;

use speakq_core::SpeechConfig;

/// Endpoint path appended to the server base URL.
pub const DEFAULT_INFER_PATH: &str = "/tts-server/api/infer-glowtts";

/// Configuration for the synthesis client.
///
/// # Example
///
/// ```
/// use speakq_client::SynthesisClientConfig;
/// use std::time::Duration;
///
/// let config = SynthesisClientConfig::new("http://localhost:5002")
///     .with_timeout(Duration::from_secs(60))
///     .with_user_agent("my-app/1.0");
/// ```
#[derive(Debug, Clone)]
pub struct SynthesisClientConfig {
    /// Server base URL, without a trailing slash
    pub(crate) base_url: String,
    /// Path of the inference endpoint
    pub(crate) infer_path: String,
    /// User agent string for HTTP requests
    pub(crate) user_agent: String,
    /// Request timeout; `None` waits indefinitely
    pub(crate) timeout: Option<Duration>,
}

impl SynthesisClientConfig {
    /// Configuration for the server at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            infer_path: DEFAULT_INFER_PATH.to_string(),
            user_agent: concat!("speakq-client/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: None,
        }
    }

    /// Configuration for the server named in validated speech settings.
    pub fn from_speech_config(config: &SpeechConfig) -> Self {
        Self::new(config.server_url.clone())
    }

    /// Override the inference endpoint path.
    #[must_use]
    pub fn with_infer_path(mut self, path: impl Into<String>) -> Self {
        self.infer_path = path.into();
        self
    }

    /// Set the user agent string for HTTP requests.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Give up on a request after `timeout`.
    ///
    /// Unset by default: a synthesis call may take as long as the server needs.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Server base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
