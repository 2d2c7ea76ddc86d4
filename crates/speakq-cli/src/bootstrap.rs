//! Composition root: turns parsed arguments into ready-to-use components.
//!
//! Settings are validated lazily so cache maintenance works without a server
//! URL; anything that synthesizes goes through [`CliContext::speech_config`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use speakq_cache::{FileStore, SpeechCache};
use speakq_client::{DefaultSynthesisClient, SynthesisClientConfig};
use speakq_core::{AudioCache, SpeechConfig, SpeechSettings, validate_settings};
use speakq_voice::Resolver;

use crate::error::CliError;
use crate::parser::Cli;

/// Speech cache as used by the CLI.
pub type FileSpeechCache = SpeechCache<FileStore>;

/// Everything a command handler needs.
pub struct CliContext {
    settings: SpeechSettings,
    cache: Arc<FileSpeechCache>,
}

impl CliContext {
    /// Build the context from global arguments.
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let cache_dir = match &cli.cache_dir {
            Some(dir) => dir.clone(),
            None => speakq_core::cache_dir()?,
        };
        Ok(Self::new(settings_from_cli(cli), cache_dir))
    }

    /// Build a context from raw settings and an explicit cache directory.
    pub fn new(settings: SpeechSettings, cache_dir: PathBuf) -> Self {
        tracing::debug!(cache_dir = %cache_dir.display(), "Using speech cache directory");
        let cache = Arc::new(SpeechCache::new(FileStore::new(&cache_dir)));
        Self { settings, cache }
    }

    /// Validated speech configuration. Fails without a usable server URL.
    pub fn speech_config(&self) -> Result<SpeechConfig, CliError> {
        Ok(validate_settings(&self.settings)?)
    }

    /// Directory the cache file lives in.
    pub fn cache_dir(&self) -> &Path {
        self.cache.backing_store().dir()
    }

    /// The persisted speech cache.
    pub fn cache(&self) -> &Arc<FileSpeechCache> {
        &self.cache
    }

    /// Cache-first resolver against the configured server.
    pub fn resolver(&self, config: &SpeechConfig) -> Result<Resolver, CliError> {
        let client = DefaultSynthesisClient::new(&SynthesisClientConfig::from_speech_config(config))?;
        Ok(Resolver::for_config(
            config,
            Arc::new(client),
            Arc::clone(&self.cache) as Arc<dyn AudioCache>,
        ))
    }
}

/// Raw settings from the global flags.
///
/// `--no-cache` forces caching off; otherwise the default applies.
pub fn settings_from_cli(cli: &Cli) -> SpeechSettings {
    SpeechSettings {
        url: cli.url.clone(),
        cache_speech: cli.no_cache.then_some(false),
        volume: cli.volume,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn no_cache_flag_disables_caching() {
        let cli = Cli::parse_from(["speakq", "--url", "http://tts", "--no-cache", "cache", "list"]);
        let settings = settings_from_cli(&cli);
        assert_eq!(settings.cache_speech, Some(false));
        assert_eq!(settings.url.as_deref(), Some("http://tts"));
    }

    #[test]
    fn caching_defaults_on() {
        let cli = Cli::parse_from(["speakq", "--url", "http://tts/", "cache", "list"]);
        let ctx = CliContext::new(settings_from_cli(&cli), PathBuf::from("unused"));
        let config = ctx.speech_config().unwrap();
        assert!(config.cache_speech);
        assert_eq!(config.server_url, "http://tts");
    }

    #[test]
    fn missing_url_only_fails_when_needed() {
        let ctx = CliContext::new(SpeechSettings::default(), PathBuf::from("unused"));
        assert_eq!(ctx.cache_dir(), Path::new("unused"));
        assert!(matches!(ctx.speech_config(), Err(CliError::Settings(_))));
    }
}
