//! Fetch command handler.

use std::path::Path;

use anyhow::Result;

use crate::bootstrap::CliContext;
use crate::error::CliError;

/// Resolve `text` (cache first) and write the audio bytes to `output`.
///
/// A miss is synthesized and, with caching on, stored, so this also warms
/// the cache.
pub async fn execute(ctx: &CliContext, text: &str, output: &Path) -> Result<()> {
    let config = ctx.speech_config()?;
    let resolver = ctx.resolver(&config)?;

    let audio = resolver.resolve(text).await.map_err(CliError::from)?;
    tokio::fs::write(output, &audio)
        .await
        .map_err(|source| CliError::Io {
            path: output.to_path_buf(),
            source,
        })?;

    println!("Wrote {} bytes to {}", audio.len(), output.display());
    Ok(())
}
