//! Cache command handlers.

use anyhow::Result;
use speakq_cache::CacheRecord;

use crate::bootstrap::CliContext;
use crate::commands::CacheCommand;
use crate::error::CliError;

/// Execute a cache subcommand.
pub fn execute(ctx: &CliContext, command: &CacheCommand) -> Result<()> {
    match command {
        CacheCommand::Stats { json } => stats(ctx, *json),
        CacheCommand::List => list(ctx),
        CacheCommand::Clear => clear(ctx),
    }
}

fn stats(ctx: &CliContext, json: bool) -> Result<()> {
    let stats = ctx.cache().stats().map_err(CliError::from)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("Cache directory: {}", ctx.cache_dir().display());
    println!("Entries:         {}", stats.entries);
    println!("Distinct texts:  {}", stats.distinct_texts);
    println!("Audio bytes:     {}", stats.audio_bytes);
    Ok(())
}

fn list(ctx: &CliContext) -> Result<()> {
    let records = ctx.cache().records().map_err(CliError::from)?;

    if records.is_empty() {
        println!("The speech cache is empty.");
        return Ok(());
    }

    println!("{:<5} {:>10}  Text", "#", "Bytes");
    for (index, record) in records.iter().enumerate() {
        println!("{:<5} {:>10}  {}", index + 1, audio_size(record), record.message);
    }
    Ok(())
}

fn clear(ctx: &CliContext) -> Result<()> {
    let stats = ctx.cache().stats().unwrap_or_default();
    ctx.cache().clear().map_err(CliError::from)?;
    println!("Removed {} cached record(s).", stats.entries);
    Ok(())
}

fn audio_size(record: &CacheRecord) -> String {
    record
        .audio()
        .map_or_else(|_| "invalid".to_string(), |audio| audio.len().to_string())
}
