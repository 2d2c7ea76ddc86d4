//! Main CLI parser and top-level argument handling.
//!
//! Global options describe the speech settings and cache location; they are
//! accepted before or after the subcommand.

use std::path::PathBuf;

use clap::Parser;

use crate::commands::Commands;

/// Command-line interface for the speech queue.
#[derive(Debug, Parser)]
#[command(name = "speakq")]
#[command(about = "Speak text through a speech synthesis server, one utterance at a time")]
#[command(version)]
pub struct Cli {
    /// Base URL of the synthesis server
    #[arg(long, env = "SPEAKQ_URL", global = true)]
    pub url: Option<String>,

    /// Output volume (1.0 = unity)
    #[arg(long, env = "SPEAKQ_VOLUME", global = true)]
    pub volume: Option<f64>,

    /// Always synthesize; never read or write the speech cache
    #[arg(long = "no-cache", global = true)]
    pub no_cache: bool,

    /// Override the cache directory for this invocation
    #[arg(long = "cache-dir", global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}
