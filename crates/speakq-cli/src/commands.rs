//! Subcommand definitions.

use std::path::PathBuf;

use clap::Subcommand;

/// Top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Speak each text in turn; later texts wait for earlier ones
    Speak {
        /// Texts to speak, in order
        #[arg(required = true)]
        text: Vec<String>,

        /// Pitch multiplier
        #[arg(long, default_value_t = 1.0)]
        pitch: f64,

        /// Speed multiplier
        #[arg(long, default_value_t = 1.0)]
        speed: f64,
    },

    /// Resolve the audio for a text (cache first) and write it to a file
    Fetch {
        /// Text to synthesize
        text: String,

        /// File to write the audio to
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Inspect or clear the speech cache
    Cache {
        #[command(subcommand)]
        command: CacheCommand,
    },
}

/// Speech cache maintenance.
#[derive(Debug, Subcommand)]
pub enum CacheCommand {
    /// Show how many records and bytes the cache holds
    Stats {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// List cached texts in insertion order
    List,

    /// Remove every cached record
    Clear,
}
