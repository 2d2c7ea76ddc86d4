//! CLI entry point - the composition root.
//!
//! Parses arguments, installs logging, builds the [`CliContext`] and routes
//! the command to its handler.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use speakq_cli::{Cli, CliContext, CliError, Commands, handlers};

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables before clap reads its env-backed options
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            let code = e.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

/// `RUST_LOG` wins; otherwise `warn`, or `debug` with `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let ctx = CliContext::from_cli(cli)?;

    match &cli.command {
        Commands::Speak { text, pitch, speed } => {
            handlers::speak::execute(&ctx, text, *pitch, *speed).await
        }
        Commands::Fetch { text, output } => handlers::fetch::execute(&ctx, text, output).await,
        Commands::Cache { command } => handlers::cache::execute(&ctx, command),
    }
}
