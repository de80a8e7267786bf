mod cli;
mod run;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run(args) => run::run(args).await,
    };

    match result {
        Ok(summary) => {
            // Best-effort delivery: per-item skips and undelivered leftovers
            // are reported but do not fail the process.
            tracing::info!(
                published = summary.published,
                skipped = summary.skipped,
                undelivered = summary.undelivered,
                "done"
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "fatal");
            std::process::exit(1);
        }
    }
}
