//! Eavesdrop contract checker - entry point
//!
//! Exit codes: 0 when every case passed, 1 when any case failed or
//! errored, 2 when the run could not start.

use std::process::ExitCode;

use clap::Parser;
use eavesdrop::Cli;
use tracing::error;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr so a JSON report on stdout stays parseable.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let mut stdout = std::io::stdout().lock();
    match eavesdrop::run(&cli, &mut stdout).await {
        Ok(status) => status.exit_code(),
        Err(e) => {
            error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
