//! Main entry point for ttget CLI

use anyhow::Context;
use clap::Parser;
use std::process::ExitCode;
use tokio::io::BufReader;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use ttget::cli::{guard, Args, Mode, OutputFormatter, Session};
use ttget::{Config, Downloader};

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();

    let args = Args::parse();
    debug!("Starting ttget with args: {:?}", args);

    let mut output = OutputFormatter::new(std::io::stdout(), std::io::stderr());
    let mut stdin = BufReader::new(tokio::io::stdin());
    guard(run(args), &mut stdin, &mut output).await.into()
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    let downloader =
        Downloader::with_options(config.download.clone()).context("Failed to set up HTTP client")?;
    let output = OutputFormatter::new(std::io::stdout(), std::io::stderr())
        .with_progress(config.show_progress);
    let mut session = Session::new(downloader, output).with_exit_delay(config.exit_delay);

    let exit = match args.mode() {
        Mode::Batch => session.run_batch(&args.links).await?,
        Mode::Interactive => {
            session
                .run_interactive(BufReader::new(tokio::io::stdin()))
                .await?
        }
    };
    info!("Session ended: {:?}", exit);

    Ok(())
}

/// Initialize logging system
fn init_logging() {
    // Diagnostics go to stderr; stdout carries the filenames
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}
