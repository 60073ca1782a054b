//! # NaoWatch — museum ticket availability watcher
//!
//! Checks the Naoshima booking pages (Chichu, Teshima) for ticket
//! availability on the requested dates and notifies through every
//! configured channel when a date is bookable.
//!
//! Usage:
//!   naowatch                               # config/env targets, one pass
//!   naowatch --dates 2025-10-01,2025-10-07 # explicit dates
//!   naowatch --every-mins 20               # keep running, pass every 20 min
//!
//! Designed to be run from cron/CI; each pass is stateless. Exit code 0
//! on a clean pass, non-zero when any museum's page never became ready.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use naowatch_browser::{BrowserProbe, BrowserSettings};
use naowatch_channels::Dispatcher;
use naowatch_checker::Orchestrator;
use naowatch_core::WatchConfig;
use naowatch_core::types::{MuseumTarget, TargetDate};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "naowatch",
    version,
    about = "🎫 NaoWatch — Naoshima museum ticket availability watcher"
)]
struct Cli {
    /// Comma-separated ISO dates to check (YYYY-MM-DD)
    #[arg(long)]
    dates: Option<String>,

    /// Config file path (default: ~/.naowatch/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run with a visible browser window (debugging)
    #[arg(long)]
    no_headless: bool,

    /// Save a screenshot per checked date into this directory
    #[arg(long)]
    screenshot_dir: Option<String>,

    /// Keep running, with a full check pass every N minutes
    #[arg(long)]
    every_mins: Option<u64>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "naowatch=debug"
    } else {
        "naowatch=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    // Config file → environment → CLI flags.
    let mut config = match &cli.config {
        Some(path) => WatchConfig::load_from(path)?,
        None => WatchConfig::load()?,
    };
    config.apply_env();

    if cli.no_headless {
        config.browser.headless = false;
    }
    if let Some(dir) = &cli.screenshot_dir {
        config.browser.screenshot_dir = Some(dir.clone());
    }
    if let Some(dates) = &cli.dates {
        config.dates = dates
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
    }

    let dates: Vec<TargetDate> = config
        .dates
        .iter()
        .map(|s| s.parse())
        .collect::<naowatch_core::Result<_>>()?;
    let museums: Vec<MuseumTarget> = config.targets();
    if museums.is_empty() || dates.is_empty() {
        anyhow::bail!("Nothing to check: need at least one museum and one date");
    }

    let dispatcher = Dispatcher::from_config(&config.channels);
    if dispatcher.is_empty() {
        tracing::warn!("No notification channels enabled — results go to the log only");
    }

    let settings = BrowserSettings {
        headless: config.browser.headless,
        timeout: Duration::from_millis(config.browser.timeout_ms),
        screenshot_dir: config
            .browser
            .screenshot_dir
            .as_deref()
            .map(|d| PathBuf::from(shellexpand::tilde(d).to_string())),
    };
    let probe = Arc::new(BrowserProbe::new(settings));
    let orchestrator = Orchestrator::new(probe, dispatcher);

    match cli.every_mins {
        Some(mins) => {
            // Built-in scheduling for environments without cron. First
            // pass runs immediately.
            tracing::info!("Watching every {mins} minute(s); Ctrl+C to stop");
            let mut ticker = tokio::time::interval(Duration::from_secs(mins.max(1) * 60));
            loop {
                ticker.tick().await;
                let summary = orchestrator.run(&museums, &dates).await;
                tracing::info!(
                    "Pass complete: {} result(s), {} failure(s)",
                    summary.results.len(),
                    summary.failures.len()
                );
            }
        }
        None => {
            let summary = orchestrator.run(&museums, &dates).await;
            println!("\n{}", summary.render_table());
            std::process::exit(summary.exit_code());
        }
    }
}
