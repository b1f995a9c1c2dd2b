// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! `QuotaBar` status daemon.
//!
//! Polls the quota fetcher on the configured interval and prints the visible
//! indicators after every render. Commands are read from stdin, one per
//! line; type `help` for the list.
//!
//! ```bash
//! quotabar-app                      # text indicators
//! quotabar-app --format json        # one JSON array per render
//! quotabar-app --settings ./s.json  # alternate settings file
//! ```

use anyhow::Result;
use clap::{Parser, ValueEnum};
use quotabar_app::command::HELP;
use quotabar_app::{DaemonCommand, RefreshCycle, RefreshScheduler, RenderSink};
use quotabar_core::ColorTier;
use quotabar_fetch::ScriptFetcher;
use quotabar_store::{SettingsStore, StoreError, default_settings_path};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

// ============================================================================
// CLI Definition
// ============================================================================

/// `QuotaBar` status daemon.
#[derive(Parser)]
#[command(name = "quotabar-app")]
#[command(about = "AI quota status indicators, refreshed in the background")]
#[command(version)]
struct Args {
    /// Settings file (defaults to the user config directory).
    #[arg(long, short)]
    settings: Option<PathBuf>,

    /// Indicator output format.
    #[arg(long, short = 'f', default_value = "text")]
    format: OutputFormat,

    /// Verbose logging.
    #[arg(long, short)]
    verbose: bool,

    /// No logging.
    #[arg(long, short)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let default = if verbose { "quotabar=debug,info" } else { "quotabar=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

// ============================================================================
// Output
// ============================================================================

fn print_indicators(sink: &RenderSink, format: OutputFormat) {
    let visible = sink.visible();
    match format {
        OutputFormat::Text => {
            let line = visible
                .iter()
                .map(|(_, indicator)| match indicator.tier {
                    ColorTier::Normal => indicator.status_text(),
                    tier => format!("{} [{}]", indicator.status_text(), tier.label()),
                })
                .collect::<Vec<_>>()
                .join("  ");
            println!("{line}");
        }
        OutputFormat::Json => {
            let items: Vec<_> = visible
                .iter()
                .map(|(slot, indicator)| {
                    serde_json::json!({
                        "slot": slot.to_string(),
                        "indicator": indicator,
                    })
                })
                .collect();
            match serde_json::to_string(&items) {
                Ok(json) => println!("{json}"),
                Err(e) => warn!(error = %e, "Failed to serialize indicators"),
            }
        }
    }
}

fn interval_of(minutes: u32) -> Duration {
    Duration::from_secs(u64::from(minutes) * 60)
}

// ============================================================================
// Commands
// ============================================================================

/// Applies one stdin command. Returns `false` to quit.
async fn handle_command(
    command: DaemonCommand,
    store: &SettingsStore,
    scheduler: &RefreshScheduler,
) -> bool {
    let saved: Result<(), StoreError> = match command {
        DaemonCommand::Refresh => {
            scheduler.trigger_now(true);
            Ok(())
        }
        DaemonCommand::Raw => {
            match scheduler.cycle().last_raw().await {
                Some(raw) => info!(raw = %raw, "Latest fetch output"),
                None => info!("No fetch output yet"),
            }
            Ok(())
        }
        DaemonCommand::Enable(id) => store.set_provider_enabled(id, true).await,
        DaemonCommand::Disable(id) => store.set_provider_enabled(id, false).await,
        DaemonCommand::Toggle(id) => store.toggle_provider(id).await.map(|enabled| {
            info!(provider = %id, enabled, "Provider toggled");
        }),
        DaemonCommand::Cache(on) => store.set_use_cache(on).await,
        DaemonCommand::Interval(minutes) => store.set_interval_minutes(minutes).await.map(|m| {
            info!(minutes = m, "Refresh interval set");
        }),
        DaemonCommand::Mode(mode) => store.set_display_mode(mode).await,
        DaemonCommand::Help => {
            eprintln!("{HELP}");
            Ok(())
        }
        DaemonCommand::Quit => return false,
    };

    if let Err(e) = saved {
        warn!(error = %e, "Settings changed in memory but not saved");
    }
    true
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose, args.quiet);

    let path = args.settings.unwrap_or_else(default_settings_path);
    let store = Arc::new(SettingsStore::load(path).await?);
    let settings = store.get().await;
    info!(path = %store.path().display(), "QuotaBar starting");

    let fetcher = ScriptFetcher::new(
        settings.fetcher.program.clone(),
        settings.fetcher.script_path(),
    )
    .with_timeout(settings.fetcher.timeout());
    if !fetcher.is_available() {
        warn!(
            program = fetcher.program(),
            script = %fetcher.script().display(),
            "Quota fetcher not found; cycles will render an error"
        );
    }

    let sink = Arc::new(Mutex::new(RenderSink::new(settings.display_mode)));
    let cycle = Arc::new(RefreshCycle::new(
        Arc::new(fetcher),
        store.clone(),
        sink.clone(),
    ));
    let scheduler = Arc::new(RefreshScheduler::new(cycle));

    // Print on every render.
    let mut renders = sink.lock().await.subscribe();
    let printer = tokio::spawn({
        let sink = sink.clone();
        let format = args.format;
        async move {
            while renders.changed().await.is_ok() {
                print_indicators(&*sink.lock().await, format);
            }
        }
    });

    // Settings edits reschedule and refresh immediately.
    let mut changes = store.subscribe();
    let watcher = tokio::spawn({
        let store = store.clone();
        let scheduler = scheduler.clone();
        let sink = sink.clone();
        async move {
            while changes.changed().await.is_ok() {
                let settings = store.get().await;
                debug!(settings = ?settings, "Settings changed");
                sink.lock().await.set_mode(settings.display_mode);
                scheduler.reschedule(interval_of(settings.interval_minutes()));
                scheduler.trigger_now(true);
            }
        }
    });

    scheduler.trigger_now(false);
    scheduler.start(interval_of(settings.interval_minutes()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) if line.trim().is_empty() => {}
                Ok(Some(line)) => match line.parse::<DaemonCommand>() {
                    Ok(command) => {
                        debug!(?command, "Command received");
                        if !handle_command(command, &store, &scheduler).await {
                            break;
                        }
                    }
                    Err(e) => eprintln!("{e}"),
                },
                Ok(None) => {
                    debug!("stdin closed, waiting for Ctrl-C");
                    stdin_open = false;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to read stdin");
                    stdin_open = false;
                }
            },
            _ = &mut ctrl_c => break,
        }
    }

    info!("QuotaBar shutting down");
    scheduler.stop();
    watcher.abort();
    printer.abort();
    Ok(())
}
