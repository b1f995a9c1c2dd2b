//! Watch command - foreground refresh loop.
//!
//! Runs the same scheduler as the status daemon and redraws the screen on
//! every render. Settings are re-read at the start of each cycle, so edits
//! made with `quotabar config` show up on the next refresh, including a new
//! interval unless `--interval` pins one.

use anyhow::Result;
use async_trait::async_trait;
use clap::Args;
use quotabar_app::{ConfigSource, RefreshCycle, RefreshScheduler, RenderSink};
use quotabar_core::RefreshConfig;
use quotabar_store::{MAX_INTERVAL_MINUTES, MIN_INTERVAL_MINUTES, SettingsStore};
use std::io::{Write, stdout};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::{build_fetcher, open_store};
use crate::output::TextFormatter;
use crate::{Cli, ExitCode};

/// Arguments for watch command.
#[derive(Args)]
pub struct WatchArgs {
    /// Refresh interval in minutes, 1-60 (defaults to the configured interval).
    #[arg(long, short)]
    pub interval: Option<u32>,
}

/// Settings from the store, with the interval optionally pinned.
struct WatchConfig {
    store: Arc<SettingsStore>,
    pinned: Option<Duration>,
}

#[async_trait]
impl ConfigSource for WatchConfig {
    async fn refresh_config(&self) -> RefreshConfig {
        let config = self.store.refresh_config().await;
        match self.pinned {
            Some(interval) => config.with_interval(interval),
            None => config,
        }
    }
}

fn clamp_minutes(minutes: u32) -> u32 {
    let clamped = minutes.clamp(MIN_INTERVAL_MINUTES, MAX_INTERVAL_MINUTES);
    if clamped != minutes {
        warn!(requested = minutes, using = clamped, "Refresh interval out of range");
    }
    clamped
}

fn minutes(count: u32) -> Duration {
    Duration::from_secs(u64::from(count) * 60)
}

/// Runs the watch command.
pub async fn run(args: &WatchArgs, cli: &Cli) -> Result<ExitCode> {
    if cli.provider.is_some() {
        anyhow::bail!("watch follows the enabled providers; use `quotabar config enable|disable`");
    }

    let store = Arc::new(open_store(cli).await?);
    let settings = store.get().await;
    let pinned = args.interval.map(|m| minutes(clamp_minutes(m)));
    let interval = pinned.unwrap_or_else(|| minutes(settings.interval_minutes()));

    info!(interval_secs = interval.as_secs(), pinned = pinned.is_some(), "Starting watch mode");

    let fetcher = build_fetcher(&settings)?;
    let sink = Arc::new(Mutex::new(RenderSink::new(settings.display_mode)));
    let config = Arc::new(WatchConfig { store, pinned });
    let cycle = RefreshCycle::new(Arc::new(fetcher), config, sink.clone());
    let scheduler = RefreshScheduler::new(Arc::new(cycle));

    let formatter = TextFormatter::new(!cli.no_color);
    let mut renders = sink.lock().await.subscribe();

    scheduler.trigger_now(false);
    scheduler.start(interval);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            changed = renders.changed() => {
                if changed.is_err() {
                    break;
                }
                let sink = sink.lock().await;
                draw(&formatter, &sink, scheduler.interval().unwrap_or(interval))?;
            }
            _ = &mut ctrl_c => break,
        }
    }

    scheduler.stop();
    Ok(ExitCode::Success)
}

fn draw(formatter: &TextFormatter, sink: &RenderSink, interval: Duration) -> Result<()> {
    // Clear screen
    print!("\x1b[2J\x1b[H");
    stdout().flush()?;

    let now = chrono::Local::now();
    println!(
        "QuotaBar Watch Mode - {} (refresh: {}m)",
        now.format("%H:%M:%S"),
        interval.as_secs() / 60
    );
    println!("{}", "─".repeat(50));
    println!();

    if let Some(snapshot) = sink.last_snapshot() {
        println!("{}", formatter.format_snapshot(snapshot));
        println!();
    }
    for (_, indicator) in sink.visible() {
        println!("{}", formatter.format_indicator(indicator));
    }

    println!();
    println!("Press Ctrl+C to exit");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quotabar_core::ProviderId;

    #[test]
    fn test_interval_flag_is_clamped() {
        assert_eq!(clamp_minutes(0), 1);
        assert_eq!(clamp_minutes(5), 5);
        assert_eq!(clamp_minutes(600), 60);
    }

    #[tokio::test]
    async fn test_pinned_interval_overrides_settings() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(SettingsStore::load(dir.path().join("settings.json")).await.unwrap());
        store.set_interval_minutes(10).await.unwrap();
        store.set_provider_enabled(ProviderId::Zai, false).await.unwrap();

        let pinned = WatchConfig {
            store: store.clone(),
            pinned: Some(Duration::from_secs(180)),
        };
        let config = pinned.refresh_config().await;
        assert_eq!(config.refresh_interval, Duration::from_secs(180));
        assert!(!config.enabled_providers.contains(&ProviderId::Zai));

        let following = WatchConfig { store, pinned: None };
        assert_eq!(
            following.refresh_config().await.refresh_interval,
            Duration::from_secs(600)
        );
    }
}
