//! One refresh cycle: config, fetch, aggregate, render.

use async_trait::async_trait;
use quotabar_core::{AggregateSnapshot, RefreshConfig};
use quotabar_fetch::{FetchRequest, QuotaFetcher};
use quotabar_providers::aggregate;
use quotabar_store::SettingsStore;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, RwLock, watch};
use tracing::{debug, error, info};

use crate::render::RenderSink;

// ============================================================================
// Config Source
// ============================================================================

/// Provides the configuration snapshot at the start of each cycle.
#[async_trait]
pub trait ConfigSource: Send + Sync {
    /// Returns this cycle's configuration.
    async fn refresh_config(&self) -> RefreshConfig;
}

#[async_trait]
impl ConfigSource for SettingsStore {
    async fn refresh_config(&self) -> RefreshConfig {
        SettingsStore::refresh_config(self).await
    }
}

/// A fixed configuration.
#[async_trait]
impl ConfigSource for RefreshConfig {
    async fn refresh_config(&self) -> RefreshConfig {
        self.clone()
    }
}

// ============================================================================
// Refresh Cycle
// ============================================================================

/// Runs fetch+aggregate+render cycles against a shared render sink.
///
/// Cycles may overlap; whichever finishes last wins the sink.
pub struct RefreshCycle {
    fetcher: Arc<dyn QuotaFetcher>,
    config: Arc<dyn ConfigSource>,
    sink: Arc<Mutex<RenderSink>>,
    last_raw: RwLock<Option<String>>,
    runs: AtomicU64,
    interval: watch::Sender<Option<Duration>>,
}

impl RefreshCycle {
    /// Creates a cycle runner.
    pub fn new(
        fetcher: Arc<dyn QuotaFetcher>,
        config: Arc<dyn ConfigSource>,
        sink: Arc<Mutex<RenderSink>>,
    ) -> Self {
        let (interval, _) = watch::channel(None);
        Self {
            fetcher,
            config,
            sink,
            last_raw: RwLock::new(None),
            runs: AtomicU64::new(0),
            interval,
        }
    }

    /// The shared render sink.
    pub fn sink(&self) -> &Arc<Mutex<RenderSink>> {
        &self.sink
    }

    /// Runs one cycle and returns the snapshot it rendered.
    ///
    /// Never fails: a fetch failure renders the error state and is logged.
    pub async fn run(&self, bypass_cache: bool) -> AggregateSnapshot {
        let run = self.runs.fetch_add(1, Ordering::Relaxed) + 1;
        let config = self.config.refresh_config().await;
        debug!(run, bypass_cache, config = ?config, "Starting refresh cycle");
        let interval = config.refresh_interval;
        self.interval
            .send_if_modified(|current| current.replace(interval) != Some(interval));

        let snapshot = if config.is_disabled() {
            info!(run, "All providers disabled, skipping fetch");
            AggregateSnapshot::disabled()
        } else {
            let request = FetchRequest::from_config(&config, bypass_cache);
            match self.fetcher.fetch(&request).await {
                Ok(output) => {
                    debug!(
                        run,
                        duration_ms = output.duration.as_millis(),
                        "Fetch succeeded"
                    );
                    let snapshot = aggregate(&config.enabled_providers, &output.results);
                    *self.last_raw.write().await = Some(output.raw);
                    snapshot
                }
                Err(e) => {
                    error!(run, fetcher = %self.fetcher.name(), error = %e, "Fetch failed");
                    AggregateSnapshot::failed(config.enabled_providers.clone(), e.to_string())
                }
            }
        };

        self.sink
            .lock()
            .await
            .render_as(config.display_mode, &snapshot);

        info!(
            run,
            status = ?snapshot.status,
            prioritized = ?snapshot.prioritized,
            "Refresh cycle complete"
        );
        snapshot
    }

    /// Raw stdout of the latest successful fetch.
    pub async fn last_raw(&self) -> Option<String> {
        self.last_raw.read().await.clone()
    }

    /// Watches the refresh interval read by the most recent cycle.
    ///
    /// `None` until the first cycle has read its config.
    pub fn subscribe_interval(&self) -> watch::Receiver<Option<Duration>> {
        self.interval.subscribe()
    }

    /// Number of cycles started.
    pub fn runs(&self) -> u64 {
        self.runs.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::IndicatorSlot;
    use crate::testing::StubFetcher;
    use quotabar_core::{DisplayMode, ProviderId, SnapshotStatus};
    use quotabar_fetch::FetchError;

    fn cycle(fetcher: Arc<StubFetcher>, config: RefreshConfig) -> RefreshCycle {
        RefreshCycle::new(
            fetcher,
            Arc::new(config),
            Arc::new(Mutex::new(RenderSink::new(DisplayMode::Single))),
        )
    }

    #[tokio::test]
    async fn test_disabled_skips_fetch() {
        let fetcher = Arc::new(StubFetcher::ok("{}"));
        let cycle = cycle(fetcher.clone(), RefreshConfig::new(Vec::<ProviderId>::new()));

        let snapshot = cycle.run(false).await;

        assert_eq!(snapshot.status, SnapshotStatus::Disabled);
        assert_eq!(fetcher.calls(), 0);
        let sink = cycle.sink().lock().await;
        assert_eq!(sink.indicator(IndicatorSlot::Combined).unwrap().text, "Off");
    }

    #[tokio::test]
    async fn test_successful_cycle_renders_and_keeps_raw() {
        let raw = r#"{"claude": {"five_hour": {"used": "42%"}, "seven_day": {"used": "10%"}}}"#;
        let fetcher = Arc::new(StubFetcher::ok(raw));
        let cycle = cycle(fetcher.clone(), RefreshConfig::new([ProviderId::Claude]));

        let snapshot = cycle.run(false).await;

        assert_eq!(snapshot.prioritized, Some(ProviderId::Claude));
        assert_eq!(cycle.last_raw().await.as_deref(), Some(raw));
        let sink = cycle.sink().lock().await;
        assert_eq!(sink.indicator(IndicatorSlot::Combined).unwrap().text, "42%|10%");
    }

    #[tokio::test]
    async fn test_bypass_cache_reaches_request() {
        let fetcher = Arc::new(StubFetcher::ok("{}"));
        let cycle = cycle(
            fetcher.clone(),
            RefreshConfig::new([ProviderId::Zai]).with_cache(true),
        );

        cycle.run(false).await;
        cycle.run(true).await;

        let requests = fetcher.requests();
        assert!(requests[0].use_cache);
        assert!(!requests[1].use_cache);
        assert_eq!(cycle.runs(), 2);
    }

    #[tokio::test]
    async fn test_fetch_failure_renders_error() {
        let fetcher = Arc::new(StubFetcher::err(|| {
            FetchError::InvalidResponse("not an object".into())
        }));
        let cycle = cycle(fetcher, RefreshConfig::new([ProviderId::Codex]));

        let snapshot = cycle.run(true).await;

        assert!(matches!(snapshot.status, SnapshotStatus::Failed(_)));
        assert!(cycle.last_raw().await.is_none());
        let sink = cycle.sink().lock().await;
        assert_eq!(sink.indicator(IndicatorSlot::Combined).unwrap().text, "Err");
    }

    #[tokio::test]
    async fn test_cycle_publishes_configured_interval() {
        let fetcher = Arc::new(StubFetcher::ok("{}"));
        let cycle = cycle(
            fetcher,
            RefreshConfig::new([ProviderId::Zai]).with_interval(Duration::from_secs(600)),
        );
        let mut interval = cycle.subscribe_interval();
        assert_eq!(*interval.borrow(), None);

        cycle.run(false).await;
        assert!(interval.has_changed().unwrap());
        assert_eq!(*interval.borrow_and_update(), Some(Duration::from_secs(600)));

        // Same interval again: no notification.
        cycle.run(false).await;
        assert!(!interval.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_display_mode_follows_config() {
        let fetcher = Arc::new(StubFetcher::ok(r#"{"zai": {"token_quota": {"percentage": 50}}}"#));
        let cycle = cycle(
            fetcher,
            RefreshConfig::new([ProviderId::Zai]).with_display_mode(DisplayMode::PerProvider),
        );

        cycle.run(false).await;

        let sink = cycle.sink().lock().await;
        assert_eq!(sink.mode(), DisplayMode::PerProvider);
        assert_eq!(
            sink.visible()[0].0,
            IndicatorSlot::Provider(ProviderId::Zai)
        );
    }
}
