//! Refresh scheduler.
//!
//! Owns a single recurring timer that starts refresh cycles. The timer is a
//! tokio task; replacing it aborts the old task, so a rescheduled interval
//! counts from the moment of rescheduling.
//!
//! Every cycle re-reads its config. When the interval it reads differs from
//! the armed one, the timer re-arms at the new interval counting from that
//! moment, so edits made by another process apply without a restart.
//!
//! Scheduled ticks skip while a cycle is in flight. Manual triggers always
//! run and do not cancel a cycle that is still pending.

use quotabar_core::{AggregateSnapshot, MIN_REFRESH_INTERVAL_SECS};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::cycle::RefreshCycle;

// ============================================================================
// In-Flight Guard
// ============================================================================

/// Clears the in-flight flag when dropped.
struct InFlightGuard(Arc<AtomicBool>);

impl InFlightGuard {
    /// Claims the flag, or returns `None` if a cycle is already in flight.
    fn try_acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        if flag.swap(true, Ordering::AcqRel) {
            None
        } else {
            Some(Self(Arc::clone(flag)))
        }
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

// ============================================================================
// Refresh Scheduler
// ============================================================================

struct Timer {
    task: JoinHandle<()>,
    /// Armed interval in milliseconds; updated by the task when it re-arms.
    armed_ms: Arc<AtomicU64>,
}

fn clamp_interval(interval: Duration) -> Duration {
    interval.max(Duration::from_secs(MIN_REFRESH_INTERVAL_SECS))
}

fn millis(interval: Duration) -> u64 {
    u64::try_from(interval.as_millis()).unwrap_or(u64::MAX)
}

/// A ticker whose first tick is one full interval away.
fn ticker(interval: Duration) -> Interval {
    let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

async fn run_timer(
    cycle: Arc<RefreshCycle>,
    mut configured: watch::Receiver<Option<Duration>>,
    in_flight: Arc<AtomicBool>,
    armed_ms: Arc<AtomicU64>,
    mut interval: Duration,
) {
    let mut ticks = ticker(interval);

    loop {
        tokio::select! {
            _ = ticks.tick() => {
                let Some(guard) = InFlightGuard::try_acquire(&in_flight) else {
                    debug!("Previous refresh still in flight, skipping tick");
                    continue;
                };
                let cycle = Arc::clone(&cycle);
                tokio::spawn(async move {
                    let _guard = guard;
                    cycle.run(false).await;
                });
            }
            Ok(()) = configured.changed() => {
                let next = (*configured.borrow_and_update()).map(clamp_interval);
                if let Some(next) = next.filter(|next| *next != interval) {
                    info!(
                        from_secs = interval.as_secs(),
                        to_secs = next.as_secs(),
                        "Configured interval changed, re-arming timer"
                    );
                    interval = next;
                    ticks = ticker(interval);
                    armed_ms.store(millis(interval), Ordering::Release);
                }
            }
        }
    }
}

/// Recurring refresh timer plus manual triggers.
pub struct RefreshScheduler {
    cycle: Arc<RefreshCycle>,
    timer: Mutex<Option<Timer>>,
    in_flight: Arc<AtomicBool>,
}

impl RefreshScheduler {
    /// Creates a stopped scheduler.
    pub fn new(cycle: Arc<RefreshCycle>) -> Self {
        Self {
            cycle,
            timer: Mutex::new(None),
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The cycle runner.
    pub fn cycle(&self) -> &Arc<RefreshCycle> {
        &self.cycle
    }

    fn timer(&self) -> MutexGuard<'_, Option<Timer>> {
        self.timer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Starts the timer; the first tick fires one interval from now.
    ///
    /// Intervals below 60 seconds are raised to 60 seconds. A running timer
    /// is replaced. Must be called within a tokio runtime.
    pub fn start(&self, interval: Duration) {
        let interval = clamp_interval(interval);
        let armed_ms = Arc::new(AtomicU64::new(millis(interval)));
        let task = tokio::spawn(run_timer(
            Arc::clone(&self.cycle),
            self.cycle.subscribe_interval(),
            Arc::clone(&self.in_flight),
            Arc::clone(&armed_ms),
            interval,
        ));

        if let Some(old) = self.timer().replace(Timer { task, armed_ms }) {
            old.task.abort();
        }
        info!(interval_secs = interval.as_secs(), "Refresh timer started");
    }

    /// Replaces the timer with one at the new interval, counting from now.
    pub fn reschedule(&self, interval: Duration) {
        debug!(interval_secs = interval.as_secs(), "Rescheduling refresh timer");
        self.start(interval);
    }

    /// Stops the timer. Safe to call repeatedly; in-flight cycles finish.
    pub fn stop(&self) {
        if let Some(timer) = self.timer().take() {
            timer.task.abort();
            info!("Refresh timer stopped");
        }
    }

    /// Runs one cycle now, outside the timer cadence.
    pub fn trigger_now(&self, bypass_cache: bool) -> JoinHandle<AggregateSnapshot> {
        debug!(bypass_cache, "Manual refresh triggered");
        let cycle = Arc::clone(&self.cycle);
        let guard = InFlightGuard::try_acquire(&self.in_flight);
        tokio::spawn(async move {
            let _guard = guard;
            cycle.run(bypass_cache).await
        })
    }

    /// Returns true while the timer is armed.
    pub fn is_running(&self) -> bool {
        self.timer().as_ref().is_some_and(|t| !t.task.is_finished())
    }

    /// The armed interval, if running.
    pub fn interval(&self) -> Option<Duration> {
        self.timer()
            .as_ref()
            .map(|t| Duration::from_millis(t.armed_ms.load(Ordering::Acquire)))
    }

    /// Returns true while a cycle holds the in-flight flag.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RenderSink;
    use crate::testing::StubFetcher;
    use crate::cycle::ConfigSource;
    use async_trait::async_trait;
    use quotabar_core::{DisplayMode, ProviderId, RefreshConfig};
    use tokio::sync::Mutex as AsyncMutex;
    use tokio::time::advance;

    /// A config that can be edited between cycles, like a settings file.
    struct EditableConfig(Mutex<RefreshConfig>);

    impl EditableConfig {
        fn new(interval_secs: u64) -> Self {
            Self(Mutex::new(
                RefreshConfig::new([ProviderId::Claude])
                    .with_interval(Duration::from_secs(interval_secs)),
            ))
        }

        fn set_interval(&self, secs: u64) {
            let mut config = self.0.lock().unwrap();
            *config = config.clone().with_interval(Duration::from_secs(secs));
        }
    }

    #[async_trait]
    impl ConfigSource for EditableConfig {
        async fn refresh_config(&self) -> RefreshConfig {
            self.0.lock().unwrap().clone()
        }
    }

    const CLAUDE: &str = r#"{"claude": {"five_hour": {"used": "42%"}}}"#;

    /// A scheduler whose cycles read `interval_secs` from their config.
    fn scheduler(fetcher: Arc<StubFetcher>, interval_secs: u64) -> RefreshScheduler {
        let cycle = RefreshCycle::new(
            fetcher,
            Arc::new(
                RefreshConfig::new([ProviderId::Claude])
                    .with_interval(Duration::from_secs(interval_secs)),
            ),
            Arc::new(AsyncMutex::new(RenderSink::new(DisplayMode::Single))),
        );
        RefreshScheduler::new(Arc::new(cycle))
    }

    /// Lets spawned tasks run to their next timer.
    async fn settle() {
        for _ in 0..20 {
            tokio::task::yield_now().await;
        }
    }

    async fn elapse(secs: u64) {
        advance(Duration::from_secs(secs)).await;
        settle().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_at_interval() {
        let fetcher = Arc::new(StubFetcher::ok(CLAUDE));
        let scheduler = scheduler(fetcher.clone(), 120);
        scheduler.start(Duration::from_secs(120));
        settle().await;

        elapse(119).await;
        assert_eq!(fetcher.calls(), 0);
        elapse(2).await;
        assert_eq!(fetcher.calls(), 1);
        elapse(120).await;
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reschedule_counts_from_now() {
        let fetcher = Arc::new(StubFetcher::ok(CLAUDE));
        let scheduler = scheduler(fetcher.clone(), 300);
        scheduler.start(Duration::from_secs(120));
        settle().await;

        elapse(60).await;
        scheduler.reschedule(Duration::from_secs(300));
        settle().await;
        assert_eq!(scheduler.interval(), Some(Duration::from_secs(300)));

        // The original 120s deadline passes without a tick.
        elapse(299).await;
        assert_eq!(fetcher.calls(), 0);

        elapse(2).await;
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_edited_interval_rearms_on_next_cycle() {
        let fetcher = Arc::new(StubFetcher::ok(CLAUDE));
        let config = Arc::new(EditableConfig::new(120));
        let cycle = RefreshCycle::new(
            fetcher.clone(),
            config.clone(),
            Arc::new(AsyncMutex::new(RenderSink::new(DisplayMode::Single))),
        );
        let scheduler = RefreshScheduler::new(Arc::new(cycle));
        scheduler.start(Duration::from_secs(120));
        settle().await;

        // Edited out of process before the first tick.
        config.set_interval(600);

        elapse(121).await;
        assert_eq!(fetcher.calls(), 1);
        assert_eq!(scheduler.interval(), Some(Duration::from_secs(600)));

        // The old 120s cadence no longer fires.
        elapse(120).await;
        assert_eq!(fetcher.calls(), 1);

        // t=721: 600s after the cycle that read the edit.
        elapse(478).await;
        assert_eq!(fetcher.calls(), 1);
        elapse(2).await;
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unchanged_interval_keeps_cadence() {
        let fetcher = Arc::new(StubFetcher::ok(CLAUDE));
        let config = Arc::new(EditableConfig::new(120));
        let cycle = RefreshCycle::new(
            fetcher.clone(),
            config,
            Arc::new(AsyncMutex::new(RenderSink::new(DisplayMode::Single))),
        );
        let scheduler = RefreshScheduler::new(Arc::new(cycle));
        scheduler.start(Duration::from_secs(120));
        settle().await;

        elapse(121).await;
        elapse(120).await;
        elapse(120).await;
        assert_eq!(fetcher.calls(), 3);
        assert_eq!(scheduler.interval(), Some(Duration::from_secs(120)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_prevents_ticks() {
        let fetcher = Arc::new(StubFetcher::ok(CLAUDE));
        let scheduler = scheduler(fetcher.clone(), 60);
        scheduler.start(Duration::from_secs(60));
        settle().await;
        assert!(scheduler.is_running());

        scheduler.stop();
        scheduler.stop();
        assert!(!scheduler.is_running());
        assert_eq!(scheduler.interval(), None);

        elapse(600).await;
        assert_eq!(fetcher.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_is_clamped() {
        let fetcher = Arc::new(StubFetcher::ok(CLAUDE));
        let scheduler = scheduler(fetcher.clone(), 60);
        scheduler.start(Duration::from_secs(5));
        settle().await;
        assert_eq!(scheduler.interval(), Some(Duration::from_secs(60)));

        elapse(30).await;
        assert_eq!(fetcher.calls(), 0);
        elapse(31).await;
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_skipped_while_in_flight() {
        let fetcher = Arc::new(StubFetcher::ok(CLAUDE).with_delay(Duration::from_secs(90)));
        let scheduler = scheduler(fetcher.clone(), 60);
        scheduler.start(Duration::from_secs(60));
        settle().await;

        // t=61: first cycle starts and takes 90s.
        elapse(61).await;
        assert_eq!(fetcher.calls(), 1);
        assert!(scheduler.is_in_flight());

        // t=121: tick while the first cycle is pending.
        elapse(60).await;
        assert_eq!(fetcher.calls(), 1);

        // t=151: first cycle done. t=181: next tick runs.
        elapse(30).await;
        assert!(!scheduler.is_in_flight());
        elapse(30).await;
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn test_trigger_now_bypasses_cache() {
        let fetcher = Arc::new(StubFetcher::ok(CLAUDE));
        let scheduler = scheduler(fetcher.clone(), 120);

        let snapshot = scheduler.trigger_now(true).await.unwrap();

        assert_eq!(snapshot.prioritized, Some(ProviderId::Claude));
        assert!(!fetcher.requests()[0].use_cache);
        assert!(!scheduler.is_running());
        assert!(!scheduler.is_in_flight());
    }

    #[tokio::test(start_paused = true)]
    async fn test_trigger_now_runs_while_in_flight() {
        let fetcher = Arc::new(StubFetcher::ok(CLAUDE).with_delay(Duration::from_secs(30)));
        let scheduler = scheduler(fetcher.clone(), 120);

        let first = scheduler.trigger_now(false);
        settle().await;
        let second = scheduler.trigger_now(true);
        settle().await;
        assert_eq!(fetcher.calls(), 2);

        elapse(31).await;
        first.await.unwrap();
        second.await.unwrap();
        assert!(!scheduler.is_in_flight());
    }
}
