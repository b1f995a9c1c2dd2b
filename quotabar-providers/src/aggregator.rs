//! Provider aggregator.
//!
//! Runs the metric parser over every enabled provider and decides what the
//! indicators show:
//!
//! 1. Every enabled provider is parsed, so tooltips and per-provider
//!    indicators have data even when a single indicator is rendered.
//! 2. The prioritized provider is the first enabled provider, in fixed
//!    priority order, that produced a metric.
//! 3. Each available provider gets its own [`PeakReading`]; there is no
//!    blending across providers.
//! 4. Each reading's tier comes from its own peak.

use chrono::{DateTime, Utc};
use quotabar_core::{
    AggregateSnapshot, MetricOutcome, PeakReading, ProviderId, RawResults, SnapshotStatus,
};
use std::collections::BTreeMap;
use tracing::debug;

use crate::parser::parse_at;

/// Aggregates one cycle's results using the current time.
pub fn aggregate(enabled: &[ProviderId], results: &RawResults) -> AggregateSnapshot {
    aggregate_at(enabled, results, Utc::now())
}

/// Aggregates one cycle's results.
///
/// `enabled` may be in any order and contain duplicates. Results for
/// providers that are not enabled are ignored. Given the same inputs and
/// `now`, the output is identical.
pub fn aggregate_at(
    enabled: &[ProviderId],
    results: &RawResults,
    now: DateTime<Utc>,
) -> AggregateSnapshot {
    let enabled = ProviderId::in_priority_order(enabled.iter().copied());
    if enabled.is_empty() {
        debug!("No providers enabled");
        let mut snapshot = AggregateSnapshot::disabled();
        snapshot.updated_at = now;
        return snapshot;
    }

    let mut metrics = BTreeMap::new();
    let mut unavailable = BTreeMap::new();
    for &provider in &enabled {
        match parse_at(provider, results.get(provider), now) {
            MetricOutcome::Available(metric) => {
                metrics.insert(provider, metric);
            }
            MetricOutcome::Unavailable(reason) => {
                debug!(provider = %provider, reason = %reason.describe(), "Provider unavailable");
                unavailable.insert(provider, reason);
            }
        }
    }

    // `enabled` is already in priority order.
    let prioritized = enabled.iter().copied().find(|id| metrics.contains_key(id));

    let peaks: BTreeMap<ProviderId, PeakReading> = metrics
        .iter()
        .map(|(id, metric)| (*id, PeakReading::from_metric(metric)))
        .collect();

    let status = if metrics.is_empty() {
        SnapshotStatus::NoData
    } else {
        SnapshotStatus::Ready
    };

    debug!(
        enabled = enabled.len(),
        available = metrics.len(),
        prioritized = ?prioritized,
        "Aggregated provider results"
    );

    AggregateSnapshot {
        status,
        enabled,
        metrics,
        unavailable,
        prioritized,
        peaks,
        updated_at: now,
    }
}
