//! Aggregate snapshot of one refresh cycle.
//!
//! An [`AggregateSnapshot`] lives for exactly one cycle: it is built by the
//! provider aggregator (or by the cycle itself when the fetch fails), handed
//! to the render sink, and superseded by the next cycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::metric::{NormalizedMetric, Unavailable};
use super::provider::ProviderId;
use super::tier::ColorTier;

// ============================================================================
// Snapshot Status
// ============================================================================

/// Overall state of a cycle, as far as rendering is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "message")]
pub enum SnapshotStatus {
    /// No provider is enabled; indicators render as "off".
    Disabled,
    /// Providers are enabled but none produced data.
    NoData,
    /// The fetch itself failed (transport, exit status, malformed output).
    Failed(String),
    /// At least one provider produced data.
    Ready,
}

impl SnapshotStatus {
    /// Returns true if at least one provider produced data.
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

// ============================================================================
// Peak Reading
// ============================================================================

/// The values one indicator displays, with the tier derived from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakReading {
    /// The provider this reading represents.
    pub provider: ProviderId,
    /// Peak primary percentage.
    pub primary: Option<f64>,
    /// Peak secondary percentage.
    pub secondary: Option<f64>,
    /// Balance for balance-only providers.
    pub balance_usd: Option<f64>,
    /// Tier from `max(primary, secondary)`.
    pub tier: ColorTier,
}

impl PeakReading {
    /// Builds the reading for a provider's own metric.
    pub fn from_metric(metric: &NormalizedMetric) -> Self {
        Self {
            provider: metric.provider,
            primary: metric.primary_percent,
            secondary: metric.secondary_percent,
            balance_usd: metric.balance_usd,
            tier: ColorTier::from_peak(metric.peak_percent()),
        }
    }
}

// ============================================================================
// Aggregate Snapshot
// ============================================================================

/// Everything one refresh cycle produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateSnapshot {
    /// Overall status.
    pub status: SnapshotStatus,
    /// Enabled providers, in priority order.
    pub enabled: Vec<ProviderId>,
    /// Metrics of enabled providers that produced data.
    pub metrics: BTreeMap<ProviderId, NormalizedMetric>,
    /// Enabled providers that produced no data, with the reason.
    pub unavailable: BTreeMap<ProviderId, Unavailable>,
    /// Highest-priority available provider (drives the combined indicator).
    pub prioritized: Option<ProviderId>,
    /// One reading per available provider.
    pub peaks: BTreeMap<ProviderId, PeakReading>,
    /// When the snapshot was built.
    pub updated_at: DateTime<Utc>,
}

impl AggregateSnapshot {
    /// A snapshot for "no provider enabled".
    pub fn disabled() -> Self {
        Self::empty(SnapshotStatus::Disabled, Vec::new())
    }

    /// A snapshot for a cycle whose fetch failed outright.
    pub fn failed(enabled: Vec<ProviderId>, message: impl Into<String>) -> Self {
        Self::empty(SnapshotStatus::Failed(message.into()), enabled)
    }

    fn empty(status: SnapshotStatus, enabled: Vec<ProviderId>) -> Self {
        Self {
            status,
            enabled,
            metrics: BTreeMap::new(),
            unavailable: BTreeMap::new(),
            prioritized: None,
            peaks: BTreeMap::new(),
            updated_at: Utc::now(),
        }
    }

    /// Returns the reading that drives the combined indicator.
    pub fn combined_peak(&self) -> Option<&PeakReading> {
        self.prioritized.and_then(|id| self.peaks.get(&id))
    }

    /// Returns the reading for a provider's own indicator.
    pub fn peak(&self, provider: ProviderId) -> Option<&PeakReading> {
        self.peaks.get(&provider)
    }

    /// Returns the combined indicator's color tier.
    pub fn combined_tier(&self) -> ColorTier {
        self.combined_peak().map_or(ColorTier::Normal, |p| p.tier)
    }

    /// Collects tooltip lines of all available providers, in priority order.
    pub fn tooltip_lines(&self) -> Vec<&str> {
        self.enabled
            .iter()
            .filter_map(|id| self.metrics.get(id))
            .flat_map(|m| m.tooltip_lines.iter().map(String::as_str))
            .collect()
    }

    /// Available providers in priority order.
    pub fn available(&self) -> impl Iterator<Item = ProviderId> + '_ {
        self.enabled
            .iter()
            .copied()
            .filter(|id| self.metrics.contains_key(id))
    }
}
