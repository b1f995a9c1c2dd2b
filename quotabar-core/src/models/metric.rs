//! Normalized per-provider metrics.
//!
//! A [`NormalizedMetric`] is what the metric parser makes of one provider's
//! raw payload: up to two percentages, an optional currency balance, and the
//! tooltip lines describing them. All display formatting happens before the
//! metric leaves the parser, so downstream code only moves numbers and strings.

use serde::{Deserialize, Serialize};

use super::provider::ProviderId;

// ============================================================================
// Normalized Metric
// ============================================================================

/// Normalized usage numbers for one provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedMetric {
    /// The provider this metric belongs to.
    pub provider: ProviderId,
    /// Primary usage percentage (0-100). Absent for balance-only providers.
    pub primary_percent: Option<f64>,
    /// Secondary usage percentage (0-100).
    pub secondary_percent: Option<f64>,
    /// Remaining balance in USD, for balance-only providers.
    pub balance_usd: Option<f64>,
    /// Human-readable tooltip lines, in display order.
    pub tooltip_lines: Vec<String>,
}

impl NormalizedMetric {
    /// Creates an empty metric for a provider.
    pub fn new(provider: ProviderId) -> Self {
        Self {
            provider,
            primary_percent: None,
            secondary_percent: None,
            balance_usd: None,
            tooltip_lines: Vec::new(),
        }
    }

    /// Returns true if any percentage is present.
    pub fn has_percent(&self) -> bool {
        self.primary_percent.is_some() || self.secondary_percent.is_some()
    }

    /// Returns `max(primary, secondary)`, or `None` for balance-only metrics.
    pub fn peak_percent(&self) -> Option<f64> {
        match (self.primary_percent, self.secondary_percent) {
            (Some(p), Some(s)) => Some(p.max(s)),
            (Some(p), None) => Some(p),
            (None, Some(s)) => Some(s),
            (None, None) => None,
        }
    }

    /// Clamps percentages to [0, 100] and replaces non-finite values with 0.
    pub fn sanitize(&mut self) {
        self.primary_percent = self.primary_percent.map(clamp_percent);
        self.secondary_percent = self.secondary_percent.map(clamp_percent);
        if let Some(balance) = self.balance_usd {
            if !balance.is_finite() {
                self.balance_usd = Some(0.0);
            }
        }
    }
}

fn clamp_percent(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

// ============================================================================
// Metric Outcome
// ============================================================================

/// Why a provider contributed no metric this cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "reason", content = "message")]
pub enum Unavailable {
    /// The fetcher output had no entry for the provider.
    Missing,
    /// The fetcher reported an error for the provider.
    Error(String),
}

impl Unavailable {
    /// Returns a short human-readable description.
    pub fn describe(&self) -> String {
        match self {
            Self::Missing => "no data".to_string(),
            Self::Error(message) if message.is_empty() => "error".to_string(),
            Self::Error(message) => message.clone(),
        }
    }
}

/// Result of parsing one provider's raw entry.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricOutcome {
    /// The provider produced a metric.
    Available(NormalizedMetric),
    /// The provider is invisible for this cycle.
    Unavailable(Unavailable),
}

impl MetricOutcome {
    /// Returns the metric, if available.
    pub fn metric(&self) -> Option<&NormalizedMetric> {
        match self {
            Self::Available(metric) => Some(metric),
            Self::Unavailable(_) => None,
        }
    }

    /// Returns true if a metric is available.
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }
}

// ============================================================================
// Formatting
// ============================================================================

/// Formats a percentage for display: `42%`, `37.5%`.
///
/// Integral values print without decimals, anything else with one. Extra
/// decimals are truncated, never rounded up, so a value just under a tier
/// threshold never displays as the threshold itself.
pub fn format_percent(value: f64) -> String {
    // Products landing a hair below a tenth boundary stay on it.
    let shown = ((value * 10.0) + 1e-9).floor() / 10.0;
    if shown.fract() == 0.0 {
        format!("{shown:.0}%")
    } else {
        format!("{shown:.1}%")
    }
}

/// Formats a USD amount with two decimals: `$12.50`.
pub fn format_usd(value: f64) -> String {
    format!("${value:.2}")
}
