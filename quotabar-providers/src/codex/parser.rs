//! Codex payload parser.

use chrono::{DateTime, Utc};
use quotabar_core::{NormalizedMetric, ProviderId};
use serde::Deserialize;

use super::descriptor::{PRIMARY_LABEL, SECONDARY_LABEL};
use crate::de;
use crate::window::{UsageWindow, windowed_line};

/// `{ "primary_window": Window, "secondary_window": Window }`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CodexPayload {
    /// Short window.
    #[serde(default, alias = "primary", deserialize_with = "de::lenient")]
    pub primary_window: UsageWindow,
    /// Long window.
    #[serde(default, alias = "secondary", deserialize_with = "de::lenient")]
    pub secondary_window: UsageWindow,
}

impl CodexPayload {
    /// Converts the payload into a metric.
    pub fn to_metric(&self, now: DateTime<Utc>) -> NormalizedMetric {
        let mut metric = NormalizedMetric::new(ProviderId::Codex);
        metric.primary_percent = Some(self.primary_window.used);
        metric.secondary_percent = Some(self.secondary_window.used);
        metric.tooltip_lines.push(windowed_line(
            ProviderId::Codex.display_name(),
            &self.primary_window,
            PRIMARY_LABEL,
            &self.secondary_window,
            SECONDARY_LABEL,
            now,
        ));
        metric
    }
}
