//! Claude payload parser.

use chrono::{DateTime, Utc};
use quotabar_core::{NormalizedMetric, ProviderId};
use serde::Deserialize;

use super::descriptor::{PRIMARY_LABEL, SECONDARY_LABEL};
use crate::de;
use crate::window::{UsageWindow, windowed_line};

/// `{ "five_hour": Window, "seven_day": Window }`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ClaudePayload {
    /// Session window.
    #[serde(default, alias = "session", deserialize_with = "de::lenient")]
    pub five_hour: UsageWindow,
    /// Weekly window.
    #[serde(default, alias = "weekly", deserialize_with = "de::lenient")]
    pub seven_day: UsageWindow,
}

impl ClaudePayload {
    /// Converts the payload into a metric.
    pub fn to_metric(&self, now: DateTime<Utc>) -> NormalizedMetric {
        let mut metric = NormalizedMetric::new(ProviderId::Claude);
        metric.primary_percent = Some(self.five_hour.used);
        metric.secondary_percent = Some(self.seven_day.used);
        metric.tooltip_lines.push(windowed_line(
            ProviderId::Claude.display_name(),
            &self.five_hour,
            PRIMARY_LABEL,
            &self.seven_day,
            SECONDARY_LABEL,
            now,
        ));
        metric
    }
}
