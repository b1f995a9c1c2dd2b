//! Z.AI payload parser.

use chrono::{DateTime, Utc};
use quotabar_core::{NormalizedMetric, ProviderId, format_percent};
use serde::Deserialize;

use crate::de;
use crate::window::UsageWindow;

/// `{ "token_quota": { "percentage": 37.5, "resets_in"?: "..." } }`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ZaiPayload {
    /// Share of the token quota in use.
    #[serde(default, alias = "tokens", deserialize_with = "de::lenient")]
    pub token_quota: UsageWindow,
}

impl ZaiPayload {
    /// Converts the payload into a metric.
    pub fn to_metric(&self, now: DateTime<Utc>) -> NormalizedMetric {
        let mut metric = NormalizedMetric::new(ProviderId::Zai);
        metric.primary_percent = Some(self.token_quota.used);
        metric.tooltip_lines.push(format!(
            "- {}: {}{}",
            ProviderId::Zai.display_name(),
            format_percent(self.token_quota.percent()),
            self.token_quota.reset_suffix(now)
        ));
        metric
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::de::decode;
    use serde_json::json;

    #[test]
    fn test_parse_zai() {
        let payload: ZaiPayload = decode(&json!({"token_quota": {"percentage": 37.5}}));
        let metric = payload.to_metric(Utc::now());
        assert_eq!(metric.primary_percent, Some(37.5));
        assert_eq!(metric.secondary_percent, None);
        assert_eq!(metric.tooltip_lines, vec!["- Z.AI: 37.5%"]);
    }

    #[test]
    fn test_parse_zai_with_reset() {
        let payload: ZaiPayload = decode(&json!({
            "token_quota": {"percentage": 80, "resets_in": "6d"}
        }));
        let metric = payload.to_metric(Utc::now());
        assert_eq!(metric.tooltip_lines, vec!["- Z.AI: 80% (resets in 6d)"]);
    }

    #[test]
    fn test_parse_zai_missing_quota() {
        let payload: ZaiPayload = decode(&json!({"plan": "lite"}));
        assert_eq!(payload.to_metric(Utc::now()).primary_percent, Some(0.0));
    }
}
