//! Metric parser.
//!
//! Turns one provider's raw entry into a [`MetricOutcome`]. Pure apart
//! from reading the clock in [`parse`]; use [`parse_at`] for a fixed time.

use chrono::{DateTime, Utc};
use quotabar_core::{MetricOutcome, ProviderId, RawProviderResult, Unavailable};
use tracing::trace;

use crate::payload::ProviderPayload;

/// Parses a provider's entry using the current time for reset countdowns.
pub fn parse(provider: ProviderId, raw: Option<&RawProviderResult>) -> MetricOutcome {
    parse_at(provider, raw, Utc::now())
}

/// Parses a provider's entry.
///
/// An absent entry or an error marker yields [`MetricOutcome::Unavailable`];
/// any payload yields a metric with percentages clamped to [0, 100].
pub fn parse_at(
    provider: ProviderId,
    raw: Option<&RawProviderResult>,
    now: DateTime<Utc>,
) -> MetricOutcome {
    let payload = match raw {
        None => return MetricOutcome::Unavailable(Unavailable::Missing),
        Some(RawProviderResult::Error(message)) => {
            return MetricOutcome::Unavailable(Unavailable::Error(message.clone()));
        }
        Some(RawProviderResult::Payload(value)) => value,
    };

    let mut metric = ProviderPayload::decode(provider, payload).to_metric(now);
    metric.sanitize();

    trace!(
        provider = %provider,
        primary = ?metric.primary_percent,
        secondary = ?metric.secondary_percent,
        balance = ?metric.balance_usd,
        "Parsed provider metric"
    );

    MetricOutcome::Available(metric)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: serde_json::Value) -> RawProviderResult {
        RawProviderResult::Payload(value)
    }

    #[test]
    fn test_absent_is_missing() {
        assert_eq!(
            parse(ProviderId::Claude, None),
            MetricOutcome::Unavailable(Unavailable::Missing)
        );
    }

    #[test]
    fn test_error_marker_is_unavailable() {
        let raw = RawProviderResult::Error("token expired".into());
        assert_eq!(
            parse(ProviderId::Codex, Some(&raw)),
            MetricOutcome::Unavailable(Unavailable::Error("token expired".into()))
        );
    }

    #[test]
    fn test_percentages_are_clamped() {
        let raw = payload(json!({"five_hour": {"used": "180%"}, "seven_day": {"used": -3}}));
        let outcome = parse(ProviderId::Claude, Some(&raw));
        let metric = outcome.metric().unwrap();
        assert_eq!(metric.primary_percent, Some(100.0));
        assert_eq!(metric.secondary_percent, Some(0.0));
    }

    #[test]
    fn test_wrong_shape_is_available_with_zero() {
        // A gemini-shaped payload reported under claude.
        let raw = payload(json!({"models": {"pro": {"used": "95%"}}}));
        let outcome = parse(ProviderId::Claude, Some(&raw));
        assert!(outcome.is_available());
        assert_eq!(outcome.metric().unwrap().peak_percent(), Some(0.0));
    }
}
