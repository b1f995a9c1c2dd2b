//! Usage windows.
//!
//! A window is the common building block of percentage payloads:
//! `{ "used": "42%", "resets_in": "2h 15m" }` or
//! `{ "used": "42%", "resets_at": "2025-01-15T10:00:00Z" }`.

use chrono::{DateTime, Duration, Utc};
use quotabar_core::format_percent;
use serde::Deserialize;
use tracing::debug;

use crate::de;

// ============================================================================
// Usage Window
// ============================================================================

/// One usage window as reported by the fetcher.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UsageWindow {
    /// Percentage used (unclamped, 0 when missing).
    #[serde(
        default,
        alias = "used_percent",
        alias = "percent",
        alias = "percentage",
        deserialize_with = "de::percent"
    )]
    pub used: f64,
    /// Human-readable countdown supplied by the fetcher.
    #[serde(
        default,
        alias = "reset_in",
        alias = "time_until_reset",
        deserialize_with = "de::lenient"
    )]
    pub resets_in: Option<String>,
    /// Reset timestamp (RFC 3339).
    #[serde(
        default,
        alias = "reset_at",
        alias = "reset_time",
        deserialize_with = "de::lenient"
    )]
    pub resets_at: Option<String>,
}

impl UsageWindow {
    /// Creates a window with only a percentage.
    pub fn new(used: f64) -> Self {
        Self {
            used,
            ..Self::default()
        }
    }

    /// Returns the percentage clamped to [0, 100].
    pub fn percent(&self) -> f64 {
        self.used.clamp(0.0, 100.0)
    }

    /// Returns the reset countdown, if the fetcher gave one.
    ///
    /// A textual `resets_in` wins over `resets_at`, which is converted to a
    /// countdown relative to `now`.
    pub fn reset_countdown(&self, now: DateTime<Utc>) -> Option<String> {
        if let Some(text) = self.resets_in.as_deref().map(str::trim) {
            if !text.is_empty() {
                return Some(text.to_string());
            }
        }

        let raw = self.resets_at.as_deref()?.trim();
        match DateTime::parse_from_rfc3339(raw) {
            Ok(at) => Some(format_countdown(at.with_timezone(&Utc) - now)),
            Err(e) => {
                debug!(resets_at = %raw, error = %e, "Ignoring unparsable reset timestamp");
                None
            }
        }
    }

    /// Formats the window for a tooltip: `42% (5h)` or `42% (5h, resets in 2h 15m)`.
    pub fn describe(&self, label: &str, now: DateTime<Utc>) -> String {
        let percent = format_percent(self.percent());
        match self.reset_countdown(now) {
            Some(countdown) => format!("{percent} ({label}, resets in {countdown})"),
            None => format!("{percent} ({label})"),
        }
    }

    /// Formats the reset suffix on its own: ` (resets in 2h 15m)`, or empty.
    pub fn reset_suffix(&self, now: DateTime<Utc>) -> String {
        self.reset_countdown(now)
            .map(|countdown| format!(" (resets in {countdown})"))
            .unwrap_or_default()
    }
}

// ============================================================================
// Countdown Formatting
// ============================================================================

/// Formats a remaining duration compactly: `45m`, `2h 15m`, `3d 4h`.
///
/// Past or zero durations format as `0m`.
pub fn format_countdown(remaining: Duration) -> String {
    let minutes = remaining.num_minutes().max(0);
    let days = minutes / (24 * 60);
    let hours = (minutes / 60) % 24;
    let mins = minutes % 60;

    if days > 0 {
        if hours > 0 {
            format!("{days}d {hours}h")
        } else {
            format!("{days}d")
        }
    } else if hours > 0 {
        format!("{hours}h {mins}m")
    } else {
        format!("{mins}m")
    }
}

/// Formats a two-window tooltip line: `- Claude: 42% (5h) | 10% (7d)`.
pub(crate) fn windowed_line(
    name: &str,
    primary: &UsageWindow,
    primary_label: &str,
    secondary: &UsageWindow,
    secondary_label: &str,
    now: DateTime<Utc>,
) -> String {
    format!(
        "- {name}: {} | {}",
        primary.describe(primary_label, now),
        secondary.describe(secondary_label, now)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_format_countdown() {
        assert_eq!(format_countdown(Duration::minutes(45)), "45m");
        assert_eq!(format_countdown(Duration::minutes(135)), "2h 15m");
        assert_eq!(format_countdown(Duration::hours(3)), "3h 0m");
        assert_eq!(format_countdown(Duration::hours(76)), "3d 4h");
        assert_eq!(format_countdown(Duration::days(2)), "2d");
        assert_eq!(format_countdown(Duration::minutes(-5)), "0m");
    }

    #[test]
    fn test_deserialize_with_aliases() {
        let window: UsageWindow =
            serde_json::from_str(r#"{"used_percent": 55, "reset_in": "1h"}"#).unwrap();
        assert_eq!(window.used, 55.0);
        assert_eq!(window.resets_in.as_deref(), Some("1h"));
    }

    #[test]
    fn test_deserialize_malformed_fields() {
        let window: UsageWindow =
            serde_json::from_str(r#"{"used": {"oops": 1}, "resets_in": 42, "resets_at": false}"#)
                .unwrap();
        assert_eq!(window, UsageWindow::default());
    }

    #[test]
    fn test_countdown_from_timestamp() {
        let window = UsageWindow {
            resets_at: Some("2025-01-15T10:15:00Z".into()),
            ..UsageWindow::new(42.0)
        };
        assert_eq!(window.reset_countdown(now()).as_deref(), Some("2h 15m"));
        assert_eq!(window.describe("5h", now()), "42% (5h, resets in 2h 15m)");
    }

    #[test]
    fn test_countdown_text_wins() {
        let window = UsageWindow {
            resets_in: Some("4h 2m".into()),
            resets_at: Some("2025-01-15T10:15:00Z".into()),
            ..UsageWindow::new(42.0)
        };
        assert_eq!(window.reset_countdown(now()).as_deref(), Some("4h 2m"));
    }

    #[test]
    fn test_bad_timestamp_is_ignored() {
        let window = UsageWindow {
            resets_at: Some("next tuesday".into()),
            ..UsageWindow::new(10.0)
        };
        assert!(window.reset_countdown(now()).is_none());
        assert_eq!(window.describe("7d", now()), "10% (7d)");
        assert_eq!(window.reset_suffix(now()), "");
    }

    #[test]
    fn test_describe_clamps() {
        assert_eq!(UsageWindow::new(150.0).describe("5h", now()), "100% (5h)");
    }
}
