//! Color tiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Peak percentage at which an indicator turns to the warning tier.
pub const WARNING_THRESHOLD: f64 = 70.0;

/// Peak percentage at which an indicator turns to the critical tier.
pub const CRITICAL_THRESHOLD: f64 = 90.0;

/// Usage severity used to tint an indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ColorTier {
    /// Below 70%.
    #[default]
    Normal,
    /// From 70% up to (not including) 90%.
    Warning,
    /// 90% and above.
    Critical,
}

impl ColorTier {
    /// Classifies a peak percentage.
    pub fn from_percent(peak: f64) -> Self {
        if peak >= CRITICAL_THRESHOLD {
            Self::Critical
        } else if peak >= WARNING_THRESHOLD {
            Self::Warning
        } else {
            Self::Normal
        }
    }

    /// Classifies an optional peak; no percentage means normal.
    pub fn from_peak(peak: Option<f64>) -> Self {
        peak.map_or(Self::Normal, Self::from_percent)
    }

    /// Returns a lowercase label (also used as a CSS class by status bars).
    pub fn label(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }

    /// Returns the host theme color key, or `None` to keep the default color.
    pub fn theme_color(&self) -> Option<&'static str> {
        match self {
            Self::Normal => None,
            Self::Warning => Some("statusBarItem.warningForeground"),
            Self::Critical => Some("statusBarItem.errorForeground"),
        }
    }
}

impl fmt::Display for ColorTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(ColorTier::from_percent(0.0), ColorTier::Normal);
        assert_eq!(ColorTier::from_percent(50.0), ColorTier::Normal);
        assert_eq!(ColorTier::from_percent(69.9), ColorTier::Normal);
        assert_eq!(ColorTier::from_percent(70.0), ColorTier::Warning);
        assert_eq!(ColorTier::from_percent(89.9), ColorTier::Warning);
        assert_eq!(ColorTier::from_percent(90.0), ColorTier::Critical);
        assert_eq!(ColorTier::from_percent(100.0), ColorTier::Critical);
    }

    #[test]
    fn test_tier_is_monotonic() {
        let mut previous = ColorTier::Normal;
        for step in 0_u32..=1000 {
            let tier = ColorTier::from_percent(f64::from(step) / 10.0);
            assert!(tier >= previous, "tier dropped at {}", f64::from(step) / 10.0);
            previous = tier;
        }
    }

    #[test]
    fn test_no_peak_is_normal() {
        assert_eq!(ColorTier::from_peak(None), ColorTier::Normal);
        assert_eq!(ColorTier::from_peak(Some(95.0)), ColorTier::Critical);
    }

    #[test]
    fn test_theme_color() {
        assert!(ColorTier::Normal.theme_color().is_none());
        assert_eq!(
            ColorTier::Critical.theme_color(),
            Some("statusBarItem.errorForeground")
        );
    }
}
