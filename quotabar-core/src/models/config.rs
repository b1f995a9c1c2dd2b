//! Per-cycle refresh configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use super::provider::ProviderId;
use crate::error::CoreError;

/// Shortest allowed refresh interval, in seconds.
pub const MIN_REFRESH_INTERVAL_SECS: u64 = 60;

// ============================================================================
// Display Mode
// ============================================================================

/// How many indicators are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    /// One combined indicator driven by the prioritized provider.
    #[default]
    Single,
    /// One indicator per available provider, with a fallback indicator.
    PerProvider,
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayMode::Single => write!(f, "single"),
            DisplayMode::PerProvider => write!(f, "per-provider"),
        }
    }
}

impl FromStr for DisplayMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "single" | "combined" => Ok(Self::Single),
            "per-provider" | "per_provider" | "multi" => Ok(Self::PerProvider),
            other => Err(CoreError::InvalidDisplayMode(other.to_string())),
        }
    }
}

// ============================================================================
// Refresh Config
// ============================================================================

/// Immutable configuration snapshot, read fresh at the start of every cycle.
#[derive(Clone, PartialEq)]
pub struct RefreshConfig {
    /// Enabled providers, in priority order without duplicates.
    pub enabled_providers: Vec<ProviderId>,
    /// Whether the fetcher may serve cached data.
    pub use_cache: bool,
    /// Interval between scheduled cycles (never below 60 seconds).
    pub refresh_interval: Duration,
    /// Indicator layout.
    pub display_mode: DisplayMode,
    /// Optional per-provider secrets handed to the fetcher.
    pub credentials: BTreeMap<ProviderId, String>,
}

impl RefreshConfig {
    /// Creates a config for the given providers with default options.
    pub fn new<I>(enabled: I) -> Self
    where
        I: IntoIterator<Item = ProviderId>,
    {
        Self {
            enabled_providers: ProviderId::in_priority_order(enabled),
            use_cache: true,
            refresh_interval: Duration::from_secs(120),
            display_mode: DisplayMode::default(),
            credentials: BTreeMap::new(),
        }
    }

    /// Sets the refresh interval, clamped to the 60 second minimum.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval.max(Duration::from_secs(MIN_REFRESH_INTERVAL_SECS));
        self
    }

    /// Sets the cache flag.
    #[must_use]
    pub fn with_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }

    /// Sets the display mode.
    #[must_use]
    pub fn with_display_mode(mut self, mode: DisplayMode) -> Self {
        self.display_mode = mode;
        self
    }

    /// Returns true if no provider is enabled.
    pub fn is_disabled(&self) -> bool {
        self.enabled_providers.is_empty()
    }

    /// Returns the interval in whole seconds.
    pub fn interval_secs(&self) -> u64 {
        self.refresh_interval.as_secs()
    }
}

impl fmt::Debug for RefreshConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Secrets never reach logs.
        let credential_keys: Vec<ProviderId> = self.credentials.keys().copied().collect();
        f.debug_struct("RefreshConfig")
            .field("enabled_providers", &self.enabled_providers)
            .field("use_cache", &self.use_cache)
            .field("refresh_interval", &self.refresh_interval)
            .field("display_mode", &self.display_mode)
            .field("credentials", &credential_keys)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_orders_providers() {
        let config = RefreshConfig::new([ProviderId::OpenRouter, ProviderId::Claude]);
        assert_eq!(
            config.enabled_providers,
            vec![ProviderId::Claude, ProviderId::OpenRouter]
        );
        assert!(!config.is_disabled());
    }

    #[test]
    fn test_interval_minimum() {
        let config = RefreshConfig::new(Vec::<ProviderId>::new()).with_interval(Duration::from_secs(10));
        assert_eq!(config.interval_secs(), MIN_REFRESH_INTERVAL_SECS);
        assert!(config.is_disabled());
    }

    #[test]
    fn test_debug_redacts_credentials() {
        let mut config = RefreshConfig::new([ProviderId::Zai]);
        config
            .credentials
            .insert(ProviderId::Zai, "sk-very-secret".to_string());
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-very-secret"));
        assert!(debug.contains("Zai"));
    }

    #[test]
    fn test_display_mode_parse() {
        assert_eq!("single".parse::<DisplayMode>().unwrap(), DisplayMode::Single);
        assert_eq!(
            "per-provider".parse::<DisplayMode>().unwrap(),
            DisplayMode::PerProvider
        );
        assert!("grid".parse::<DisplayMode>().is_err());
    }
}
