//! User settings store.
//!
//! Manages user settings with persistence and change notification.

use quotabar_core::{DisplayMode, ProviderId, RefreshConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{RwLock, watch};
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::persistence::{default_script_path, default_settings_path, load_json, save_json};

/// Default refresh interval, in minutes.
pub const DEFAULT_INTERVAL_MINUTES: u32 = 2;

/// Shortest accepted refresh interval, in minutes.
pub const MIN_INTERVAL_MINUTES: u32 = 1;

/// Longest accepted refresh interval, in minutes.
pub const MAX_INTERVAL_MINUTES: u32 = 60;

// ============================================================================
// Settings Types
// ============================================================================

/// User settings.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Enabled providers.
    pub enabled_providers: Vec<ProviderId>,

    /// Let the fetcher answer from its short-lived cache (fresh for <60s).
    pub use_cache: bool,

    /// Refresh interval in whole minutes (1-60).
    pub refresh_interval_minutes: u32,

    /// One combined indicator or one per provider.
    pub display_mode: DisplayMode,

    /// Optional per-provider secrets handed to the fetcher.
    pub credentials: BTreeMap<ProviderId, String>,

    /// How to run the quota fetcher.
    pub fetcher: FetcherSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled_providers: ProviderId::all().to_vec(),
            use_cache: true,
            refresh_interval_minutes: DEFAULT_INTERVAL_MINUTES,
            display_mode: DisplayMode::default(),
            credentials: BTreeMap::new(),
            fetcher: FetcherSettings::default(),
        }
    }
}

impl Settings {
    /// Returns the refresh interval in minutes, clamped to 1-60.
    pub fn interval_minutes(&self) -> u32 {
        let minutes = self.refresh_interval_minutes;
        if (MIN_INTERVAL_MINUTES..=MAX_INTERVAL_MINUTES).contains(&minutes) {
            minutes
        } else {
            let clamped = minutes.clamp(MIN_INTERVAL_MINUTES, MAX_INTERVAL_MINUTES);
            warn!(
                configured = minutes,
                using = clamped,
                "Refresh interval out of range"
            );
            clamped
        }
    }

    /// Returns true if the provider is enabled.
    pub fn is_enabled(&self, provider: ProviderId) -> bool {
        self.enabled_providers.contains(&provider)
    }

    /// Enables or disables a provider, keeping the list in priority order.
    pub fn set_enabled(&mut self, provider: ProviderId, enabled: bool) {
        let mut providers = std::mem::take(&mut self.enabled_providers);
        providers.retain(|p| *p != provider);
        if enabled {
            providers.push(provider);
        }
        self.enabled_providers = ProviderId::in_priority_order(providers);
    }

    /// Builds the immutable per-cycle configuration snapshot.
    pub fn to_refresh_config(&self) -> RefreshConfig {
        let mut config = RefreshConfig::new(self.enabled_providers.iter().copied())
            .with_cache(self.use_cache)
            .with_interval(Duration::from_secs(u64::from(self.interval_minutes()) * 60))
            .with_display_mode(self.display_mode);
        config.credentials = self
            .credentials
            .iter()
            .filter(|(_, secret)| !secret.trim().is_empty())
            .map(|(id, secret)| (*id, secret.trim().to_string()))
            .collect();
        config
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("enabled_providers", &self.enabled_providers)
            .field("use_cache", &self.use_cache)
            .field("refresh_interval_minutes", &self.refresh_interval_minutes)
            .field("display_mode", &self.display_mode)
            .field("credentials", &self.credentials.keys().collect::<Vec<_>>())
            .field("fetcher", &self.fetcher)
            .finish()
    }
}

/// How the quota fetcher is invoked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetcherSettings {
    /// Interpreter used to run the script.
    pub program: String,
    /// Script path; `None` means the default location.
    pub script: Option<PathBuf>,
    /// Subprocess timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for FetcherSettings {
    fn default() -> Self {
        Self {
            program: "python3".to_string(),
            script: None,
            timeout_secs: 30,
        }
    }
}

impl FetcherSettings {
    /// Returns the configured script path, or the default one.
    pub fn script_path(&self) -> PathBuf {
        self.script.clone().unwrap_or_else(default_script_path)
    }

    /// Returns the timeout (at least one second).
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

// ============================================================================
// Settings Store
// ============================================================================

/// Store for user settings.
pub struct SettingsStore {
    settings: Arc<RwLock<Settings>>,
    path: PathBuf,
    notify: watch::Sender<u64>,
    version: Arc<RwLock<u64>>,
}

impl SettingsStore {
    /// Creates a store with default settings, backed by `path`.
    pub fn new(path: PathBuf) -> Self {
        Self::with_settings(path, Settings::default())
    }

    fn with_settings(path: PathBuf, settings: Settings) -> Self {
        let (notify, _) = watch::channel(0);
        Self {
            settings: Arc::new(RwLock::new(settings)),
            path,
            notify,
            version: Arc::new(RwLock::new(0)),
        }
    }

    /// Loads settings from the default path.
    ///
    /// # Errors
    ///
    /// Currently infallible; a missing or broken file yields defaults.
    pub async fn load_default() -> Result<Self, StoreError> {
        Self::load(default_settings_path()).await
    }

    /// Loads settings from a path.
    ///
    /// # Errors
    ///
    /// Currently infallible; a missing or broken file yields defaults.
    pub async fn load(path: PathBuf) -> Result<Self, StoreError> {
        let settings = if path.exists() {
            info!(path = %path.display(), "Loading settings");
            load_json(&path).await.unwrap_or_else(|e| {
                warn!(error = %e, "Failed to load settings, using defaults");
                Settings::default()
            })
        } else {
            debug!(path = %path.display(), "Settings file not found, using defaults");
            Settings::default()
        };

        Ok(Self::with_settings(path, settings))
    }

    /// Returns the settings file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets a copy of the current in-memory settings.
    pub async fn get(&self) -> Settings {
        self.settings.read().await.clone()
    }

    /// Re-reads the settings file.
    ///
    /// A missing file keeps the in-memory settings. An unreadable or invalid
    /// file keeps the last good settings and logs a warning.
    pub async fn reload(&self) -> Settings {
        if !self.path.exists() {
            return self.get().await;
        }

        match load_json::<Settings>(&self.path).await {
            Ok(fresh) => {
                let mut settings = self.settings.write().await;
                if *settings != fresh {
                    debug!(path = %self.path.display(), "Settings changed on disk");
                    *settings = fresh;
                }
                settings.clone()
            }
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to re-read settings, keeping last good settings"
                );
                self.get().await
            }
        }
    }

    /// Re-reads settings and returns this cycle's configuration snapshot.
    pub async fn refresh_config(&self) -> RefreshConfig {
        self.reload().await.to_refresh_config()
    }

    /// Applies `f`, saves to disk, and notifies subscribers.
    ///
    /// # Errors
    ///
    /// Returns error if settings cannot be written to disk. The in-memory
    /// change is kept and subscribers are still notified.
    pub async fn update<F>(&self, f: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut Settings),
    {
        {
            let mut settings = self.settings.write().await;
            f(&mut settings);
        }
        let saved = self.save().await;
        self.notify_change().await;
        saved
    }

    /// Saves settings to disk.
    ///
    /// # Errors
    ///
    /// Returns error if settings cannot be written to disk.
    pub async fn save(&self) -> Result<(), StoreError> {
        let settings = self.settings.read().await.clone();
        save_json(&self.path, &settings).await?;
        info!(path = %self.path.display(), "Settings saved");
        Ok(())
    }

    /// Subscribes to settings changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.notify.subscribe()
    }

    /// Notifies subscribers of a change.
    async fn notify_change(&self) {
        let mut version = self.version.write().await;
        *version += 1;
        let _ = self.notify.send(*version);
    }

    // ========================================================================
    // Convenience Methods
    // ========================================================================

    /// Enables or disables a provider.
    ///
    /// # Errors
    ///
    /// See [`SettingsStore::update`].
    pub async fn set_provider_enabled(
        &self,
        provider: ProviderId,
        enabled: bool,
    ) -> Result<(), StoreError> {
        self.update(|s| s.set_enabled(provider, enabled)).await
    }

    /// Flips a provider's enabled state and returns the new state.
    ///
    /// # Errors
    ///
    /// See [`SettingsStore::update`].
    pub async fn toggle_provider(&self, provider: ProviderId) -> Result<bool, StoreError> {
        let enabled = !self.settings.read().await.is_enabled(provider);
        self.set_provider_enabled(provider, enabled).await?;
        Ok(enabled)
    }

    /// Sets the cache flag.
    ///
    /// # Errors
    ///
    /// See [`SettingsStore::update`].
    pub async fn set_use_cache(&self, use_cache: bool) -> Result<(), StoreError> {
        self.update(|s| s.use_cache = use_cache).await
    }

    /// Sets the refresh interval, clamped to 1-60 minutes.
    ///
    /// # Errors
    ///
    /// See [`SettingsStore::update`].
    pub async fn set_interval_minutes(&self, minutes: u32) -> Result<u32, StoreError> {
        let clamped = minutes.clamp(MIN_INTERVAL_MINUTES, MAX_INTERVAL_MINUTES);
        if clamped != minutes {
            warn!(requested = minutes, using = clamped, "Refresh interval out of range");
        }
        self.update(|s| s.refresh_interval_minutes = clamped).await?;
        Ok(clamped)
    }

    /// Sets the display mode.
    ///
    /// # Errors
    ///
    /// See [`SettingsStore::update`].
    pub async fn set_display_mode(&self, mode: DisplayMode) -> Result<(), StoreError> {
        self.update(|s| s.display_mode = mode).await
    }

    /// Sets or clears (with `None` or an empty string) a provider's credential.
    ///
    /// # Errors
    ///
    /// See [`SettingsStore::update`].
    pub async fn set_credential(
        &self,
        provider: ProviderId,
        secret: Option<String>,
    ) -> Result<(), StoreError> {
        self.update(|s| match secret.filter(|v| !v.trim().is_empty()) {
            Some(value) => {
                s.credentials.insert(provider, value);
            }
            None => {
                s.credentials.remove(&provider);
            }
        })
        .await
    }

    /// Restores default settings, keeping nothing.
    ///
    /// # Errors
    ///
    /// See [`SettingsStore::update`].
    pub async fn reset(&self) -> Result<(), StoreError> {
        self.update(|s| *s = Settings::default()).await
    }
}
