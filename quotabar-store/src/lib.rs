// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `QuotaBar` Store
//!
//! Settings persistence for `QuotaBar`.
//!
//! This crate provides:
//!
//! - **`SettingsStore`**: User settings with persistence and change notification
//! - **Persistence**: File I/O helpers for JSON data
//!
//! The refresh pipeline never holds on to settings between cycles: it asks
//! [`SettingsStore::refresh_config`] for a fresh [`RefreshConfig`] snapshot at
//! the start of every cycle.
//!
//! ## Usage
//!
//! ```ignore
//! use quotabar_core::ProviderId;
//! use quotabar_store::SettingsStore;
//!
//! let store = SettingsStore::load_default().await?;
//! store.set_provider_enabled(ProviderId::Zai, true).await?;
//!
//! let mut rx = store.subscribe();
//! while rx.changed().await.is_ok() {
//!     let config = store.refresh_config().await;
//!     println!("{:?}", config.enabled_providers);
//! }
//! ```
//!
//! [`RefreshConfig`]: quotabar_core::RefreshConfig

pub mod error;
pub mod persistence;
pub mod settings_store;

pub use error::StoreError;
pub use persistence::{default_config_dir, default_script_path, default_settings_path, load_json, save_json};
pub use settings_store::{
    DEFAULT_INTERVAL_MINUTES, FetcherSettings, MAX_INTERVAL_MINUTES, MIN_INTERVAL_MINUTES,
    Settings, SettingsStore,
};
