//! CLI command implementations.

pub mod check;
pub mod config;
pub mod providers;
pub mod raw;
pub mod usage;
pub mod watch;

use anyhow::Result;
use quotabar_core::{ProviderId, RefreshConfig};
use quotabar_fetch::ScriptFetcher;
use quotabar_providers::ProviderRegistry;
use quotabar_store::{Settings, SettingsStore, default_settings_path};
use std::path::PathBuf;
use tracing::debug;

use crate::Cli;

/// Settings path selected by `--settings`, or the default one.
pub fn settings_path(cli: &Cli) -> PathBuf {
    cli.settings.clone().unwrap_or_else(default_settings_path)
}

/// Loads the settings store.
pub async fn open_store(cli: &Cli) -> Result<SettingsStore> {
    Ok(SettingsStore::load(settings_path(cli)).await?)
}

/// Builds the script fetcher described by the settings.
///
/// Fails early when the interpreter or script is missing, so the user sees
/// which path to fix instead of a process error.
pub fn build_fetcher(settings: &Settings) -> Result<ScriptFetcher> {
    let fetcher = ScriptFetcher::new(
        settings.fetcher.program.clone(),
        settings.fetcher.script_path(),
    )
    .with_timeout(settings.fetcher.timeout());

    if !fetcher.is_available() {
        anyhow::bail!(
            "Quota fetcher not available: '{} {}' (see `quotabar config path`)",
            fetcher.program(),
            fetcher.script().display(),
        );
    }
    Ok(fetcher)
}

/// Parses a provider selection.
///
/// `None` keeps `enabled`; `all` selects every provider; otherwise a
/// comma-separated list of names or aliases.
pub fn parse_provider_selection(arg: Option<&str>, enabled: &[ProviderId]) -> Result<Vec<ProviderId>> {
    match arg.map(str::to_lowercase).as_deref() {
        None => Ok(enabled.to_vec()),
        Some("all") => Ok(ProviderRegistry::ids()),
        Some(names) => {
            let mut providers = Vec::new();
            for name in names.split(',').map(str::trim).filter(|n| !n.is_empty()) {
                match ProviderRegistry::get_by_cli_name(name) {
                    Some(desc) => providers.push(desc.id),
                    None => anyhow::bail!("Unknown provider: {name}"),
                }
            }
            if providers.is_empty() {
                anyhow::bail!("No valid providers specified");
            }
            Ok(ProviderId::in_priority_order(providers))
        }
    }
}

/// The settings' cycle configuration, narrowed to a provider selection.
pub fn cycle_config(settings: &Settings, selection: Option<&str>) -> Result<RefreshConfig> {
    let mut config = settings.to_refresh_config();
    config.enabled_providers = parse_provider_selection(selection, &config.enabled_providers)?;
    debug!(config = ?config, "Cycle configuration");
    Ok(config)
}
