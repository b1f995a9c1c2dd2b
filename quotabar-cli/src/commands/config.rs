//! Config command - manage configuration.

use anyhow::Result;
use clap::{Args, Subcommand, ValueEnum};
use quotabar_core::{DisplayMode, ProviderId};
use quotabar_providers::{ProviderDescriptor, ProviderRegistry};
use quotabar_store::{Settings, default_config_dir};
use serde::Serialize;
use tracing::info;

use super::{open_store, settings_path};
use crate::output::JsonFormatter;
use crate::{Cli, ExitCode, OutputFormat};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration.
    Show,

    /// Show configuration paths.
    Path,

    /// Enable a provider.
    Enable {
        /// Provider to enable.
        provider: String,
    },

    /// Disable a provider.
    Disable {
        /// Provider to disable.
        provider: String,
    },

    /// Allow or forbid the fetcher's cache.
    Cache {
        /// on or off.
        state: Switch,
    },

    /// Set the refresh interval.
    Interval {
        /// Minutes between refreshes (1-60).
        minutes: u32,
    },

    /// Set the display mode.
    Mode {
        /// single or per-provider.
        mode: String,
    },

    /// Set or clear a provider credential.
    Credential {
        /// Provider the credential belongs to.
        provider: String,
        /// Secret value; omit to clear.
        secret: Option<String>,
    },

    /// Reset to defaults.
    Reset,
}

/// An on/off argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Switch {
    /// Enabled.
    On,
    /// Disabled.
    Off,
}

/// Configuration as shown to the user. Credentials are listed by provider only.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfigOutput<'a> {
    enabled_providers: Vec<&'static str>,
    use_cache: bool,
    refresh_interval_minutes: u32,
    display_mode: DisplayMode,
    credentials: Vec<&'static str>,
    fetcher_program: &'a str,
    fetcher_script: String,
    fetcher_timeout_secs: u64,
}

impl<'a> ConfigOutput<'a> {
    fn new(settings: &'a Settings) -> Self {
        Self {
            enabled_providers: ProviderId::in_priority_order(settings.enabled_providers.iter().copied())
                .into_iter()
                .map(|id| id.cli_name())
                .collect(),
            use_cache: settings.use_cache,
            refresh_interval_minutes: settings.interval_minutes(),
            display_mode: settings.display_mode,
            credentials: settings
                .credentials
                .iter()
                .filter(|(_, secret)| !secret.trim().is_empty())
                .map(|(id, _)| id.cli_name())
                .collect(),
            fetcher_program: &settings.fetcher.program,
            fetcher_script: settings.fetcher.script_path().display().to_string(),
            fetcher_timeout_secs: settings.fetcher.timeout().as_secs(),
        }
    }
}

/// Runs the config command.
pub async fn run(args: &ConfigArgs, cli: &Cli) -> Result<ExitCode> {
    match &args.action {
        ConfigAction::Show => show_config(cli).await,
        ConfigAction::Path => show_paths(cli).await,
        ConfigAction::Enable { provider } => set_enabled(provider, true, cli).await,
        ConfigAction::Disable { provider } => set_enabled(provider, false, cli).await,
        ConfigAction::Cache { state } => set_cache(*state, cli).await,
        ConfigAction::Interval { minutes } => set_interval(*minutes, cli).await,
        ConfigAction::Mode { mode } => set_mode(mode, cli).await,
        ConfigAction::Credential { provider, secret } => {
            set_credential(provider, secret.clone(), cli).await
        }
        ConfigAction::Reset => reset_config(cli).await,
    }?;
    Ok(ExitCode::Success)
}

fn lookup(name: &str) -> Result<&'static ProviderDescriptor> {
    ProviderRegistry::get_by_cli_name(name).ok_or_else(|| anyhow::anyhow!("Unknown provider: {name}"))
}

async fn show_config(cli: &Cli) -> Result<()> {
    let store = open_store(cli).await?;
    let settings = store.get().await;
    let output = ConfigOutput::new(&settings);

    match cli.format {
        OutputFormat::Text => {
            println!("QuotaBar Configuration");
            println!("{}", "─".repeat(40));
            println!();
            println!("Enabled providers:");
            if output.enabled_providers.is_empty() {
                println!("  (none)");
            }
            for provider in ProviderId::in_priority_order(settings.enabled_providers.iter().copied()) {
                println!("  • {}", provider.display_name());
            }
            println!();
            println!("Use cache:        {}", if output.use_cache { "on" } else { "off" });
            println!("Refresh interval: {} min", output.refresh_interval_minutes);
            println!("Display mode:     {}", output.display_mode);
            if !output.credentials.is_empty() {
                println!("Credentials set:  {}", output.credentials.join(", "));
            }
            println!();
            println!("Fetcher:          {} {}", output.fetcher_program, output.fetcher_script);
            println!("Fetcher timeout:  {}s", output.fetcher_timeout_secs);
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&output)?);
        }
    }

    Ok(())
}

async fn show_paths(cli: &Cli) -> Result<()> {
    let config_dir = default_config_dir();
    let settings_file = settings_path(cli);
    let script = open_store(cli).await?.get().await.fetcher.script_path();

    match cli.format {
        OutputFormat::Text => {
            println!("Configuration Paths");
            println!("{}", "─".repeat(40));
            println!();
            println!("Config dir:     {}", config_dir.display());
            println!("Settings file:  {}", settings_file.display());
            println!("Fetcher script: {}", script.display());
        }
        OutputFormat::Json => {
            let paths = serde_json::json!({
                "config_dir": config_dir.display().to_string(),
                "settings_file": settings_file.display().to_string(),
                "fetcher_script": script.display().to_string(),
            });
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&paths)?);
        }
    }

    Ok(())
}

async fn set_enabled(name: &str, enabled: bool, cli: &Cli) -> Result<()> {
    let desc = lookup(name)?;

    let store = open_store(cli).await?;
    store.set_provider_enabled(desc.id, enabled).await?;

    info!(provider = %desc.id, enabled, "Provider updated");
    let verb = if enabled { "Enabled" } else { "Disabled" };
    println!("{verb}: {}", desc.display_name());

    Ok(())
}

async fn set_cache(state: Switch, cli: &Cli) -> Result<()> {
    let on = state == Switch::On;

    let store = open_store(cli).await?;
    store.set_use_cache(on).await?;

    println!("Cache: {}", if on { "on" } else { "off" });
    Ok(())
}

async fn set_interval(minutes: u32, cli: &Cli) -> Result<()> {
    let store = open_store(cli).await?;
    let applied = store.set_interval_minutes(minutes).await?;

    if applied == minutes {
        println!("Refresh interval set to: {applied} min");
    } else {
        println!("Refresh interval set to: {applied} min (clamped from {minutes})");
    }
    Ok(())
}

async fn set_mode(mode: &str, cli: &Cli) -> Result<()> {
    let mode: DisplayMode = mode.parse()?;

    let store = open_store(cli).await?;
    store.set_display_mode(mode).await?;

    println!("Display mode set to: {mode}");
    Ok(())
}

async fn set_credential(name: &str, secret: Option<String>, cli: &Cli) -> Result<()> {
    let desc = lookup(name)?;
    let clearing = secret.as_deref().is_none_or(|s| s.trim().is_empty());

    let store = open_store(cli).await?;
    store.set_credential(desc.id, secret).await?;

    if clearing {
        println!("Credential cleared: {}", desc.display_name());
    } else {
        println!("Credential saved: {}", desc.display_name());
    }
    Ok(())
}

async fn reset_config(cli: &Cli) -> Result<()> {
    let store = open_store(cli).await?;
    store.reset().await?;

    info!(path = %store.path().display(), "Settings reset");
    println!("Configuration reset to defaults");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_output_hides_secrets() {
        let mut settings = Settings::default();
        settings.credentials.insert(ProviderId::Zai, "zk-secret".into());
        settings.credentials.insert(ProviderId::OpenRouter, "   ".into());

        let output = ConfigOutput::new(&settings);
        let json = serde_json::to_string(&output).unwrap();

        assert_eq!(output.credentials, vec!["zai"]);
        assert!(!json.contains("zk-secret"));
    }

    #[test]
    fn test_config_output_orders_providers() {
        let mut settings = Settings::default();
        settings.enabled_providers = vec![ProviderId::OpenRouter, ProviderId::Claude];

        let output = ConfigOutput::new(&settings);
        assert_eq!(output.enabled_providers, vec!["claude", "openrouter"]);
    }

    #[test]
    fn test_lookup_accepts_aliases() {
        assert_eq!(lookup("anthropic").unwrap().id, ProviderId::Claude);
        assert!(lookup("cursor").is_err());
    }
}
