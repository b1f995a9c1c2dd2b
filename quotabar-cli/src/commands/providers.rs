//! Providers command - list providers in priority order.

use anyhow::Result;
use quotabar_providers::ProviderRegistry;
use tracing::info;

use super::open_store;
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, ExitCode, OutputFormat};

/// Runs the providers command.
pub async fn run(cli: &Cli) -> Result<ExitCode> {
    info!("Listing providers");

    let providers = ProviderRegistry::all();
    let settings = open_store(cli).await?.get().await;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);

            println!("{}", formatter.format_providers_header());
            println!("{}", "─".repeat(70));

            for desc in providers {
                println!(
                    "{}",
                    formatter.format_provider_line(desc, settings.is_enabled(desc.id))
                );
            }

            println!();
            println!(
                "Total: {} providers ({} enabled)",
                providers.len(),
                settings.enabled_providers.len()
            );
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            let output = formatter.format_providers(providers, &settings.enabled_providers)?;
            println!("{output}");
        }
    }

    Ok(ExitCode::Success)
}
