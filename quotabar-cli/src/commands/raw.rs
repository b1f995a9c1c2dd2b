//! Raw command - print the fetcher's JSON output as-is.

use anyhow::Result;
use clap::Args;
use quotabar_fetch::{FetchRequest, QuotaFetcher};
use tracing::info;

use super::{build_fetcher, cycle_config, open_store};
use crate::output::JsonFormatter;
use crate::{Cli, ExitCode};

/// Arguments for the raw command.
#[derive(Args, Default)]
pub struct RawArgs {
    /// Allow the fetcher's cached data.
    #[arg(long)]
    pub cached: bool,
}

/// Runs the raw command.
pub async fn run(args: &RawArgs, cli: &Cli) -> Result<ExitCode> {
    let store = open_store(cli).await?;
    let settings = store.get().await;
    let config = cycle_config(&settings, cli.provider.as_deref())?;
    if config.is_disabled() {
        anyhow::bail!("All providers disabled");
    }

    let fetcher = build_fetcher(&settings)?;
    let request = FetchRequest::from_config(&config, !args.cached);
    let output = fetcher.fetch(&request).await?;
    info!(providers = output.results.len(), "Fetched raw output");

    if cli.pretty {
        let value: serde_json::Value = serde_json::from_str(&output.raw)?;
        println!("{}", JsonFormatter::new(true).format(&value)?);
    } else {
        println!("{}", output.raw.trim_end());
    }

    Ok(ExitCode::Success)
}
