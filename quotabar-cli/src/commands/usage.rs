//! Usage command - fetch, aggregate and display provider usage.

use anyhow::Result;
use clap::Args;
use quotabar_app::RenderSink;
use quotabar_core::AggregateSnapshot;
use quotabar_fetch::{FetchRequest, QuotaFetcher};
use quotabar_providers::aggregate;
use tracing::{debug, info};

use super::{build_fetcher, cycle_config, open_store};
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, ExitCode, OutputFormat};

/// Arguments for the usage command.
#[derive(Args, Default)]
pub struct UsageArgs {
    /// Allow the fetcher's cached data (fresh fetch otherwise).
    #[arg(long)]
    pub cached: bool,
}

/// Runs the usage command.
pub async fn run(args: &UsageArgs, cli: &Cli) -> Result<ExitCode> {
    let store = open_store(cli).await?;
    let settings = store.get().await;
    let config = cycle_config(&settings, cli.provider.as_deref())?;

    let snapshot = if config.is_disabled() {
        info!("All providers disabled");
        AggregateSnapshot::disabled()
    } else {
        let fetcher = build_fetcher(&settings)?;
        let request = FetchRequest::from_config(&config, !args.cached);
        info!(providers = ?request.providers, use_cache = request.use_cache, "Fetching usage");

        let output = fetcher.fetch(&request).await?;
        debug!(duration_ms = output.duration.as_millis(), "Fetch complete");
        aggregate(&config.enabled_providers, &output.results)
    };

    let mut sink = RenderSink::new(config.display_mode);
    sink.render(&snapshot);

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_snapshot(&snapshot));
            println!();
            for (_, indicator) in sink.visible() {
                println!("{}", formatter.format_indicator(indicator));
            }
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_usage(&snapshot, &sink.visible())?);
        }
    }

    if snapshot.status.is_ready() {
        Ok(ExitCode::Success)
    } else {
        Ok(ExitCode::NoData)
    }
}
