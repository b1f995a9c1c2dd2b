//! Check command - run the fetcher's human-readable report.

use anyhow::Result;
use clap::Args;
use quotabar_fetch::FetchRequest;

use super::{build_fetcher, cycle_config, open_store};
use crate::{Cli, ExitCode};

/// Arguments for the check command.
#[derive(Args, Default)]
pub struct CheckArgs {
    /// Allow the fetcher's cached data.
    #[arg(long)]
    pub cached: bool,
}

/// Runs the check command. `--no-color` strips ANSI escapes from the report.
pub async fn run(args: &CheckArgs, cli: &Cli) -> Result<ExitCode> {
    let store = open_store(cli).await?;
    let settings = store.get().await;
    let config = cycle_config(&settings, cli.provider.as_deref())?;

    let fetcher = build_fetcher(&settings)?;
    let request = FetchRequest::from_config(&config, !args.cached);
    let report = fetcher.check(&request, cli.no_color).await?;

    print!("{report}");
    if !report.ends_with('\n') {
        println!();
    }
    Ok(ExitCode::Success)
}
