// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! `QuotaBar` CLI - AI provider quota usage from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Usage for the enabled providers (fresh fetch)
//! quotabar
//!
//! # Allow the fetcher's cache
//! quotabar usage --cached
//!
//! # Only some providers
//! quotabar usage --provider claude,zai
//!
//! # JSON output
//! quotabar --format json --pretty
//!
//! # Raw fetcher output
//! quotabar raw
//!
//! # Human-readable fetcher report without colors
//! quotabar check --no-color
//!
//! # Watch mode
//! quotabar watch --interval 5
//! ```

mod commands;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use quotabar_fetch::FetchError;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{check, config, providers, raw, usage, watch};

// ============================================================================
// CLI Definition
// ============================================================================

/// `QuotaBar` CLI - AI provider quota usage.
#[derive(Parser)]
#[command(name = "quotabar")]
#[command(about = "AI provider quota usage from the command line")]
#[command(long_about = r"
QuotaBar reports how much of each AI provider's quota is used.

Supported providers (in priority order):
  • Claude (claude)
  • Codex (codex)
  • Gemini (gemini)
  • Z.AI (zai)
  • OpenRouter (openrouter)

Examples:
  quotabar                        # Enabled providers, fresh fetch
  quotabar usage --cached         # Allow cached data
  quotabar --provider all         # All providers
  quotabar --format json          # JSON output
  quotabar config interval 5      # Refresh every 5 minutes
")]
#[command(version)]
pub struct Cli {
    /// Subcommand to run. If none, runs 'usage' by default.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Providers to query ("all", or comma-separated: "claude,zai").
    /// Defaults to the enabled providers.
    #[arg(long, short, global = true)]
    pub provider: Option<String>,

    /// Settings file (defaults to the user config directory).
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Fetch current usage (default if no command specified).
    #[command(visible_alias = "u")]
    Usage(usage::UsageArgs),

    /// Print the fetcher's raw JSON output.
    Raw(raw::RawArgs),

    /// Run the fetcher's human-readable report.
    Check(check::CheckArgs),

    /// List providers.
    #[command(visible_alias = "p")]
    Providers,

    /// Watch usage, refreshing on the configured interval.
    #[command(visible_alias = "w")]
    Watch(watch::WatchArgs),

    /// Manage configuration.
    Config(config::ConfigArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error.
    Error = 1,
    /// No provider produced data.
    NoData = 2,
    /// The fetcher produced unusable output.
    ParseError = 3,
}

impl ExitCode {
    /// Picks the exit code for a failed command.
    fn for_error(error: &anyhow::Error) -> Self {
        match error.downcast_ref::<FetchError>() {
            Some(e) if e.is_malformed_response() => Self::ParseError,
            _ => Self::Error,
        }
    }
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return; // No logging in quiet mode
    }

    let default = if verbose {
        "quotabar=debug,info"
    } else {
        "quotabar=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Some(Commands::Usage(args)) => usage::run(args, &cli).await,
        Some(Commands::Raw(args)) => raw::run(args, &cli).await,
        Some(Commands::Check(args)) => check::run(args, &cli).await,
        Some(Commands::Providers) => providers::run(&cli).await,
        Some(Commands::Watch(args)) => watch::run(args, &cli).await,
        Some(Commands::Config(args)) => config::run(args, &cli).await,
        None => usage::run(&usage::UsageArgs::default(), &cli).await,
    };

    let code = match result {
        Ok(code) => code,
        Err(e) => {
            if !cli.quiet {
                eprintln!("Error: {e:#}");
            }
            ExitCode::for_error(&e)
        }
    };

    std::process::exit(code as i32);
}
