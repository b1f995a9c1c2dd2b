//! Quota fetcher trait and the script-backed implementation.

use async_trait::async_trait;
use quotabar_core::RawResults;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

use crate::error::FetchError;
use crate::host::process::{DEFAULT_TIMEOUT_SECS, ProcessRunner};
use crate::request::FetchRequest;
use crate::response::decode_response;

// ============================================================================
// Fetch Output
// ============================================================================

/// A completed fetch.
#[derive(Debug, Clone)]
pub struct FetchOutput {
    /// Decoded results keyed by provider.
    pub results: RawResults,
    /// The fetcher's stdout, unmodified.
    pub raw: String,
    /// How long the fetch took.
    pub duration: Duration,
}

// ============================================================================
// Quota Fetcher Trait
// ============================================================================

/// Anything that can produce raw quota results for a request.
///
/// A failed fetch is a failure of the whole cycle; per-provider failures
/// are reported inside [`RawResults`] as error markers instead.
///
/// ```ignore
/// struct FixedFetcher(String);
///
/// #[async_trait]
/// impl QuotaFetcher for FixedFetcher {
///     async fn fetch(&self, _request: &FetchRequest) -> Result<FetchOutput, FetchError> {
///         Ok(FetchOutput {
///             results: decode_response(&self.0)?,
///             raw: self.0.clone(),
///             duration: Duration::ZERO,
///         })
///     }
/// }
/// ```
#[async_trait]
pub trait QuotaFetcher: Send + Sync {
    /// Fetches usage for the requested providers.
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchOutput, FetchError>;

    /// Short human-readable name for logs.
    fn name(&self) -> String {
        "fetcher".to_string()
    }
}

// ============================================================================
// Script Fetcher
// ============================================================================

/// Runs the quota script (`<program> <script> --json ...`) as a subprocess.
#[derive(Debug, Clone)]
pub struct ScriptFetcher {
    program: String,
    script: PathBuf,
    timeout: Duration,
    runner: ProcessRunner,
}

impl ScriptFetcher {
    /// Creates a fetcher running `script` with `program` (e.g. `python3`).
    pub fn new(program: impl Into<String>, script: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            script: script.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            runner: ProcessRunner::new(),
        }
    }

    /// Sets the subprocess timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The interpreter program.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// The script path.
    pub fn script(&self) -> &Path {
        &self.script
    }

    /// Returns true if the program resolves and the script exists.
    pub fn is_available(&self) -> bool {
        self.runner.command_exists(&self.program) && self.script.is_file()
    }

    fn command_args(&self, rest: Vec<String>) -> Vec<String> {
        let mut args = Vec::with_capacity(rest.len() + 1);
        args.push(self.script.to_string_lossy().into_owned());
        args.extend(rest);
        args
    }

    /// Runs the script's human-readable report for the request.
    ///
    /// The report is what the raw-output detail view shows. With
    /// `strip_ansi`, terminal color codes are removed.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Process`] if the script cannot run or exits
    /// non-zero.
    #[instrument(skip(self, request), fields(script = %self.script.display()))]
    pub async fn check(&self, request: &FetchRequest, strip_ansi: bool) -> Result<String, FetchError> {
        let mut rest = Vec::new();
        if request.use_cache {
            rest.push("--cached".to_string());
        }
        rest.extend(request.provider_flags());

        let output = self
            .runner
            .run_with_options(&self.program, &self.command_args(rest), &request.to_env(), self.timeout)
            .await?;
        let report = output.into_stdout()?;

        Ok(if strip_ansi {
            strip_ansi_escapes::strip_str(&report)
        } else {
            report
        })
    }
}

#[async_trait]
impl QuotaFetcher for ScriptFetcher {
    #[instrument(skip(self, request), fields(script = %self.script.display(), providers = request.providers.len()))]
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchOutput, FetchError> {
        debug!(request = ?request, "Starting fetch");
        let start = Instant::now();

        let output = self
            .runner
            .run_with_options(
                &self.program,
                &self.command_args(request.to_args()),
                &request.to_env(),
                self.timeout,
            )
            .await?;

        if !output.stderr.trim().is_empty() {
            debug!(stderr = %output.stderr.trim(), "Fetcher wrote to stderr");
        }

        let raw = output.into_stdout().inspect_err(|e| {
            warn!(error = %e, "Fetcher failed");
        })?;
        let results = decode_response(&raw)?;
        let duration = start.elapsed();

        info!(
            providers = results.len(),
            duration_ms = duration.as_millis(),
            "Fetch complete"
        );

        Ok(FetchOutput { results, raw, duration })
    }

    fn name(&self) -> String {
        format!("{} {}", self.program, self.script.display())
    }
}

// ============================================================================
// Tests
// ============================================================================
