//! Subprocess execution for the quota fetcher.
//!
//! The fetcher is an out-of-process script; this module runs it with a
//! timeout, extra environment variables, and captured output.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::{debug, instrument, warn};

use crate::error::ProcessError;

/// Default command timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Process Output
// ============================================================================

/// Output from a process execution.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// Standard output content.
    pub stdout: String,
    /// Standard error content.
    pub stderr: String,
    /// Exit code (0 = success, -1 = killed by signal).
    pub exit_code: i32,
    /// How long the command took to execute.
    pub duration: Duration,
}

impl ProcessOutput {
    /// Returns true if the command succeeded (exit code 0).
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Consumes the output, returning stdout if the command succeeded.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessError::NonZeroExit`] carrying stderr otherwise.
    pub fn into_stdout(self) -> Result<String, ProcessError> {
        if self.success() {
            Ok(self.stdout)
        } else {
            Err(ProcessError::NonZeroExit {
                code: self.exit_code,
                stderr: self.stderr.trim().to_string(),
            })
        }
    }
}

// ============================================================================
// Process Runner
// ============================================================================

/// Runs subprocesses with captured output.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    /// Creates a new process runner.
    pub fn new() -> Self {
        Self
    }

    /// Runs a command with the default timeout and no extra environment.
    ///
    /// # Errors
    ///
    /// See [`ProcessRunner::run_with_options`].
    pub async fn run(&self, cmd: &str, args: &[String]) -> Result<ProcessOutput, ProcessError> {
        self.run_with_options(cmd, args, &[], Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .await
    }

    /// Runs a command with extra environment variables and a timeout.
    ///
    /// Environment values are never logged.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessError::NotFound`] if the command cannot be resolved,
    /// [`ProcessError::Timeout`] if it outlives `timeout` (the child is killed),
    /// or [`ProcessError::Io`] if spawning fails.
    #[instrument(skip(self, args, env), fields(cmd = %cmd, timeout = ?timeout))]
    pub async fn run_with_options(
        &self,
        cmd: &str,
        args: &[String],
        env: &[(String, String)],
        timeout: Duration,
    ) -> Result<ProcessOutput, ProcessError> {
        debug!(args = ?args, env_keys = ?env.iter().map(|(k, _)| k).collect::<Vec<_>>(), "Running command");

        let cmd_path = self.which(cmd).ok_or_else(|| {
            warn!(cmd = %cmd, "Command not found");
            ProcessError::NotFound(cmd.to_string())
        })?;

        let start = Instant::now();

        let mut command = Command::new(&cmd_path);
        command
            .args(args)
            .envs(env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(timeout, command.output()).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(cmd = %cmd, timeout = ?timeout, "Command timed out");
                return Err(ProcessError::Timeout(timeout));
            }
        };

        let duration = start.elapsed();
        let exit_code = output.status.code().unwrap_or(-1);

        let result = ProcessOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code,
            duration,
        };

        debug!(
            exit_code = exit_code,
            duration = ?duration,
            stdout_len = result.stdout.len(),
            stderr_len = result.stderr.len(),
            "Command completed"
        );

        Ok(result)
    }

    /// Check if a command exists on PATH (or is an executable path).
    pub fn command_exists(&self, cmd: &str) -> bool {
        self.which(cmd).is_some()
    }

    /// Find the path to a command.
    pub fn which(&self, cmd: &str) -> Option<PathBuf> {
        which::which(cmd).ok()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_command_exists() {
        let runner = ProcessRunner::new();
        assert!(runner.command_exists("sh"));
        assert!(!runner.command_exists("definitely_not_a_real_command_12345"));
    }

    #[tokio::test]
    async fn test_run_echo() {
        let runner = ProcessRunner::new();
        let output = runner.run("echo", &args(&["hello", "world"])).await.unwrap();

        assert!(output.success());
        assert_eq!(output.stdout.trim(), "hello world");
        assert!(output.stderr.is_empty());
    }

    #[tokio::test]
    async fn test_run_passes_env() {
        let runner = ProcessRunner::new();
        let env = vec![("QUOTABAR_TEST_VALUE".to_string(), "42".to_string())];
        let output = runner
            .run_with_options(
                "sh",
                &args(&["-c", "echo $QUOTABAR_TEST_VALUE"]),
                &env,
                Duration::from_secs(5),
            )
            .await
            .unwrap();

        assert_eq!(output.stdout.trim(), "42");
    }

    #[tokio::test]
    async fn test_non_zero_exit_into_stdout() {
        let runner = ProcessRunner::new();
        let output = runner
            .run("sh", &args(&["-c", "echo boom >&2; exit 3"]))
            .await
            .unwrap();

        assert!(!output.success());
        match output.into_stdout() {
            Err(ProcessError::NonZeroExit { code, stderr }) => {
                assert_eq!(code, 3);
                assert_eq!(stderr, "boom");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_timeout() {
        let runner = ProcessRunner::new();
        let result = runner
            .run_with_options("sleep", &args(&["5"]), &[], Duration::from_millis(100))
            .await;

        assert!(matches!(result, Err(ProcessError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_run_not_found() {
        let runner = ProcessRunner::new();
        let result = runner.run("not_a_real_command_xyz", &[]).await;
        assert!(matches!(result, Err(ProcessError::NotFound(_))));
    }
}
