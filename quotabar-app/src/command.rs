//! Daemon stdin commands.

use quotabar_core::{DisplayMode, ProviderId};
use quotabar_providers::ProviderRegistry;
use std::str::FromStr;
use thiserror::Error;

/// A command read from the daemon's stdin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaemonCommand {
    /// Refresh now, bypassing the cache.
    Refresh,
    /// Log the latest raw fetch output.
    Raw,
    /// Enable a provider.
    Enable(ProviderId),
    /// Disable a provider.
    Disable(ProviderId),
    /// Flip a provider's enabled state.
    Toggle(ProviderId),
    /// Turn the fetcher cache on or off.
    Cache(bool),
    /// Set the refresh interval in minutes.
    Interval(u32),
    /// Switch display mode.
    Mode(DisplayMode),
    /// Print the command list.
    Help,
    /// Stop the daemon.
    Quit,
}

/// Failure to parse a stdin command.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    /// Empty input.
    #[error("empty command")]
    Empty,
    /// Unrecognized verb.
    #[error("unknown command: {0} (try 'help')")]
    Unknown(String),
    /// Missing or malformed argument.
    #[error("usage: {0}")]
    Usage(&'static str),
    /// Provider name not in the registry.
    #[error("unknown provider: {0}")]
    UnknownProvider(String),
}

/// One-line usage summary for each command.
pub const HELP: &str = "\
refresh                      refresh now (bypasses cache)
raw                          log the latest raw fetch output
enable|disable|toggle <id>   change a provider's enabled state
cache on|off                 use the fetcher cache
interval <minutes>           refresh interval (1-60)
mode single|per-provider     display mode
quit                         exit";

fn provider(arg: Option<&str>, usage: &'static str) -> Result<ProviderId, CommandError> {
    let name = arg.ok_or(CommandError::Usage(usage))?;
    ProviderRegistry::get_by_cli_name(name)
        .map(|d| d.id)
        .ok_or_else(|| CommandError::UnknownProvider(name.to_string()))
}

impl FromStr for DaemonCommand {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let verb = words.next().ok_or(CommandError::Empty)?.to_lowercase();
        let arg = words.next();

        let command = match verb.as_str() {
            "refresh" | "r" => Self::Refresh,
            "raw" | "details" => Self::Raw,
            "enable" => Self::Enable(provider(arg, "enable <provider>")?),
            "disable" => Self::Disable(provider(arg, "disable <provider>")?),
            "toggle" => Self::Toggle(provider(arg, "toggle <provider>")?),
            "cache" => match arg.map(str::to_lowercase).as_deref() {
                Some("on" | "true" | "yes") => Self::Cache(true),
                Some("off" | "false" | "no") => Self::Cache(false),
                _ => return Err(CommandError::Usage("cache on|off")),
            },
            "interval" => Self::Interval(
                arg.and_then(|m| m.parse().ok())
                    .ok_or(CommandError::Usage("interval <minutes>"))?,
            ),
            "mode" => Self::Mode(
                arg.and_then(|m| m.parse().ok())
                    .ok_or(CommandError::Usage("mode single|per-provider"))?,
            ),
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_commands() {
        assert_eq!("refresh".parse(), Ok(DaemonCommand::Refresh));
        assert_eq!("  RAW ".parse(), Ok(DaemonCommand::Raw));
        assert_eq!("quit".parse(), Ok(DaemonCommand::Quit));
        assert_eq!("exit".parse(), Ok(DaemonCommand::Quit));
    }

    #[test]
    fn test_provider_commands_accept_aliases() {
        assert_eq!(
            "enable claude".parse(),
            Ok(DaemonCommand::Enable(ProviderId::Claude))
        );
        assert_eq!(
            "disable z.ai".parse(),
            Ok(DaemonCommand::Disable(ProviderId::Zai))
        );
        assert_eq!(
            "toggle OpenRouter".parse(),
            Ok(DaemonCommand::Toggle(ProviderId::OpenRouter))
        );
    }

    #[test]
    fn test_settings_commands() {
        assert_eq!("cache off".parse(), Ok(DaemonCommand::Cache(false)));
        assert_eq!("cache ON".parse(), Ok(DaemonCommand::Cache(true)));
        assert_eq!("interval 5".parse(), Ok(DaemonCommand::Interval(5)));
        assert_eq!(
            "mode per-provider".parse(),
            Ok(DaemonCommand::Mode(DisplayMode::PerProvider))
        );
    }

    #[test]
    fn test_errors() {
        assert_eq!("".parse::<DaemonCommand>(), Err(CommandError::Empty));
        assert_eq!(
            "enable".parse::<DaemonCommand>(),
            Err(CommandError::Usage("enable <provider>"))
        );
        assert_eq!(
            "enable cursor".parse::<DaemonCommand>(),
            Err(CommandError::UnknownProvider("cursor".into()))
        );
        assert_eq!(
            "interval soon".parse::<DaemonCommand>(),
            Err(CommandError::Usage("interval <minutes>"))
        );
        assert!(matches!(
            "dance".parse::<DaemonCommand>(),
            Err(CommandError::Unknown(_))
        ));
    }
}
