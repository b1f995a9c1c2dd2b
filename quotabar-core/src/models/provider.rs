//! Provider identifiers.
//!
//! [`ProviderId`] is the closed set of quota sources `QuotaBar` understands.
//! Declaration order is the priority order used to pick the provider that
//! drives a combined indicator, so `Ord` on this type *is* priority.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

// ============================================================================
// Provider Id
// ============================================================================

/// Supported quota providers, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    /// Anthropic Claude Code (5h / 7d windows)
    Claude,
    /// OpenAI Codex / `ChatGPT` (primary / secondary windows)
    Codex,
    /// Google Gemini (per-model usage)
    Gemini,
    /// Z.AI (shared token quota)
    Zai,
    /// `OpenRouter` (credit balance)
    #[serde(rename = "openrouter")]
    OpenRouter,
}

impl ProviderId {
    /// Returns all providers in priority order.
    pub fn all() -> &'static [ProviderId] {
        &[
            Self::Claude,
            Self::Codex,
            Self::Gemini,
            Self::Zai,
            Self::OpenRouter,
        ]
    }

    /// Returns the priority rank (0 = highest).
    pub fn priority(self) -> usize {
        Self::all().iter().position(|&p| p == self).unwrap_or(usize::MAX)
    }

    /// Returns the display name for this provider.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Claude => "Claude",
            Self::Codex => "Codex",
            Self::Gemini => "Gemini",
            Self::Zai => "Z.AI",
            Self::OpenRouter => "OpenRouter",
        }
    }

    /// Returns the wire / CLI name (matches the fetcher's JSON keys and flags).
    pub fn cli_name(&self) -> &'static str {
        match self {
            Self::Claude => "claude",
            Self::Codex => "codex",
            Self::Gemini => "gemini",
            Self::Zai => "zai",
            Self::OpenRouter => "openrouter",
        }
    }

    /// Returns a one-line description of what is tracked.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Claude => "Claude Code usage (5h/7d window)",
            Self::Codex => "ChatGPT/Codex usage (5h/7d window)",
            Self::Gemini => "Google Gemini usage (GCP-based)",
            Self::Zai => "Z.AI shared token quota",
            Self::OpenRouter => "OpenRouter API Credit balance",
        }
    }

    /// Returns the payload family this provider reports.
    pub fn shape(&self) -> MetricShape {
        match self {
            Self::Claude | Self::Codex => MetricShape::Windowed,
            Self::Gemini => MetricShape::MultiModel,
            Self::Zai => MetricShape::QuotaShare,
            Self::OpenRouter => MetricShape::Balance,
        }
    }

    /// Returns true if this provider reports percentages at all.
    pub fn reports_percent(&self) -> bool {
        self.shape() != MetricShape::Balance
    }

    /// Sorts and deduplicates a provider list into priority order.
    pub fn in_priority_order<I>(providers: I) -> Vec<ProviderId>
    where
        I: IntoIterator<Item = ProviderId>,
    {
        let mut ordered: Vec<ProviderId> = providers.into_iter().collect();
        ordered.sort();
        ordered.dedup();
        ordered
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cli_name())
    }
}

impl FromStr for ProviderId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "claude" => Ok(Self::Claude),
            "codex" => Ok(Self::Codex),
            "gemini" => Ok(Self::Gemini),
            "zai" | "z.ai" => Ok(Self::Zai),
            "openrouter" => Ok(Self::OpenRouter),
            other => Err(CoreError::ProviderNotFound(other.to_string())),
        }
    }
}

// ============================================================================
// Metric Shape
// ============================================================================

/// The payload family a provider reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricShape {
    /// Two rolling windows (primary + secondary).
    Windowed,
    /// A usage percentage per model.
    MultiModel,
    /// A single numeric share of a token quota.
    QuotaShare,
    /// A currency balance, no percentage.
    Balance,
}
