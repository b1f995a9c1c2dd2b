//! Provider descriptor system.
//!
//! A descriptor holds the static configuration for a provider:
//! - Metadata (display name, CLI name and aliases, description)
//! - Labels for the values its indicator shows

use quotabar_core::{MetricShape, ProviderId};

// ============================================================================
// Provider Descriptor
// ============================================================================

/// Static description of a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderDescriptor {
    /// Provider identifier.
    pub id: ProviderId,
    /// Extra names accepted on the command line (besides `id.cli_name()`).
    pub aliases: &'static [&'static str],
    /// Label of the primary value (e.g. `5h`).
    pub primary_label: &'static str,
    /// Label of the secondary value, for windowed providers.
    pub secondary_label: Option<&'static str>,
    /// One-line description shown in provider pickers.
    pub description: &'static str,
}

impl ProviderDescriptor {
    /// Returns the display name.
    pub fn display_name(&self) -> &'static str {
        self.id.display_name()
    }

    /// Returns the CLI name.
    pub fn cli_name(&self) -> &'static str {
        self.id.cli_name()
    }

    /// Returns the payload family.
    pub fn shape(&self) -> MetricShape {
        self.id.shape()
    }

    /// Returns true if `name` is this provider's CLI name or an alias.
    pub fn matches(&self, name: &str) -> bool {
        let name = name.trim();
        self.cli_name().eq_ignore_ascii_case(name)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
    }
}
