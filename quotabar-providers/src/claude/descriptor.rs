//! Claude provider descriptor.

use quotabar_core::ProviderId;

use crate::descriptor::ProviderDescriptor;

pub(crate) const PRIMARY_LABEL: &str = "5h";
pub(crate) const SECONDARY_LABEL: &str = "7d";

/// Creates the Claude provider descriptor.
pub fn claude_descriptor() -> ProviderDescriptor {
    ProviderDescriptor {
        id: ProviderId::Claude,
        aliases: &["anthropic", "claude-code"],
        primary_label: PRIMARY_LABEL,
        secondary_label: Some(SECONDARY_LABEL),
        description: ProviderId::Claude.description(),
    }
}
