//! Codex provider descriptor.

use quotabar_core::ProviderId;

use crate::descriptor::ProviderDescriptor;

pub(crate) const PRIMARY_LABEL: &str = "5h";
pub(crate) const SECONDARY_LABEL: &str = "7d";

/// Creates the Codex provider descriptor.
pub fn codex_descriptor() -> ProviderDescriptor {
    ProviderDescriptor {
        id: ProviderId::Codex,
        aliases: &["openai", "chatgpt"],
        primary_label: PRIMARY_LABEL,
        secondary_label: Some(SECONDARY_LABEL),
        description: ProviderId::Codex.description(),
    }
}
