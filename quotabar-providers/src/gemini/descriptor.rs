//! Gemini provider descriptor.

use quotabar_core::ProviderId;

use crate::descriptor::ProviderDescriptor;

pub(crate) const PRIMARY_LABEL: &str = "max across models";

/// Creates the Gemini provider descriptor.
pub fn gemini_descriptor() -> ProviderDescriptor {
    ProviderDescriptor {
        id: ProviderId::Gemini,
        aliases: &["google"],
        primary_label: PRIMARY_LABEL,
        secondary_label: None,
        description: ProviderId::Gemini.description(),
    }
}
