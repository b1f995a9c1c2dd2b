//! `OpenRouter` provider descriptor.

use quotabar_core::ProviderId;

use crate::descriptor::ProviderDescriptor;

/// Creates the `OpenRouter` provider descriptor.
pub fn openrouter_descriptor() -> ProviderDescriptor {
    ProviderDescriptor {
        id: ProviderId::OpenRouter,
        aliases: &["open-router", "or"],
        primary_label: "balance",
        secondary_label: None,
        description: ProviderId::OpenRouter.description(),
    }
}
