//! Z.AI provider descriptor.

use quotabar_core::ProviderId;

use crate::descriptor::ProviderDescriptor;

/// Creates the Z.AI provider descriptor.
pub fn zai_descriptor() -> ProviderDescriptor {
    ProviderDescriptor {
        id: ProviderId::Zai,
        aliases: &["z.ai", "zhipu"],
        primary_label: "token quota",
        secondary_label: None,
        description: ProviderId::Zai.description(),
    }
}
