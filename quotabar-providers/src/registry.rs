//! Provider registry for looking up provider descriptors.

use quotabar_core::ProviderId;
use std::collections::HashMap;
use std::sync::OnceLock;

use crate::claude::claude_descriptor;
use crate::codex::codex_descriptor;
use crate::descriptor::ProviderDescriptor;
use crate::gemini::gemini_descriptor;
use crate::openrouter::openrouter_descriptor;
use crate::zai::zai_descriptor;

// ============================================================================
// Static Registry
// ============================================================================

/// Static storage for all provider descriptors.
static DESCRIPTORS: OnceLock<Vec<ProviderDescriptor>> = OnceLock::new();

/// Static storage for the CLI name to provider mapping.
static CLI_NAME_MAP: OnceLock<HashMap<String, ProviderId>> = OnceLock::new();

/// Initializes all provider descriptors, in priority order.
fn init_descriptors() -> Vec<ProviderDescriptor> {
    vec![
        claude_descriptor(),
        codex_descriptor(),
        gemini_descriptor(),
        zai_descriptor(),
        openrouter_descriptor(),
    ]
}

/// Builds the CLI name to provider mapping.
fn build_cli_name_map(descriptors: &[ProviderDescriptor]) -> HashMap<String, ProviderId> {
    let mut map = HashMap::new();

    for desc in descriptors {
        // Primary CLI name
        map.insert(desc.cli_name().to_string(), desc.id);

        // Aliases
        for alias in desc.aliases {
            map.insert(alias.to_lowercase(), desc.id);
        }
    }

    map
}

// ============================================================================
// Provider Registry
// ============================================================================

/// Global registry of all provider descriptors.
pub struct ProviderRegistry;

impl ProviderRegistry {
    /// Returns all provider descriptors in priority order.
    pub fn all() -> &'static [ProviderDescriptor] {
        DESCRIPTORS.get_or_init(init_descriptors)
    }

    /// Gets a provider descriptor by id.
    pub fn get(id: ProviderId) -> Option<&'static ProviderDescriptor> {
        Self::all().iter().find(|d| d.id == id)
    }

    /// Returns the CLI name to provider mapping.
    pub fn cli_name_map() -> &'static HashMap<String, ProviderId> {
        CLI_NAME_MAP.get_or_init(|| build_cli_name_map(Self::all()))
    }

    /// Looks up a provider by CLI name or alias (case-insensitive).
    pub fn get_by_cli_name(name: &str) -> Option<&'static ProviderDescriptor> {
        let id = Self::cli_name_map().get(&name.trim().to_lowercase())?;
        Self::get(*id)
    }

    /// Returns the number of registered providers.
    pub fn count() -> usize {
        Self::all().len()
    }

    /// Returns all provider ids.
    pub fn ids() -> Vec<ProviderId> {
        Self::all().iter().map(|d| d.id).collect()
    }
}
