//! Fetch requests.

use quotabar_core::{ProviderId, RefreshConfig};
use std::collections::BTreeMap;
use std::fmt;

/// Environment variable through which a provider's credential reaches the fetcher.
pub fn credential_env(provider: ProviderId) -> &'static str {
    match provider {
        ProviderId::Claude => "CLAUDE_CODE_OAUTH_TOKEN",
        ProviderId::Codex => "OPENAI_API_KEY",
        ProviderId::Gemini => "GEMINI_API_KEY",
        ProviderId::Zai => "ZAI_API_KEY",
        ProviderId::OpenRouter => "OPENROUTER_API_KEY",
    }
}

/// What to ask the quota fetcher for.
#[derive(Clone, PartialEq)]
pub struct FetchRequest {
    /// Providers to query, in priority order.
    pub providers: Vec<ProviderId>,
    /// Whether the fetcher may answer from its cache.
    pub use_cache: bool,
    /// Optional secrets keyed by provider.
    pub credentials: BTreeMap<ProviderId, String>,
}

impl FetchRequest {
    /// Creates a request for the given providers (cache off, no credentials).
    pub fn new<I>(providers: I) -> Self
    where
        I: IntoIterator<Item = ProviderId>,
    {
        Self {
            providers: ProviderId::in_priority_order(providers),
            use_cache: false,
            credentials: BTreeMap::new(),
        }
    }

    /// Builds the request for one cycle.
    ///
    /// `bypass_cache` wins over the configured cache flag.
    pub fn from_config(config: &RefreshConfig, bypass_cache: bool) -> Self {
        Self {
            providers: config.enabled_providers.clone(),
            use_cache: config.use_cache && !bypass_cache,
            credentials: config
                .credentials
                .iter()
                .filter(|(id, secret)| config.enabled_providers.contains(*id) && !secret.is_empty())
                .map(|(id, secret)| (*id, secret.clone()))
                .collect(),
        }
    }

    /// Sets the cache flag.
    #[must_use]
    pub fn use_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }

    /// Adds a credential.
    #[must_use]
    pub fn credential(mut self, provider: ProviderId, secret: impl Into<String>) -> Self {
        self.credentials.insert(provider, secret.into());
        self
    }

    /// Returns true if every known provider is requested.
    pub fn is_all_providers(&self) -> bool {
        ProviderId::all().iter().all(|id| self.providers.contains(id))
    }

    /// Command-line arguments for the JSON report.
    ///
    /// Provider flags are omitted when all providers are requested; the
    /// fetcher queries everything by default.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec!["--json".to_string()];
        if self.use_cache {
            args.push("--cached".to_string());
        }
        args.extend(self.provider_flags());
        args
    }

    /// Provider selection flags (`--claude`, `--zai`, ...).
    pub fn provider_flags(&self) -> Vec<String> {
        if self.is_all_providers() {
            return Vec::new();
        }
        self.providers
            .iter()
            .map(|id| format!("--{}", id.cli_name()))
            .collect()
    }

    /// Environment variables carrying the credentials.
    pub fn to_env(&self) -> Vec<(String, String)> {
        self.credentials
            .iter()
            .map(|(id, secret)| (credential_env(*id).to_string(), secret.clone()))
            .collect()
    }
}

impl fmt::Debug for FetchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchRequest")
            .field("providers", &self.providers)
            .field("use_cache", &self.use_cache)
            .field("credentials", &self.credentials.keys().collect::<Vec<_>>())
            .finish()
    }
}
