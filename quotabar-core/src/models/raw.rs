//! Raw fetcher results.
//!
//! The quota fetcher returns one JSON entry per requested provider. Each
//! entry is either an error marker or a provider-shaped payload; the payload
//! stays untyped here and is interpreted by the metric parser.

use serde_json::Value;
use std::collections::BTreeMap;

use super::provider::ProviderId;

/// One provider's entry in the fetcher output.
#[derive(Debug, Clone, PartialEq)]
pub enum RawProviderResult {
    /// The fetcher reported an error for this provider.
    Error(String),
    /// A provider-specific usage payload.
    Payload(Value),
}

impl RawProviderResult {
    /// Returns true if this entry is an error marker.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Returns the payload, if this is not an error marker.
    pub fn payload(&self) -> Option<&Value> {
        match self {
            Self::Payload(value) => Some(value),
            Self::Error(_) => None,
        }
    }
}

/// The whole fetcher output for one cycle, keyed by provider.
///
/// A provider with no entry is treated as unavailable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawResults {
    entries: BTreeMap<ProviderId, RawProviderResult>,
}

impl RawResults {
    /// Creates an empty result set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts (or replaces) a provider's entry.
    pub fn insert(&mut self, provider: ProviderId, result: RawProviderResult) {
        self.entries.insert(provider, result);
    }

    /// Builder-style insert of a payload.
    #[must_use]
    pub fn with_payload(mut self, provider: ProviderId, payload: Value) -> Self {
        self.insert(provider, RawProviderResult::Payload(payload));
        self
    }

    /// Builder-style insert of an error marker.
    #[must_use]
    pub fn with_error(mut self, provider: ProviderId, message: impl Into<String>) -> Self {
        self.insert(provider, RawProviderResult::Error(message.into()));
        self
    }

    /// Gets a provider's entry.
    pub fn get(&self, provider: ProviderId) -> Option<&RawProviderResult> {
        self.entries.get(&provider)
    }

    /// Returns true if no provider has an entry.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of provider entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterates entries in priority order.
    pub fn iter(&self) -> impl Iterator<Item = (ProviderId, &RawProviderResult)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }
}

impl FromIterator<(ProviderId, RawProviderResult)> for RawResults {
    fn from_iter<T: IntoIterator<Item = (ProviderId, RawProviderResult)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
