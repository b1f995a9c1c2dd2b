//! Provider payloads.
//!
//! [`ProviderPayload`] has one variant per [`ProviderId`], each with its own
//! payload shape. Decoding never fails: a payload that does not match its
//! provider's shape decodes field by field, and anything malformed becomes
//! its default (0 for percentages, absent for balances).

use chrono::{DateTime, Utc};
use quotabar_core::{NormalizedMetric, ProviderId};
use serde_json::Value;

use crate::claude::ClaudePayload;
use crate::codex::CodexPayload;
use crate::de::decode;
use crate::gemini::GeminiPayload;
use crate::openrouter::OpenRouterPayload;
use crate::zai::ZaiPayload;

/// A decoded provider payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderPayload {
    /// Claude windows.
    Claude(ClaudePayload),
    /// Codex windows.
    Codex(CodexPayload),
    /// Gemini per-model usage.
    Gemini(GeminiPayload),
    /// Z.AI token quota.
    Zai(ZaiPayload),
    /// `OpenRouter` balance.
    OpenRouter(OpenRouterPayload),
}

impl ProviderPayload {
    /// Decodes a raw payload for `provider`.
    pub fn decode(provider: ProviderId, value: &Value) -> Self {
        match provider {
            ProviderId::Claude => Self::Claude(decode(value)),
            ProviderId::Codex => Self::Codex(decode(value)),
            ProviderId::Gemini => Self::Gemini(decode(value)),
            ProviderId::Zai => Self::Zai(decode(value)),
            ProviderId::OpenRouter => Self::OpenRouter(decode(value)),
        }
    }

    /// The provider this payload belongs to.
    pub fn provider(&self) -> ProviderId {
        match self {
            Self::Claude(_) => ProviderId::Claude,
            Self::Codex(_) => ProviderId::Codex,
            Self::Gemini(_) => ProviderId::Gemini,
            Self::Zai(_) => ProviderId::Zai,
            Self::OpenRouter(_) => ProviderId::OpenRouter,
        }
    }

    /// Converts the payload into an unsanitized metric.
    pub fn to_metric(&self, now: DateTime<Utc>) -> NormalizedMetric {
        match self {
            Self::Claude(p) => p.to_metric(now),
            Self::Codex(p) => p.to_metric(now),
            Self::Gemini(p) => p.to_metric(now),
            Self::Zai(p) => p.to_metric(now),
            Self::OpenRouter(p) => p.to_metric(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_dispatches_on_provider() {
        for id in ProviderId::all() {
            let payload = ProviderPayload::decode(*id, &json!({}));
            assert_eq!(payload.provider(), *id);
            assert_eq!(payload.to_metric(Utc::now()).provider, *id);
        }
    }

    #[test]
    fn test_non_object_payload_decodes_to_defaults() {
        let payload = ProviderPayload::decode(ProviderId::Claude, &json!("unexpected"));
        assert_eq!(payload, ProviderPayload::Claude(ClaudePayload::default()));
    }
}
