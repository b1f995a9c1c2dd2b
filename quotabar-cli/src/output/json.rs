//! JSON output formatting.

use anyhow::Result;
use chrono::{DateTime, Utc};
use quotabar_app::{Indicator, IndicatorSlot};
use quotabar_core::{AggregateSnapshot, ColorTier, ProviderId, SnapshotStatus};
use quotabar_providers::ProviderDescriptor;
use serde::{Serialize, Serializer};

// ============================================================================
// Output Types
// ============================================================================

/// JSON output for one usage run.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageOutput<'a> {
    pub status: &'a SnapshotStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prioritized: Option<&'static str>,
    pub combined_tier: ColorTier,
    pub providers: Vec<ProviderOutput>,
    pub indicators: Vec<IndicatorOutput<'a>>,
    #[serde(serialize_with = "serialize_datetime")]
    pub updated_at: DateTime<Utc>,
}

/// JSON output for a single provider.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderOutput {
    pub provider: String,
    pub display_name: String,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance_usd: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<ColorTier>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A rendered indicator.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorOutput<'a> {
    pub slot: String,
    pub status_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme_color: Option<&'static str>,
    #[serde(flatten)]
    pub indicator: &'a Indicator,
}

/// Provider info output.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderInfoOutput {
    pub id: String,
    pub display_name: String,
    pub cli_name: String,
    pub aliases: Vec<String>,
    pub enabled: bool,
    pub priority: usize,
    pub description: String,
}

// ============================================================================
// Serialization helpers
// ============================================================================

fn serialize_datetime<S>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_str(&dt.to_rfc3339())
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }

    /// Formats a snapshot together with the indicators rendered from it.
    pub fn format_usage(
        &self,
        snapshot: &AggregateSnapshot,
        indicators: &[(IndicatorSlot, &Indicator)],
    ) -> Result<String> {
        let output = UsageOutput {
            status: &snapshot.status,
            prioritized: snapshot.prioritized.map(|id| id.cli_name()),
            combined_tier: snapshot.combined_tier(),
            providers: snapshot
                .enabled
                .iter()
                .map(|id| Self::provider_output(snapshot, *id))
                .collect(),
            indicators: indicators
                .iter()
                .map(|(slot, indicator)| IndicatorOutput {
                    slot: slot.to_string(),
                    status_text: indicator.status_text(),
                    theme_color: indicator.theme_color(),
                    indicator: *indicator,
                })
                .collect(),
            updated_at: snapshot.updated_at,
        };
        self.format(&output)
    }

    /// Converts one provider's entry in a snapshot to output.
    fn provider_output(snapshot: &AggregateSnapshot, provider: ProviderId) -> ProviderOutput {
        let metric = snapshot.metrics.get(&provider);
        ProviderOutput {
            provider: provider.cli_name().to_string(),
            display_name: provider.display_name().to_string(),
            available: metric.is_some(),
            primary_percent: metric.and_then(|m| m.primary_percent),
            secondary_percent: metric.and_then(|m| m.secondary_percent),
            balance_usd: metric.and_then(|m| m.balance_usd),
            tier: snapshot.peak(provider).map(|p| p.tier),
            details: metric.map(|m| m.tooltip_lines.clone()).unwrap_or_default(),
            error: snapshot.unavailable.get(&provider).map(|u| u.describe()),
        }
    }

    /// Formats provider list.
    pub fn format_providers(
        &self,
        providers: &[ProviderDescriptor],
        enabled: &[ProviderId],
    ) -> Result<String> {
        let outputs: Vec<ProviderInfoOutput> = providers
            .iter()
            .map(|desc| ProviderInfoOutput {
                id: desc.id.to_string(),
                display_name: desc.display_name().to_string(),
                cli_name: desc.cli_name().to_string(),
                aliases: desc.aliases.iter().map(ToString::to_string).collect(),
                enabled: enabled.contains(&desc.id),
                priority: desc.id.priority(),
                description: desc.description.to_string(),
            })
            .collect();

        self.format(&outputs)
    }
}

// ============================================================================
// Tests
// ============================================================================
