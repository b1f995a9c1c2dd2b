//! `OpenRouter` payload parser.

use quotabar_core::{NormalizedMetric, ProviderId, format_usd};
use serde::Deserialize;

use crate::de;

/// `{ "balance_usd": 12.5 }`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OpenRouterPayload {
    /// Remaining credit in USD.
    #[serde(default, alias = "balance", deserialize_with = "de::lenient")]
    pub balance_usd: Option<f64>,
}

impl OpenRouterPayload {
    /// Converts the payload into a metric. No percentages are set.
    pub fn to_metric(&self) -> NormalizedMetric {
        let mut metric = NormalizedMetric::new(ProviderId::OpenRouter);
        metric.balance_usd = self.balance_usd.filter(|b| b.is_finite());
        let amount = metric
            .balance_usd
            .map_or_else(|| "n/a".to_string(), format_usd);
        metric
            .tooltip_lines
            .push(format!("- {}: {amount}", ProviderId::OpenRouter.display_name()));
        metric
    }
}
