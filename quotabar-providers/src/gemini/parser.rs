//! Gemini payload parser.

use chrono::{DateTime, Utc};
use quotabar_core::{NormalizedMetric, ProviderId, format_percent};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

use super::descriptor::PRIMARY_LABEL;
use crate::de;
use crate::window::UsageWindow;

/// `{ "models": { "<name>": Window, ... } }`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GeminiPayload {
    /// Usage per model, sorted by model name.
    #[serde(default, deserialize_with = "lenient_models")]
    pub models: BTreeMap<String, UsageWindow>,
}

/// Decodes each model on its own so one bad entry does not drop the rest.
fn lenient_models<'de, D>(deserializer: D) -> Result<BTreeMap<String, UsageWindow>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: BTreeMap<String, Value> = de::lenient(deserializer)?;
    Ok(raw
        .iter()
        .map(|(name, value)| (name.clone(), de::decode(value)))
        .collect())
}

impl GeminiPayload {
    /// Highest usage across models (0 with no models).
    pub fn max_percent(&self) -> f64 {
        self.models.values().map(|w| w.used).fold(0.0, f64::max)
    }

    /// Converts the payload into a metric.
    pub fn to_metric(&self, now: DateTime<Utc>) -> NormalizedMetric {
        let mut metric = NormalizedMetric::new(ProviderId::Gemini);
        let max = self.max_percent();
        metric.primary_percent = Some(max);

        metric.tooltip_lines.push(format!(
            "- {}: {} ({PRIMARY_LABEL})",
            ProviderId::Gemini.display_name(),
            format_percent(max.clamp(0.0, 100.0))
        ));
        for (model, window) in &self.models {
            metric.tooltip_lines.push(format!(
                "  * {model}: {}{}",
                format_percent(window.percent()),
                window.reset_suffix(now)
            ));
        }
        metric
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::de::decode;
    use serde_json::json;

    #[test]
    fn test_parse_gemini_models() {
        let payload: GeminiPayload = decode(&json!({
            "models": {
                "pro": {"used": "95%"},
                "flash": {"used": "12%", "resets_in": "3h 0m"}
            }
        }));
        let metric = payload.to_metric(Utc::now());

        assert_eq!(metric.primary_percent, Some(95.0));
        assert_eq!(metric.secondary_percent, None);
        assert_eq!(
            metric.tooltip_lines,
            vec![
                "- Gemini: 95% (max across models)",
                "  * flash: 12% (resets in 3h 0m)",
                "  * pro: 95%",
            ]
        );
    }

    #[test]
    fn test_one_bad_model_keeps_the_rest() {
        let payload: GeminiPayload = decode(&json!({
            "models": {"pro": "broken", "flash": {"used": "30%"}}
        }));
        assert_eq!(payload.models.len(), 2);
        assert_eq!(payload.models["pro"].used, 0.0);
        assert_eq!(payload.max_percent(), 30.0);
    }

    #[test]
    fn test_no_models() {
        let payload: GeminiPayload = decode(&json!({"models": []}));
        let metric = payload.to_metric(Utc::now());
        assert_eq!(metric.primary_percent, Some(0.0));
        assert_eq!(metric.tooltip_lines, vec!["- Gemini: 0% (max across models)"]);
    }
}
