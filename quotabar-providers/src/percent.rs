//! Percentage parsing.

use serde_json::Value;

/// Parses a percentage field.
///
/// Strings may carry a trailing `%` (`"42%"`, `"37.5 %"`); numbers are taken
/// as-is. Anything missing, unparsable or non-finite is 0. No clamping
/// happens here.
pub fn parse_percent(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim_end().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|p| p.is_finite()).unwrap_or(0.0)
}
