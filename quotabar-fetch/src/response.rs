//! Fetcher output decoding.
//!
//! Only the top-level shape is checked here: an object keyed by provider
//! id, each value either `{ "error": <truthy> }` or a provider payload.

use quotabar_core::{ProviderId, RawProviderResult, RawResults};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::FetchError;

/// Decodes the fetcher's JSON stdout into [`RawResults`].
///
/// Unknown provider keys are skipped.
///
/// # Errors
///
/// Returns [`FetchError::Json`] if `stdout` is not JSON and
/// [`FetchError::InvalidResponse`] if the top level is not an object.
pub fn decode_response(stdout: &str) -> Result<RawResults, FetchError> {
    debug!(len = stdout.len(), "Decoding fetcher output");

    let value: Value = serde_json::from_str(stdout.trim()).map_err(|e| {
        warn!(error = %e, "Fetcher output is not valid JSON");
        FetchError::Json(e)
    })?;

    let Value::Object(entries) = value else {
        return Err(FetchError::InvalidResponse(format!(
            "expected a JSON object keyed by provider, got {}",
            json_kind(&value)
        )));
    };

    let mut results = RawResults::new();
    for (key, entry) in entries {
        let Ok(provider) = key.parse::<ProviderId>() else {
            debug!(key = %key, "Skipping unknown provider key");
            continue;
        };

        let result = match error_marker(&entry) {
            Some(message) => {
                debug!(provider = %provider, error = %message, "Provider reported an error");
                RawProviderResult::Error(message)
            }
            None => RawProviderResult::Payload(entry),
        };
        results.insert(provider, result);
    }

    debug!(providers = results.len(), "Fetcher output decoded");
    Ok(results)
}

/// Returns the error message if `entry` carries a truthy `error` field.
fn error_marker(entry: &Value) -> Option<String> {
    let error = entry.as_object()?.get("error")?;
    if !is_truthy(error) {
        return None;
    }
    Some(match error {
        Value::String(message) => message.clone(),
        Value::Object(details) => details
            .get("message")
            .and_then(Value::as_str)
            .map_or_else(|| error.to_string(), str::to_string),
        _ => String::new(),
    })
}

/// Truthiness as the fetcher means it: not null, false, "", or 0.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_payloads_and_errors() {
        let stdout = r#"{
            "claude": {"five_hour": {"used": "42%"}},
            "codex": {"error": "not logged in"},
            "gemini": {"error": true},
            "zai": {"error": false, "token_quota": {"percentage": 12}}
        }"#;
        let results = decode_response(stdout).unwrap();

        assert_eq!(results.len(), 4);
        assert!(results.get(ProviderId::Claude).unwrap().payload().is_some());
        assert_eq!(
            results.get(ProviderId::Codex),
            Some(&RawProviderResult::Error("not logged in".into()))
        );
        assert_eq!(
            results.get(ProviderId::Gemini),
            Some(&RawProviderResult::Error(String::new()))
        );
        // A falsy error field is not an error marker.
        assert!(!results.get(ProviderId::Zai).unwrap().is_error());
        assert!(results.get(ProviderId::OpenRouter).is_none());
    }

    #[test]
    fn test_decode_skips_unknown_keys() {
        let results = decode_response(r#"{"cursor": {}, "timestamp": 1}"#).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_decode_error_object_message() {
        let results =
            decode_response(r#"{"openrouter": {"error": {"message": "bad key", "code": 401}}}"#)
                .unwrap();
        assert_eq!(
            results.get(ProviderId::OpenRouter),
            Some(&RawProviderResult::Error("bad key".into()))
        );
    }

    #[test]
    fn test_decode_rejects_non_object() {
        assert!(matches!(
            decode_response("[1, 2]"),
            Err(FetchError::InvalidResponse(_))
        ));
        assert!(matches!(
            decode_response("null"),
            Err(FetchError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_decode_rejects_invalid_json() {
        for stdout in ["", "Traceback (most recent call last):", "{\"claude\": "] {
            let err = decode_response(stdout).unwrap_err();
            assert!(err.is_malformed_response(), "should fail for {stdout:?}");
        }
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&Value::Null));
        assert!(!is_truthy(&serde_json::json!(0)));
        assert!(!is_truthy(&serde_json::json!("")));
        assert!(is_truthy(&serde_json::json!(1)));
        assert!(is_truthy(&serde_json::json!("x")));
        assert!(is_truthy(&serde_json::json!([])));
    }
}
