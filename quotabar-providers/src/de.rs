//! Lenient serde helpers.
//!
//! Payload sub-fields that fail to decode become their default instead of
//! failing the whole payload.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::percent::parse_percent;

/// Decodes `value` as `T`, or returns `T::default()`.
pub(crate) fn decode<T>(value: &Value) -> T
where
    T: DeserializeOwned + Default,
{
    <T as Deserialize>::deserialize(value).unwrap_or_default()
}

/// `deserialize_with` adapter for [`decode`].
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(decode(&value))
}

/// `deserialize_with` adapter for percentage fields.
pub(crate) fn percent<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(parse_percent(&value))
}
