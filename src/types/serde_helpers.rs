//! Custom serde helpers for TopstepX payloads.

use serde::{Deserialize, Deserializer};

/// Deserialize a field that may be `null`, falling back to `Default`.
///
/// Failed envelopes often carry `"orders": null`; combined with
/// `#[serde(default)]` this also covers a missing field.
///
/// # Example
///
/// ```rust
/// use serde::Deserialize;
/// use topstepx_api_client::types::serde_helpers::null_as_default;
///
/// #[derive(Deserialize)]
/// struct Payload {
///     #[serde(default, deserialize_with = "null_as_default")]
///     items: Vec<u32>,
/// }
///
/// let payload: Payload = serde_json::from_str(r#"{"items": null}"#).unwrap();
/// assert!(payload.items.is_empty());
/// ```
pub fn null_as_default<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: Default + Deserialize<'de>,
    D: Deserializer<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
