//! Deserialization helpers shared by the wire DTOs.

use serde::{Deserialize, Deserializer};

use crate::error::NormalizeError;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Signed(i64),
    Unsigned(u64),
}

/// Accept string or numeric identifiers and normalize them to strings.
pub(crate) fn id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Signed(value) => value.to_string(),
        RawId::Unsigned(value) => value.to_string(),
    })
}

/// Same as [`id`] for optional references (`parent_id`, `vendor_id`).
pub(crate) fn optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<RawId>::deserialize(deserializer)?.map(|raw| match raw {
            RawId::Text(text) => text,
            RawId::Signed(value) => value.to_string(),
            RawId::Unsigned(value) => value.to_string(),
        }),
    )
}

/// Reject blank identifiers and required names.
pub(crate) fn required(field: &'static str, value: String) -> Result<String, NormalizeError> {
    if value.trim().is_empty() {
        Err(NormalizeError::MissingField { field })
    } else {
        Ok(value)
    }
}

/// Collapse blank optional strings to `None`.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|inner| !inner.trim().is_empty())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(f64),
    Text(String),
}

/// Prices arrive as numbers or decimal strings depending on the endpoint.
pub(crate) fn amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawAmount>::deserialize(deserializer)? {
        None => Ok(0.0),
        Some(RawAmount::Number(value)) => Ok(value),
        Some(RawAmount::Text(text)) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("invalid amount '{text}'"))),
    }
}
