//! Envelope types
//!
//! Every admin API response shares the same top-level wrapper: a `stat` flag,
//! the endpoint-specific `response` payload and, for paged endpoints, a
//! `metadata` object.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Response status flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Stat {
    /// Payload is valid
    Ok,
    /// Payload replaced by an error code and message
    Fail,
}

/// Decoded top-level response
///
/// Only ever constructed with `stat = Ok`; FAIL bodies become
/// [`crate::Error::Api`] during decoding. Endpoints without paging metadata
/// leave `M` as [`IgnoredAny`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T, M = IgnoredAny> {
    /// Status flag
    pub stat: Stat,
    /// Endpoint payload
    pub response: T,
    /// Paging metadata, when the endpoint returns it
    #[serde(default = "Option::default")]
    pub metadata: Option<M>,
}

impl<T, M> Envelope<T, M> {
    /// Create an OK envelope
    pub fn ok(response: T, metadata: Option<M>) -> Self {
        Self {
            stat: Stat::Ok,
            response,
            metadata,
        }
    }
}

/// Metadata returned by offset-paged collection endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetMetadata {
    /// Offset of the previous page, if any
    #[serde(default, deserialize_with = "lenient_u64")]
    pub prev_offset: Option<u64>,
    /// Offset of the next page; `None` on the final page
    #[serde(default, deserialize_with = "lenient_u64")]
    pub next_offset: Option<u64>,
    /// Total number of objects across all pages
    #[serde(default, deserialize_with = "lenient_u64")]
    pub total_objects: Option<u64>,
}

/// Body of a `stat = FAIL` response
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct FailBody {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub message_detail: Option<String>,
}

/// Accepts an integer, a numeric string or null
pub(crate) fn lenient_u64<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;

    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("expected unsigned integer, got {n}"))),
        Some(Value::String(s)) => s
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|e| D::Error::custom(format!("invalid integer string '{s}': {e}"))),
        Some(other) => Err(D::Error::custom(format!(
            "expected integer or numeric string, got {other}"
        ))),
    }
}
