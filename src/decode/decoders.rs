//! Envelope decoding
//!
//! Turns a raw response body into an [`Envelope`], surfacing `stat = FAIL`
//! as an API error and any shape mismatch as a decode error.

use super::types::{Envelope, FailBody, Stat};
use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Decode a response body into an envelope
pub fn decode_envelope<T, M>(body: &str) -> Result<Envelope<T, M>>
where
    T: DeserializeOwned,
    M: DeserializeOwned,
{
    let value: Value = serde_json::from_str(body).map_err(|e| Error::Decode {
        message: format!("Failed to parse JSON: {e}"),
    })?;

    match read_stat(&value)? {
        Stat::Ok => serde_json::from_value(value).map_err(|e| Error::Decode {
            message: format!("Unexpected response shape: {e}"),
        }),
        Stat::Fail => {
            let fail: FailBody = serde_json::from_value(value).map_err(|e| Error::Decode {
                message: format!("Malformed FAIL response: {e}"),
            })?;
            Err(Error::api(fail.code, fail.message, fail.message_detail))
        }
    }
}

/// Check whether a body is a well-formed `stat = FAIL` envelope
pub fn is_fail_body(body: &str) -> bool {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| read_stat(&value).ok())
        == Some(Stat::Fail)
}

fn read_stat(value: &Value) -> Result<Stat> {
    match value.get("stat").and_then(Value::as_str) {
        Some("OK") => Ok(Stat::Ok),
        Some("FAIL") => Ok(Stat::Fail),
        Some(other) => Err(Error::decode(format!("Unknown stat value '{other}'"))),
        None => Err(Error::decode("Response is missing the 'stat' field")),
    }
}
