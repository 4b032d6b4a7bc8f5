//! Log record types
//!
//! Log entries have an open shape: each is a JSON object whose only field the
//! client relies on is `timestamp`. The wrappers keep the raw mapping and add
//! typed accessors that fail loudly instead of defaulting.

use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Name of the field holding a record's epoch-seconds timestamp
pub const TIMESTAMP_FIELD: &str = "timestamp";

/// Common accessors for log records backed by an open JSON mapping
pub trait LogRecord {
    /// Raw fields of the record
    fn fields(&self) -> &JsonObject;

    /// Look up a single field
    fn get(&self, key: &str) -> Option<&JsonValue> {
        self.fields().get(key)
    }

    /// Look up a string field
    fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(JsonValue::as_str)
    }

    /// Epoch seconds from the `timestamp` field
    ///
    /// Parsed on every call; a malformed value only surfaces here.
    fn timestamp_secs(&self) -> Result<i64> {
        parse_epoch_seconds(self.get(TIMESTAMP_FIELD))
    }

    /// The `timestamp` field as a UTC instant
    fn timestamp(&self) -> Result<DateTime<Utc>> {
        let secs = self.timestamp_secs()?;
        DateTime::from_timestamp(secs, 0).ok_or_else(|| {
            Error::timestamp(TIMESTAMP_FIELD, format!("{secs} is out of range"))
        })
    }
}

/// Coerce a JSON integer, integral float or numeric string to epoch seconds
pub fn parse_epoch_seconds(value: Option<&JsonValue>) -> Result<i64> {
    match value {
        None | Some(JsonValue::Null) => Err(Error::timestamp(TIMESTAMP_FIELD, "field is missing")),
        Some(JsonValue::Number(n)) => {
            if let Some(secs) = n.as_i64() {
                return Ok(secs);
            }
            match n.as_f64() {
                Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                    Ok(f as i64)
                }
                _ => Err(Error::timestamp(
                    TIMESTAMP_FIELD,
                    format!("{n} is not an integer"),
                )),
            }
        }
        Some(JsonValue::String(s)) => s.trim().parse::<i64>().map_err(|e| {
            Error::timestamp(TIMESTAMP_FIELD, format!("'{s}' is not an integer: {e}"))
        }),
        Some(other) => Err(Error::timestamp(
            TIMESTAMP_FIELD,
            format!("unsupported value {other}"),
        )),
    }
}

macro_rules! log_record_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub JsonObject);

        impl LogRecord for $name {
            fn fields(&self) -> &JsonObject {
                &self.0
            }
        }

        impl From<JsonObject> for $name {
            fn from(fields: JsonObject) -> Self {
                Self(fields)
            }
        }

        impl $name {
            /// Build a record holding only a timestamp
            pub fn at(secs: i64) -> Self {
                let mut fields = JsonObject::new();
                fields.insert(TIMESTAMP_FIELD.to_string(), JsonValue::from(secs));
                Self(fields)
            }

            /// Consume the record and return its fields
            pub fn into_inner(self) -> JsonObject {
                self.0
            }
        }
    };
}

log_record_type!(
    /// Administrator action log entry (time-window paged)
    AdminLog
);

log_record_type!(
    /// Telephony credit usage log entry (time-window paged)
    TelephonyLog
);

log_record_type!(
    /// Authentication log entry (cursor paged)
    AuthLog
);
