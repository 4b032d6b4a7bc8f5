//! Time windows and cursors for log queries
//!
//! The two log endpoint generations disagree on units: v1 takes whole epoch
//! seconds, v2 takes epoch milliseconds. Both encodings live here so the
//! retrieval code never formats a time by hand.

use crate::error::{Error, Result};
use crate::pagination::QueryOption;
use crate::types::{JsonValue, QueryParams};
use chrono::{DateTime, Duration, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::records::AuthLog;

/// Lower time bound parameter
pub const MINTIME_PARAM: &str = "mintime";
/// Upper time bound parameter
pub const MAXTIME_PARAM: &str = "maxtime";
/// Composite cursor parameter
pub const NEXT_OFFSET_PARAM: &str = "next_offset";

/// Inclusive `[min_time, max_time]` range bounding a log retrieval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogWindow {
    /// Lower bound, advanced between v1 pages
    pub min_time: DateTime<Utc>,
    /// Upper bound, fixed for the whole retrieval
    pub max_time: DateTime<Utc>,
}

impl LogWindow {
    /// Create a window, rejecting `min_time > max_time`
    pub fn new(min_time: DateTime<Utc>, max_time: DateTime<Utc>) -> Result<Self> {
        if min_time > max_time {
            return Err(Error::invalid_argument(format!(
                "mintime {min_time} is after maxtime {max_time}"
            )));
        }
        Ok(Self { min_time, max_time })
    }

    /// Window starting at `min_time` and lasting `length`
    pub fn starting_at(min_time: DateTime<Utc>, length: Duration) -> Result<Self> {
        let max_time = min_time
            .checked_add_signed(length)
            .ok_or_else(|| Error::invalid_argument(format!("{min_time} + {length} overflows")))?;
        Self::new(min_time, max_time)
    }

    /// Window from `min_time` up to the current instant
    pub fn since(min_time: DateTime<Utc>) -> Result<Self> {
        Self::new(min_time, Utc::now())
    }

    /// Encode both bounds as epoch milliseconds
    pub fn write_millis(&self, params: &mut QueryParams) {
        params.insert(MINTIME_PARAM.to_string(), epoch_millis(self.min_time));
        params.insert(MAXTIME_PARAM.to_string(), epoch_millis(self.max_time));
    }
}

/// Whole epoch seconds, as the v1 log endpoints expect
pub fn epoch_seconds(time: DateTime<Utc>) -> String {
    time.timestamp().to_string()
}

/// Epoch milliseconds, as the v2 log endpoints expect
pub fn epoch_millis(time: DateTime<Utc>) -> String {
    time.timestamp_millis().to_string()
}

/// Opaque two-part cursor issued by cursor-paged log endpoints
///
/// Never inspected; stored and replayed verbatim as `"<first>,<second>"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompositeCursor {
    timestamp_millis: String,
    opaque_id: String,
}

impl CompositeCursor {
    /// Create a cursor from its two parts
    pub fn new(timestamp_millis: impl Into<String>, opaque_id: impl Into<String>) -> Self {
        Self {
            timestamp_millis: timestamp_millis.into(),
            opaque_id: opaque_id.into(),
        }
    }

    /// First part (server timestamp in milliseconds)
    pub fn timestamp_millis(&self) -> &str {
        &self.timestamp_millis
    }

    /// Second part (server record identifier)
    pub fn opaque_id(&self) -> &str {
        &self.opaque_id
    }

    /// Single parameter value sent back to the server
    pub fn to_param(&self) -> String {
        format!("{},{}", self.timestamp_millis, self.opaque_id)
    }

    /// Option that sets `next_offset` to this cursor
    pub fn as_option(&self) -> QueryOption {
        let value = self.to_param();
        Box::new(move |params: &mut QueryParams| {
            params.insert(NEXT_OFFSET_PARAM.to_string(), value.clone());
        })
    }
}

impl Serialize for CompositeCursor {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        [&self.timestamp_millis, &self.opaque_id].serialize(serializer)
    }
}

/// Reads `next_offset` as an optional two-element array
///
/// `null`, a missing field and `[]` all mean there is no further page.
fn optional_cursor<'de, D>(deserializer: D) -> std::result::Result<Option<CompositeCursor>, D::Error>
where
    D: Deserializer<'de>,
{
    let parts = Option::<Vec<JsonValue>>::deserialize(deserializer)?.unwrap_or_default();
    match parts.as_slice() {
        [] => Ok(None),
        [first, second] => Ok(Some(CompositeCursor::new(
            cursor_part(first).map_err(D::Error::custom)?,
            cursor_part(second).map_err(D::Error::custom)?,
        ))),
        other => Err(D::Error::custom(format!(
            "expected a two-element cursor, got {} elements",
            other.len()
        ))),
    }
}

fn cursor_part(value: &JsonValue) -> std::result::Result<String, String> {
    match value {
        JsonValue::String(s) => Ok(s.clone()),
        JsonValue::Number(n) => Ok(n.to_string()),
        other => Err(format!("unsupported cursor element {other}")),
    }
}

/// Paging metadata of cursor-paged log endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorMetadata {
    /// Cursor for the next page; `None` when exhausted
    #[serde(default, deserialize_with = "optional_cursor")]
    pub next_offset: Option<CompositeCursor>,
    /// Total number of records matching the query
    #[serde(default, deserialize_with = "crate::decode::lenient_u64")]
    pub total_objects: Option<u64>,
}

impl CursorMetadata {
    /// Option that resumes from this page's cursor, if there is one
    pub fn next_page_option(&self) -> Option<QueryOption> {
        self.next_offset.as_ref().map(CompositeCursor::as_option)
    }
}

/// Payload of one authentication log page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthLogPage {
    /// Records on this page
    #[serde(rename = "authlogs", default)]
    pub logs: Vec<AuthLog>,
    /// Cursor and totals
    #[serde(default)]
    pub metadata: CursorMetadata,
}
