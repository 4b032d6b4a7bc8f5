//! Pagination strategy implementations
//!
//! Each strategy handles a specific pagination pattern.

use super::types::{CursorResolver, NextPage, PagePayload};
use crate::decode::{Envelope, OffsetMetadata};
use crate::error::Result;
use crate::logs::{
    epoch_seconds, AuthLogPage, CursorMetadata, LogRecord, MINTIME_PARAM, NEXT_OFFSET_PARAM,
};
use crate::types::QueryParams;
use chrono::{DateTime, Duration, Utc};
use serde::de::{DeserializeOwned, IgnoredAny};
use std::marker::PhantomData;

// ============================================================================
// Offset Pagination
// ============================================================================

/// Default `limit` for collection endpoints
pub const DEFAULT_LIMIT: u32 = 100;
/// Default starting `offset` for collection endpoints
pub const DEFAULT_OFFSET: u64 = 0;

/// Parameters of the first request to a collection endpoint
pub fn default_offset_params() -> QueryParams {
    let mut params = QueryParams::new();
    params.insert("limit".to_string(), DEFAULT_LIMIT.to_string());
    params.insert("offset".to_string(), DEFAULT_OFFSET.to_string());
    params
}

/// Follow the server's `next_offset`; `limit` is left as it was
pub fn resolve_offset(metadata: Option<&OffsetMetadata>) -> NextPage {
    match metadata.and_then(|m| m.next_offset) {
        Some(next) => NextPage::with_param("offset", next.to_string()),
        None => NextPage::Done,
    }
}

/// Offset-based pagination for resource collections
///
/// Pages are `Vec<T>` with top-level `{prev_offset, next_offset,
/// total_objects}` metadata.
pub struct OffsetResolver<T> {
    _item: PhantomData<fn() -> T>,
}

impl<T> OffsetResolver<T> {
    /// Create a new offset resolver
    pub fn new() -> Self {
        Self { _item: PhantomData }
    }
}

impl<T> Default for OffsetResolver<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for OffsetResolver<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OffsetResolver").finish()
    }
}

impl<T: DeserializeOwned + Send> CursorResolver for OffsetResolver<T> {
    type Payload = Vec<T>;
    type Metadata = OffsetMetadata;

    fn resolve(&self, page: &Envelope<Vec<T>, OffsetMetadata>) -> Result<NextPage> {
        Ok(resolve_offset(page.metadata.as_ref()))
    }

    fn total_objects(&self, page: &Envelope<Vec<T>, OffsetMetadata>) -> Option<u64> {
        page.metadata.as_ref().and_then(|m| m.total_objects)
    }
}

// ============================================================================
// Time Window Pagination (v1 logs)
// ============================================================================

/// Most records a v1 log endpoint returns per request
pub const LOG_V1_PAGE_CAPACITY: usize = 1000;

/// Compute the lower bound of the next v1 log request
///
/// Returns `None` when the window is exhausted. A page shorter than
/// [`LOG_V1_PAGE_CAPACITY`] is the last one. For a full page the next bound
/// is the page's largest timestamp, so records sharing it are fetched again.
/// When every record on a full page shares one timestamp the bound moves one
/// second past it instead.
///
/// # Limitation
///
/// In that uniform case any records at the same second that did not fit on
/// the page are skipped. Timestamps alone cannot tell "all records at this
/// second" apart from "more records at this second", and the endpoint offers
/// no tiebreaker.
pub fn next_log_v1_min_time<L: LogRecord>(
    page: &[L],
    max_time: DateTime<Utc>,
) -> Result<Option<DateTime<Utc>>> {
    if page.len() < LOG_V1_PAGE_CAPACITY {
        return Ok(None);
    }

    let mut newest: Option<DateTime<Utc>> = None;
    let mut uniform = true;
    for record in page {
        let ts = record.timestamp()?;
        match newest {
            None => newest = Some(ts),
            Some(current) => {
                if ts != current {
                    uniform = false;
                }
                if ts > current {
                    newest = Some(ts);
                }
            }
        }
    }

    let Some(newest) = newest else {
        return Ok(None);
    };

    let next = if uniform {
        // No representable instant past the last second: nothing left to fetch.
        match newest.checked_add_signed(Duration::seconds(1)) {
            Some(next) => next,
            None => return Ok(None),
        }
    } else {
        newest
    };

    if next > max_time {
        return Ok(None);
    }
    Ok(Some(next))
}

/// Time-window pagination for v1 log endpoints
///
/// Advances `mintime` (epoch seconds) between pages; the window's upper bound
/// stays fixed for the whole retrieval.
pub struct LogWindowResolver<L> {
    max_time: DateTime<Utc>,
    _record: PhantomData<fn() -> L>,
}

impl<L> LogWindowResolver<L> {
    /// Create a resolver bounded by `max_time`
    pub fn new(max_time: DateTime<Utc>) -> Self {
        Self {
            max_time,
            _record: PhantomData,
        }
    }

    /// Upper bound of the retrieval
    pub fn max_time(&self) -> DateTime<Utc> {
        self.max_time
    }
}

impl<L> std::fmt::Debug for LogWindowResolver<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogWindowResolver")
            .field("max_time", &self.max_time)
            .finish()
    }
}

impl<L: LogRecord + DeserializeOwned + Send> CursorResolver for LogWindowResolver<L> {
    type Payload = Vec<L>;
    type Metadata = IgnoredAny;

    fn resolve(&self, page: &Envelope<Vec<L>, IgnoredAny>) -> Result<NextPage> {
        Ok(match next_log_v1_min_time(&page.response, self.max_time)? {
            Some(next) => NextPage::with_param(MINTIME_PARAM, epoch_seconds(next)),
            None => NextPage::Done,
        })
    }
}

// ============================================================================
// Composite Cursor Pagination (v2 logs)
// ============================================================================

/// Replay the server's two-part cursor, if any
///
/// Only `next_offset` changes; the time window parameters already in the
/// request stay as they are.
pub fn resolve_composite(metadata: &CursorMetadata) -> NextPage {
    match &metadata.next_offset {
        Some(cursor) => NextPage::with_param(NEXT_OFFSET_PARAM, cursor.to_param()),
        None => NextPage::Done,
    }
}

impl PagePayload for AuthLogPage {
    type Item = crate::logs::AuthLog;

    fn item_count(&self) -> usize {
        self.logs.len()
    }

    fn total_objects(&self) -> Option<u64> {
        self.metadata.total_objects
    }

    fn into_items(self) -> Vec<Self::Item> {
        self.logs
    }
}

/// Cursor pagination for v2 authentication logs
#[derive(Debug, Clone, Copy, Default)]
pub struct CompositeCursorResolver;

impl CursorResolver for CompositeCursorResolver {
    type Payload = AuthLogPage;
    type Metadata = IgnoredAny;

    fn resolve(&self, page: &Envelope<AuthLogPage, IgnoredAny>) -> Result<NextPage> {
        Ok(resolve_composite(&page.response.metadata))
    }
}
