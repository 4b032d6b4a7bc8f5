//! Pagination module
//!
//! Supports: Offset/limit, Time window (v1 logs), Composite cursor (v2 logs)
//!
//! # Overview
//!
//! Each strategy implements [`CursorResolver`]: given the last decoded page it
//! returns the next request's parameter delta or [`NextPage::Done`]. The
//! [`Paginator`] runs the request loop for any strategy, and the
//! [`OptionPipeline`] lets callers adjust the first request.

mod paginator;
mod strategies;
mod types;

pub use paginator::{ItemOf, Paginator};
pub use strategies::{
    default_offset_params, next_log_v1_min_time, resolve_composite, resolve_offset,
    CompositeCursorResolver, LogWindowResolver, OffsetResolver, DEFAULT_LIMIT, DEFAULT_OFFSET,
    LOG_V1_PAGE_CAPACITY,
};
pub use types::{
    limit, offset, param, Accumulated, CursorResolver, NextPage, OptionPipeline, PagePayload,
    QueryOption,
};
