//! Generic collection paginator
//!
//! Drives the request loop for any [`CursorResolver`]: fetch a page, decode
//! the envelope, fold its items in, ask the resolver for the next parameter
//! delta, repeat.

use super::types::{Accumulated, CursorResolver, OptionPipeline, PagePayload};
use crate::decode::decode_envelope;
use crate::error::Result;
use crate::http::{ApiRequest, Transport};
use crate::types::QueryParams;
use std::time::Instant;
use tracing::debug;

/// Items produced by resolver `R`
pub type ItemOf<R> = <<R as CursorResolver>::Payload as PagePayload>::Item;

/// Strategy-agnostic page loop over one endpoint
///
/// One request is in flight at a time. Any failure aborts the retrieval and
/// drops whatever was accumulated.
pub struct Paginator<'a, T: Transport + ?Sized> {
    transport: &'a T,
    path: String,
}

impl<'a, T: Transport + ?Sized> Paginator<'a, T> {
    /// Create a paginator for `path`
    pub fn new(transport: &'a T, path: impl Into<String>) -> Self {
        Self {
            transport,
            path: path.into(),
        }
    }

    /// Endpoint path
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Apply `options` to `params`, then fetch every page
    pub async fn run_with_options<R: CursorResolver>(
        &self,
        mut params: QueryParams,
        options: &OptionPipeline,
        resolver: &R,
    ) -> Result<Accumulated<ItemOf<R>>> {
        options.apply(&mut params);
        self.run(params, resolver).await
    }

    /// Fetch every page starting from `params`
    pub async fn run<R: CursorResolver>(
        &self,
        mut params: QueryParams,
        resolver: &R,
    ) -> Result<Accumulated<ItemOf<R>>> {
        let start = Instant::now();
        let mut accumulated = Accumulated::default();

        loop {
            let request = ApiRequest::get(self.path.as_str(), params.clone());
            let body = self.transport.send(&request).await?;
            let page = decode_envelope::<R::Payload, R::Metadata>(&body)?;

            let next = resolver.resolve(&page)?;
            let total = resolver.total_objects(&page);
            let items = page.response.into_items();

            debug!(
                path = %self.path,
                page = accumulated.pages + 1,
                records = items.len(),
                "fetched page"
            );
            accumulated.push_page(items, total);

            if !next.apply(&mut params) {
                break;
            }
        }

        debug!(
            path = %self.path,
            pages = accumulated.pages,
            records = accumulated.items.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "pagination complete"
        );

        Ok(accumulated)
    }
}
