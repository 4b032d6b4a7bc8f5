//! Pagination types and traits
//!
//! Defines the core pagination abstractions used by all strategies.

use crate::decode::Envelope;
use crate::error::Result;
use crate::types::QueryParams;
use serde::de::DeserializeOwned;
use std::fmt;

/// A caller-supplied mutation of the outgoing parameters
pub type QueryOption = Box<dyn Fn(&mut QueryParams) + Send + Sync>;

/// Option that sets `limit`
pub fn limit(value: u32) -> QueryOption {
    param("limit", value.to_string())
}

/// Option that sets `offset`
pub fn offset(value: u64) -> QueryOption {
    param("offset", value.to_string())
}

/// Option that sets an arbitrary parameter
pub fn param(key: impl Into<String>, value: impl Into<String>) -> QueryOption {
    let key = key.into();
    let value = value.into();
    Box::new(move |params: &mut QueryParams| {
        params.insert(key.clone(), value.clone());
    })
}

/// Ordered list of options applied before the first request of a retrieval
///
/// Later pages are driven by the cursor resolver alone; the pipeline is not
/// replayed.
#[derive(Default)]
pub struct OptionPipeline {
    options: Vec<QueryOption>,
}

impl OptionPipeline {
    /// Create an empty pipeline
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an option
    #[must_use]
    pub fn with(mut self, option: QueryOption) -> Self {
        self.options.push(option);
        self
    }

    /// Append an option in place
    pub fn push(&mut self, option: QueryOption) {
        self.options.push(option);
    }

    /// Run every option, in insertion order, over `params`
    pub fn apply(&self, params: &mut QueryParams) {
        for option in &self.options {
            option(params);
        }
    }

    /// Number of options
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Whether the pipeline has no options
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

impl From<Vec<QueryOption>> for OptionPipeline {
    fn from(options: Vec<QueryOption>) -> Self {
        Self { options }
    }
}

impl From<Option<QueryOption>> for OptionPipeline {
    fn from(option: Option<QueryOption>) -> Self {
        Self {
            options: option.into_iter().collect(),
        }
    }
}

impl FromIterator<QueryOption> for OptionPipeline {
    fn from_iter<I: IntoIterator<Item = QueryOption>>(iter: I) -> Self {
        Self {
            options: iter.into_iter().collect(),
        }
    }
}

impl fmt::Debug for OptionPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionPipeline")
            .field("options", &self.options.len())
            .finish()
    }
}

/// Result of the next page computation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    /// More pages available; these parameters replace their previous values
    Continue {
        /// Query parameters to add/replace
        query_params: QueryParams,
    },
    /// No more pages
    Done,
}

impl NextPage {
    /// Create a continuation with query parameters
    pub fn with_params(query_params: QueryParams) -> Self {
        Self::Continue { query_params }
    }

    /// Create a continuation with a single parameter
    pub fn with_param(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut query_params = QueryParams::new();
        query_params.insert(key.into(), value.into());
        Self::Continue { query_params }
    }

    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Check if this is a continue result
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue { .. })
    }

    /// Apply the parameter delta; returns whether another page is needed
    pub fn apply(&self, params: &mut QueryParams) -> bool {
        match self {
            Self::Continue { query_params } => {
                params.extend(query_params.iter().map(|(k, v)| (k.clone(), v.clone())));
                true
            }
            Self::Done => false,
        }
    }

    /// Parameter value this continuation sets, if any
    pub fn param(&self, key: &str) -> Option<&str> {
        match self {
            Self::Continue { query_params } => query_params.get(key).map(String::as_str),
            Self::Done => None,
        }
    }
}

/// A decoded page payload that can be split into items
pub trait PagePayload {
    /// Element type accumulated across pages
    type Item;

    /// Number of items on this page
    fn item_count(&self) -> usize;

    /// Server-reported total carried in the payload, if any
    fn total_objects(&self) -> Option<u64> {
        None
    }

    /// Consume the payload and return its items in order
    fn into_items(self) -> Vec<Self::Item>;
}

impl<T> PagePayload for Vec<T> {
    type Item = T;

    fn item_count(&self) -> usize {
        self.len()
    }

    fn into_items(self) -> Vec<T> {
        self
    }
}

/// Core trait for pagination strategies
///
/// Given the last decoded page, produce the next request's parameter delta
/// or signal completion.
pub trait CursorResolver: Send + Sync {
    /// Payload type of the `response` field
    type Payload: DeserializeOwned + PagePayload + Send;
    /// Type of the top-level `metadata` field
    type Metadata: DeserializeOwned + Send;

    /// Decide whether another page is needed
    fn resolve(&self, page: &Envelope<Self::Payload, Self::Metadata>) -> Result<NextPage>;

    /// Total object count reported for this page
    fn total_objects(&self, page: &Envelope<Self::Payload, Self::Metadata>) -> Option<u64> {
        page.response.total_objects()
    }
}

/// Items gathered across every page of one retrieval
#[derive(Debug, Clone, PartialEq)]
pub struct Accumulated<T> {
    /// Items in fetch order
    pub items: Vec<T>,
    /// Largest total reported by any page
    pub total_objects: Option<u64>,
    /// Number of pages fetched
    pub pages: usize,
}

impl<T> Default for Accumulated<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total_objects: None,
            pages: 0,
        }
    }
}

impl<T> Accumulated<T> {
    /// Fold one page into the result
    pub fn push_page(&mut self, items: Vec<T>, total_objects: Option<u64>) {
        self.items.extend(items);
        self.total_objects = match (self.total_objects, total_objects) {
            (Some(seen), Some(new)) => Some(seen.max(new)),
            (seen, new) => new.or(seen),
        };
        self.pages += 1;
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no items were returned
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> IntoIterator for Accumulated<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
