//! HTTP transport module
//!
//! Provides the [`Transport`] seam the pagination core depends on and the
//! default reqwest-based implementation.
//!
//! # Features
//!
//! - **Automatic Retries**: Configurable retry logic with backoff
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Backoff Strategies**: Constant, linear, and exponential backoff
//! - **Parameter Placement**: Query string for GET, form body for POST

mod client;
mod rate_limit;
mod transport;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
pub use rate_limit::RateLimiter;
pub use transport::{ApiRequest, Transport};
