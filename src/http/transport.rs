//! Transport seam
//!
//! The pagination core never talks to the network directly. It hands an
//! [`ApiRequest`] to a [`Transport`] and gets the raw response body back.
//! Signing, TLS and retries all live behind this trait.

use crate::error::Result;
use crate::types::{Method, QueryParams};
use async_trait::async_trait;

/// One outgoing API call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    /// HTTP method
    pub method: Method,
    /// Path relative to the API host (e.g. `/admin/v1/users`)
    pub path: String,
    /// Parameters, sent in the query string or form body depending on method
    pub params: QueryParams,
}

impl ApiRequest {
    /// Create a GET request
    pub fn get(path: impl Into<String>, params: QueryParams) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            params,
        }
    }

    /// Create a POST request
    pub fn post(path: impl Into<String>, params: QueryParams) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            params,
        }
    }
}

/// Executes a single signed request and returns the response body
///
/// Implementations must be safe to share between tasks if the caller runs
/// several retrievals at once. Any failure is reported as an error; the
/// paginator does not retry.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request and return the raw body text
    async fn send(&self, request: &ApiRequest) -> Result<String>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for &T {
    async fn send(&self, request: &ApiRequest) -> Result<String> {
        (**self).send(request).await
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn send(&self, request: &ApiRequest) -> Result<String> {
        (**self).send(request).await
    }
}
