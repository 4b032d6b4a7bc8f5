//! HTTP client with retry and rate limiting
//!
//! Provides the default [`Transport`] implementation that handles:
//! - Automatic retries with configurable backoff
//! - Rate limiting to prevent API throttling
//! - Query string vs. form body placement of parameters
//! - Error classification for retry decisions

use super::rate_limit::RateLimiter;
use super::transport::{ApiRequest, Transport};
use crate::config::{ClientConfig, RateLimitConfig};
use crate::decode::is_fail_body;
use crate::error::{is_retryable_status, Error, Result};
use crate::types::BackoffType;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL for all requests
    pub base_url: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// Maximum number of retries
    pub max_retries: u32,
    /// Initial delay for backoff
    pub initial_backoff: Duration,
    /// Maximum delay for backoff
    pub max_backoff: Duration,
    /// Type of backoff strategy
    pub backoff_type: BackoffType,
    /// Rate limiter configuration
    pub rate_limit: Option<RateLimitConfig>,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(30),
            max_retries: 3,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(60),
            backoff_type: BackoffType::Exponential,
            rate_limit: None,
            default_headers: HashMap::new(),
            user_agent: format!("admin-api-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl From<&ClientConfig> for HttpClientConfig {
    fn from(config: &ClientConfig) -> Self {
        Self {
            base_url: Some(config.base_url.clone()),
            timeout: Duration::from_secs(config.timeout_seconds),
            max_retries: config.max_retries,
            initial_backoff: Duration::from_millis(config.backoff.initial_ms),
            max_backoff: Duration::from_millis(config.backoff.max_ms),
            backoff_type: config.backoff.backoff_type,
            rate_limit: config.rate_limit.clone(),
            default_headers: config.default_headers.clone(),
            user_agent: config.user_agent.clone(),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set max retries
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    /// Set backoff configuration
    pub fn backoff(mut self, backoff_type: BackoffType, initial: Duration, max: Duration) -> Self {
        self.config.backoff_type = backoff_type;
        self.config.initial_backoff = initial;
        self.config.max_backoff = max;
        self
    }

    /// Set rate limiter
    pub fn rate_limit(mut self, config: RateLimitConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Outcome of a single attempt
enum Attempt {
    Done(Response),
    Retry { reason: Error, delay: Duration },
}

/// HTTP client with retry and rate limiting
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    rate_limiter: Option<RateLimiter>,
}

impl HttpClient {
    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            client,
            config,
            rate_limiter,
        })
    }

    /// Create a client from a loaded [`ClientConfig`]
    pub fn from_client_config(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        Self::with_config(HttpClientConfig::from(config))
    }

    /// Get the client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Check if rate limiting is enabled
    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }

    /// Send `request`, retrying transient failures, and return the final response
    ///
    /// Non-retryable statuses are returned as-is; the caller decides what a
    /// 4xx body means.
    pub async fn execute(&self, request: &ApiRequest) -> Result<Response> {
        let url = self.build_url(&request.path);
        let mut attempt = 0;

        loop {
            if let Some(ref limiter) = self.rate_limiter {
                limiter.wait().await;
            }

            match self.attempt(request, &url, attempt).await? {
                Attempt::Done(response) => {
                    debug!(
                        method = %request.method,
                        url = %url,
                        status = response.status().as_u16(),
                        attempt,
                        "request complete"
                    );
                    return Ok(response);
                }
                Attempt::Retry { reason, delay } => {
                    warn!(
                        method = %request.method,
                        url = %url,
                        attempt = attempt + 1,
                        max_attempts = self.config.max_retries + 1,
                        delay_ms = delay.as_millis() as u64,
                        "{reason}, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    /// Issue one attempt and classify its outcome
    async fn attempt(&self, request: &ApiRequest, url: &str, attempt: u32) -> Result<Attempt> {
        let can_retry = attempt < self.config.max_retries;

        match self.build_request(request, url).send().await {
            Ok(response) => {
                let status = response.status();

                if status == StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_seconds = extract_retry_after(&response);
                    if !can_retry {
                        return Err(Error::RateLimited {
                            retry_after_seconds,
                        });
                    }
                    return Ok(Attempt::Retry {
                        reason: Error::RateLimited {
                            retry_after_seconds,
                        },
                        delay: Duration::from_secs(retry_after_seconds),
                    });
                }

                if can_retry && is_retryable_status(status.as_u16()) {
                    return Ok(Attempt::Retry {
                        reason: Error::http_status(status.as_u16(), ""),
                        delay: self.calculate_backoff(attempt),
                    });
                }

                Ok(Attempt::Done(response))
            }
            Err(e) if e.is_timeout() => {
                let timeout_ms = self.config.timeout.as_millis() as u64;
                if !can_retry {
                    return Err(Error::Timeout { timeout_ms });
                }
                Ok(Attempt::Retry {
                    reason: Error::Timeout { timeout_ms },
                    delay: self.calculate_backoff(attempt),
                })
            }
            Err(e) if e.is_connect() && can_retry => Ok(Attempt::Retry {
                reason: Error::Http(e),
                delay: self.calculate_backoff(attempt),
            }),
            Err(e) => Err(Error::Http(e)),
        }
    }

    /// Attach headers and place parameters for `request.method`
    fn build_request(&self, request: &ApiRequest, url: &str) -> RequestBuilder {
        let mut builder = self
            .client
            .request(request.method.into(), url)
            .timeout(self.config.timeout);

        for (key, value) in &self.config.default_headers {
            builder = builder.header(key.as_str(), value.as_str());
        }

        if request.method.uses_body() {
            builder.form(&request.params)
        } else if request.params.is_empty() {
            builder
        } else {
            builder.query(&request.params)
        }
    }

    /// Build full URL from path
    fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        match &self.config.base_url {
            Some(base) => {
                let base = base.trim_end_matches('/');
                let path = path.trim_start_matches('/');
                format!("{base}/{path}")
            }
            None => path.to_string(),
        }
    }

    /// Calculate backoff delay for a given attempt
    pub fn calculate_backoff(&self, attempt: u32) -> Duration {
        let delay = match self.config.backoff_type {
            BackoffType::Constant => self.config.initial_backoff,
            BackoffType::Linear => self.config.initial_backoff * (attempt + 1),
            BackoffType::Exponential => {
                let factor = 2u32.saturating_pow(attempt);
                self.config.initial_backoff.saturating_mul(factor)
            }
        };

        std::cmp::min(delay, self.config.max_backoff)
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn send(&self, request: &ApiRequest) -> Result<String> {
        let response = self.execute(request).await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            return Ok(body);
        }

        // FAIL envelopes arrive with 4xx/5xx statuses; let the decoder report them.
        if is_fail_body(&body) {
            debug!("{} {} returned a FAIL envelope", request.method, request.path);
            return Ok(body);
        }

        Err(Error::http_status(status.as_u16(), body))
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}

/// Extract retry-after header value
fn extract_retry_after(response: &Response) -> u64 {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse().ok())
        .unwrap_or(60)
}
