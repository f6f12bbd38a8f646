//! HTTP transport used by the classifier and the fetcher
//!
//! This module handles the raw requests the crawler issues:
//! - Building HTTP clients that send the configured identity
//! - HEAD probes reporting status and Content-Type
//! - GET requests returning status and body bytes
//! - Bounded retry of 503 responses
//! - Error classification (timeout / network / protocol)
//!
//! Non-2xx responses are *not* errors at this layer: they come back with
//! their status so callers can tell them apart from transport failures.

use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client, RequestBuilder, Response, StatusCode};
use std::time::Duration;
use thiserror::Error;

/// Result of a HEAD probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    /// HTTP status code
    pub status: u16,

    /// Raw Content-Type header value, if the server sent one
    pub content_type: Option<String>,
}

/// Result of a GET request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyResponse {
    /// HTTP status code
    pub status: u16,

    /// Undecoded response body
    pub body: Vec<u8>,
}

/// Transport-level failures: no usable HTTP response was obtained
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("Protocol error for {url}: {message}")]
    Protocol { url: String, message: String },
}

impl TransportError {
    /// Classifies a reqwest error for `url`
    pub fn from_reqwest(url: &str, error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else if error.is_connect() {
            Self::Network {
                url: url.to_string(),
                message: error.to_string(),
            }
        } else if error.is_builder() || error.is_redirect() || error.is_decode() || error.is_body()
        {
            Self::Protocol {
                url: url.to_string(),
                message: error.to_string(),
            }
        } else {
            Self::Network {
                url: url.to_string(),
                message: error.to_string(),
            }
        }
    }
}

/// The two requests the crawler needs from an HTTP stack
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Issues a metadata-only request against `url`
    async fn head_probe(&self, url: &str) -> Result<ProbeResponse, TransportError>;

    /// Retrieves the full body of `url`
    async fn get_body(&self, url: &str) -> Result<BodyResponse, TransportError>;
}

/// How 503 responses are retried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first 503
    pub max_retries: u32,

    /// Pause before each extra attempt
    pub delay: Duration,
}

impl RetryPolicy {
    /// Never retries
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            delay: Duration::ZERO,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

/// Builds an HTTP client that identifies itself as `identity`
///
/// # Arguments
///
/// * `identity` - User-Agent header value sent with every request
/// * `request_timeout` - Total time allowed per request
/// * `connect_timeout` - Time allowed to establish a connection
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use sumi_crawl::crawler::build_http_client;
///
/// let client = build_http_client(
///     "Mozilla/5.0 (compatible; SumiCrawl/0.1)",
///     Duration::from_secs(30),
///     Duration::from_secs(10),
/// )
/// .unwrap();
/// ```
pub fn build_http_client(
    identity: &str,
    request_timeout: Duration,
    connect_timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(identity)
        .timeout(request_timeout)
        .connect_timeout(connect_timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`HttpTransport`] backed by a reqwest client
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    retry: RetryPolicy,
}

impl ReqwestTransport {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            retry: RetryPolicy::none(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Sends the request built by `build`, re-sending it on 503 while the
    /// retry budget lasts
    async fn send(
        &self,
        url: &str,
        build: impl Fn() -> RequestBuilder + Send + Sync,
    ) -> Result<Response, TransportError> {
        let mut attempt = 0;
        loop {
            let response = build()
                .send()
                .await
                .map_err(|e| TransportError::from_reqwest(url, &e))?;

            if response.status() == StatusCode::SERVICE_UNAVAILABLE
                && attempt < self.retry.max_retries
            {
                attempt += 1;
                tracing::debug!(
                    "503 from {}, retry {}/{} in {:?}",
                    url,
                    attempt,
                    self.retry.max_retries,
                    self.retry.delay
                );
                tokio::time::sleep(self.retry.delay).await;
                continue;
            }

            return Ok(response);
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn head_probe(&self, url: &str) -> Result<ProbeResponse, TransportError> {
        let response = self.send(url, || self.client.head(url)).await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Ok(ProbeResponse {
            status: response.status().as_u16(),
            content_type,
        })
    }

    async fn get_body(&self, url: &str) -> Result<BodyResponse, TransportError> {
        let response = self.send(url, || self.client.get(url)).await?;
        let status = response.status().as_u16();

        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::from_reqwest(url, &e))?;

        Ok(BodyResponse {
            status,
            body: body.to_vec(),
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory transport for scheduler and component tests

    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Serves canned responses and records every request it sees
    #[derive(Debug, Default)]
    pub struct FakeTransport {
        heads: HashMap<String, Result<ProbeResponse, TransportError>>,
        bodies: HashMap<String, Result<BodyResponse, TransportError>>,
        requests: Mutex<Vec<(&'static str, String)>>,
    }

    impl FakeTransport {
        pub fn new() -> Self {
            Self::default()
        }

        /// Registers an HTML page: HEAD says text/html, GET returns `html`
        pub fn html(mut self, url: &str, html: &str) -> Self {
            self.heads.insert(
                url.to_string(),
                Ok(ProbeResponse {
                    status: 200,
                    content_type: Some("text/html; charset=utf-8".to_string()),
                }),
            );
            self.bodies.insert(
                url.to_string(),
                Ok(BodyResponse {
                    status: 200,
                    body: html.as_bytes().to_vec(),
                }),
            );
            self
        }

        pub fn head(mut self, url: &str, response: Result<ProbeResponse, TransportError>) -> Self {
            self.heads.insert(url.to_string(), response);
            self
        }

        pub fn body(mut self, url: &str, response: Result<BodyResponse, TransportError>) -> Self {
            self.bodies.insert(url.to_string(), response);
            self
        }

        /// Every request issued so far, as (method, url)
        pub fn requests(&self) -> Vec<(&'static str, String)> {
            self.requests.lock().unwrap().clone()
        }

        fn record(&self, method: &'static str, url: &str) {
            self.requests.lock().unwrap().push((method, url.to_string()));
        }

        fn unreachable(url: &str) -> TransportError {
            TransportError::Network {
                url: url.to_string(),
                message: "connection refused".to_string(),
            }
        }
    }

    #[async_trait]
    impl HttpTransport for FakeTransport {
        async fn head_probe(&self, url: &str) -> Result<ProbeResponse, TransportError> {
            self.record("HEAD", url);
            self.heads
                .get(url)
                .cloned()
                .unwrap_or_else(|| Err(Self::unreachable(url)))
        }

        async fn get_body(&self, url: &str) -> Result<BodyResponse, TransportError> {
            self.record("GET", url);
            self.bodies
                .get(url)
                .cloned()
                .unwrap_or_else(|| Err(Self::unreachable(url)))
        }
    }
}
