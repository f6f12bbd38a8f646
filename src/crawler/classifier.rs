//! URL classifier: decides whether a URL is worth a full fetch
//!
//! Classification costs one HEAD round trip. Only a declared media type of
//! exactly `text/html` passes. Every failure mode collapses to "not
//! fetchable" in [`UrlClassifier::is_fetchable`]; [`UrlClassifier::probe`]
//! keeps the cause for callers that want it.

use crate::crawler::transport::{HttpTransport, TransportError};
use std::sync::Arc;
use thiserror::Error;

/// The only media type worth fetching
pub const HTML_MEDIA_TYPE: &str = "text/html";

/// Why a probe did not clear a URL for fetching
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeFailure {
    #[error("probe failed: {0}")]
    Transport(#[from] TransportError),

    #[error("probe returned HTTP {status}")]
    Status { status: u16 },

    #[error("not HTML: {content_type}")]
    NotHtml { content_type: String },

    #[error("no Content-Type declared")]
    MissingContentType,
}

/// Extracts the lowercase media type from a Content-Type header value
///
/// Parameters such as `charset` are dropped.
///
/// # Examples
///
/// ```
/// use sumi_crawl::crawler::media_type;
///
/// assert_eq!(media_type("text/html; charset=UTF-8"), "text/html");
/// assert_eq!(media_type(" Text/HTML "), "text/html");
/// ```
pub fn media_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}

/// Probes URLs with HEAD requests
#[derive(Debug)]
pub struct UrlClassifier<T> {
    transport: Arc<T>,
}

impl<T> Clone for UrlClassifier<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T: HttpTransport> UrlClassifier<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }

    /// Probes `url` and reports why it is not fetchable, if it isn't
    ///
    /// # Returns
    ///
    /// * `Ok(())` - 2xx response declaring `text/html`
    /// * `Err(ProbeFailure)` - Anything else
    pub async fn probe(&self, url: &str) -> Result<(), ProbeFailure> {
        let response = self.transport.head_probe(url).await?;

        if !(200..300).contains(&response.status) {
            return Err(ProbeFailure::Status {
                status: response.status,
            });
        }

        let content_type = response
            .content_type
            .ok_or(ProbeFailure::MissingContentType)?;

        if media_type(&content_type) != HTML_MEDIA_TYPE {
            return Err(ProbeFailure::NotHtml { content_type });
        }

        Ok(())
    }

    /// Returns true iff `url` declares `text/html`
    ///
    /// Never fails: an unreachable URL and a non-HTML URL look the same here.
    pub async fn is_fetchable(&self, url: &str) -> bool {
        match self.probe(url).await {
            Ok(()) => true,
            Err(failure) => {
                tracing::debug!("Can't probe {}: {}", url, failure);
                false
            }
        }
    }
}
