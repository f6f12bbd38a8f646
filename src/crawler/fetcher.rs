//! Page fetcher and body decoding
//!
//! The fetcher retrieves the body of a URL that already passed the
//! classifier. Failures come back as [`FetchFailure`]; decoding failures as
//! [`DecodeFailure`]. The scheduler treats both as "no links on this page".

use crate::crawler::transport::{HttpTransport, TransportError};
use std::sync::Arc;
use thiserror::Error;

/// Why a page body could not be retrieved
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailure {
    #[error("fetch failed: {0}")]
    Transport(#[from] TransportError),

    #[error("fetch returned HTTP {status}")]
    Status { status: u16 },
}

/// A body that is not valid UTF-8
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Can't decode {url} as UTF-8: {source}")]
pub struct DecodeFailure {
    pub url: String,
    #[source]
    pub source: std::str::Utf8Error,
}

/// Decodes a page body as UTF-8
///
/// # Returns
///
/// * `Ok(String)` - The decoded text
/// * `Err(DecodeFailure)` - The body is not valid UTF-8
pub fn decode_html(url: &str, bytes: &[u8]) -> Result<String, DecodeFailure> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|source| DecodeFailure {
            url: url.to_string(),
            source,
        })
}

/// Retrieves page bodies with GET requests
#[derive(Debug)]
pub struct PageFetcher<T> {
    transport: Arc<T>,
}

impl<T> Clone for PageFetcher<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T: HttpTransport> PageFetcher<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }

    /// Fetches the raw body of `url`
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<u8>)` - Body bytes of a 2xx response
    /// * `Err(FetchFailure)` - Transport failure or non-2xx status
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchFailure> {
        let response = self.transport.get_body(url).await?;

        if !(200..300).contains(&response.status) {
            return Err(FetchFailure::Status {
                status: response.status,
            });
        }

        Ok(response.body)
    }
}
