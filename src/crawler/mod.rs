//! Crawler module for web page probing, fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP transport with 503 retry
//! - HEAD-based classification of URLs
//! - Page fetching and UTF-8 decoding
//! - HTML parsing and link extraction
//! - Politeness pacing
//! - The scheduler's control loop

mod classifier;
mod fetcher;
mod pacing;
mod parser;
mod scheduler;
mod transport;

pub use classifier::{media_type, ProbeFailure, UrlClassifier, HTML_MEDIA_TYPE};
pub use fetcher::{decode_html, DecodeFailure, FetchFailure, PageFetcher};
pub use pacing::Politeness;
pub use parser::{extract_links, parse_html, ParsedPage};
pub use scheduler::{CrawlScheduler, IterationOutcome};
pub use transport::{
    build_http_client, BodyResponse, HttpTransport, ProbeResponse, ReqwestTransport, RetryPolicy,
    TransportError,
};

use crate::config::Config;
use crate::frontier::Frontier;
use crate::output::CrawlReport;
use crate::CrawlError;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Builds a scheduler for `config` backed by a real HTTP client
///
/// The frontier is seeded with the configured URLs in order, using the
/// configured selection policy.
pub fn build_scheduler(config: &Config) -> Result<CrawlScheduler<ReqwestTransport>, CrawlError> {
    let client = build_http_client(
        &config.user_agent.identity,
        config.crawler.request_timeout(),
        config.crawler.connect_timeout(),
    )?;

    let transport = ReqwestTransport::new(client).with_retry(RetryPolicy {
        max_retries: config.crawler.retry_unavailable,
        delay: config.crawler.retry_delay(),
    });

    let policy = config
        .crawler
        .selection_policy
        .build(config.crawler.selection_seed);
    let frontier = Frontier::new(config.seeds.urls.iter().cloned(), policy);

    Ok(CrawlScheduler::new(
        frontier,
        Arc::new(transport),
        config.crawler.politeness(),
    ))
}

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client and transport
/// 2. Seed the frontier
/// 3. Run the scheduler until the frontier is empty or `stop` is cancelled
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `stop` - Cooperative stop signal, honored between iterations
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl ran to completion or was stopped
/// * `Err(CrawlError)` - The crawl could not be set up
pub async fn crawl(config: &Config, stop: CancellationToken) -> Result<CrawlReport, CrawlError> {
    let mut scheduler = build_scheduler(config)?.with_stop_signal(stop);
    Ok(scheduler.run().await)
}
