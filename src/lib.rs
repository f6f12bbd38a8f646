//! Sumi-Crawl: a polite, single-lane web crawler
//!
//! Starting from seed URLs, the crawler repeatedly selects a URL from the
//! frontier, probes it to check that it serves HTML, fetches and parses it,
//! and feeds the outbound links it finds back into the frontier. Every
//! outbound request is preceded by a fixed politeness delay.

pub mod config;
pub mod crawler;
pub mod frontier;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Sumi-Crawl operations
///
/// Per-URL failures never surface here: they are absorbed by the scheduler.
/// Only setup problems are fatal to a crawl.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, CrawlScheduler};
pub use frontier::{Frontier, FrontierError, SelectionStrategy};
pub use output::{CrawlProgress, CrawlReport};
pub use state::CrawlState;
