use crate::frontier::SelectionStrategy;
use serde::Deserialize;
use std::time::Duration;

/// Browser identity sent when the config does not name one
///
/// Some servers answer anonymous clients with 429/503; a browser-like
/// identity gets fewer of those.
pub const DEFAULT_IDENTITY: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_9_3) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/35.0.1916.47 Safari/537.36";

/// Main configuration structure for Sumi-Crawl
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    pub seeds: SeedConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Delay before every outbound request (milliseconds)
    #[serde(rename = "politeness-interval")]
    pub politeness_interval: u64,

    /// How the next URL is picked from the frontier
    #[serde(rename = "selection-policy")]
    pub selection_policy: SelectionStrategy,

    /// Fixed seed for random selection
    #[serde(rename = "selection-seed")]
    pub selection_seed: Option<u64>,

    /// Total time allowed for one request (seconds)
    #[serde(rename = "request-timeout")]
    pub request_timeout: u64,

    /// Time allowed to establish a connection (seconds)
    #[serde(rename = "connect-timeout")]
    pub connect_timeout: u64,

    /// How many times a 503 response is retried before giving up
    #[serde(rename = "retry-unavailable")]
    pub retry_unavailable: u32,

    /// Pause between 503 retries (milliseconds)
    #[serde(rename = "retry-delay")]
    pub retry_delay: u64,
}

impl CrawlerConfig {
    pub fn politeness(&self) -> Duration {
        Duration::from_millis(self.politeness_interval)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            politeness_interval: 10_000,
            selection_policy: SelectionStrategy::Random,
            selection_seed: None,
            request_timeout: 30,
            connect_timeout: 10,
            retry_unavailable: 0,
            retry_delay: 5_000,
        }
    }
}

/// Client identity configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Value of the User-Agent header sent with every request
    pub identity: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            identity: DEFAULT_IDENTITY.to_string(),
        }
    }
}

/// Seed URLs the crawl starts from
#[derive(Debug, Clone, Deserialize)]
pub struct SeedConfig {
    /// Absolute http(s) URLs, queued in this order
    pub urls: Vec<String>,
}
