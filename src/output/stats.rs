//! Crawl statistics and reporting
//!
//! The scheduler owns a [`CrawlStats`] and, after every completed iteration,
//! publishes a [`CrawlProgress`] snapshot. When the loop ends it hands back a
//! [`CrawlReport`] that the CLI prints.

use chrono::{DateTime, Utc};

/// Snapshot of the frontier after a completed iteration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlProgress {
    /// Iterations completed so far
    pub iterations: u64,

    /// Number of visited URLs
    pub visited_count: usize,

    /// Number of queued entries, duplicates included
    pub queued_count: usize,

    /// The visited URLs, sorted
    pub visited: Vec<String>,
}

/// Running counters for one crawl
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Completed iterations (each one removes exactly one URL from the queue)
    pub iterations: u64,

    /// URLs that passed the probe and were marked visited
    pub pages_crawled: u64,

    /// URLs dropped because the probe failed or declared non-HTML content
    pub pages_skipped: u64,

    /// Fetches that failed after a successful probe
    pub fetch_failures: u64,

    /// Bodies that were not valid UTF-8
    pub decode_failures: u64,

    /// Links returned by the extractor, duplicates included
    pub links_discovered: u64,

    /// Links the frontier accepted into the queue
    pub links_enqueued: u64,

    /// Politeness pauses taken
    pub politeness_delays: u64,
}

/// Summary of a finished (or stopped) crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub stats: CrawlStats,

    /// Visited URLs, sorted
    pub visited: Vec<String>,

    /// Entries still queued when the loop ended
    pub remaining: usize,

    /// True if the loop ended on the stop signal rather than an empty frontier
    pub stopped: bool,
}

impl CrawlReport {
    /// Wall-clock duration of the crawl in whole seconds
    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }
}

/// Prints a crawl report to stdout in a formatted manner
///
/// # Arguments
///
/// * `report` - The report to display
/// * `list_visited` - Also print every visited URL
pub fn print_report(report: &CrawlReport, list_visited: bool) {
    println!("=== Crawl Report ===\n");

    println!("Run:");
    println!("  Started:  {}", report.started_at.to_rfc3339());
    println!("  Finished: {}", report.finished_at.to_rfc3339());
    println!("  Duration: {}s", report.duration_seconds());
    if report.stopped {
        println!("  Ended on stop signal ({} URLs still queued)", report.remaining);
    } else {
        println!("  Ended with an empty frontier");
    }
    println!();

    let stats = &report.stats;
    println!("Iterations: {}", stats.iterations);
    println!("  Crawled: {}", stats.pages_crawled);
    println!("  Skipped (probe): {}", stats.pages_skipped);
    println!("  Fetch failures: {}", stats.fetch_failures);
    println!("  Decode failures: {}", stats.decode_failures);
    println!();

    println!("Links:");
    println!("  Discovered: {}", stats.links_discovered);
    println!("  Enqueued: {}", stats.links_enqueued);
    println!();

    println!("Politeness delays: {}", stats.politeness_delays);

    if list_visited && !report.visited.is_empty() {
        println!("\nVisited URLs ({}):", report.visited.len());
        for url in &report.visited {
            println!("  - {}", url);
        }
    }
}
