//! Output module for crawl progress and reports
//!
//! This module handles:
//! - Per-iteration progress snapshots published by the scheduler
//! - Running counters for a crawl
//! - The final report and its console rendering

pub mod stats;

pub use stats::{print_report, CrawlProgress, CrawlReport, CrawlStats};
