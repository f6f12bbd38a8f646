//! State module for tracking crawl progress
//!
//! `CrawlState` names the steps of the scheduler's control loop and which
//! transitions between them are legal.

mod crawl_state;

pub use crawl_state::CrawlState;
