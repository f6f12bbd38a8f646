//! The URL frontier: visited set plus the queue of URLs still to crawl
//!
//! The frontier is the single authority on what has been visited. Its one
//! invariant is enforced in [`Frontier::offer`]: a URL already in the visited
//! set is never (re-)queued. The queue itself does not deduplicate, so the
//! same URL discovered twice before it is visited sits in the queue twice.
//!
//! # Example
//!
//! ```
//! use sumi_crawl::frontier::{FifoSelection, Frontier};
//!
//! let mut frontier = Frontier::new(["https://a.test"], Box::new(FifoSelection));
//! let url = frontier.select().unwrap();
//! frontier.mark_visited(&url);
//!
//! assert!(!frontier.offer("https://a.test"));
//! assert!(frontier.offer("https://a.test/b"));
//! assert_eq!(frontier.queued_len(), 1);
//! ```

mod policy;

pub use policy::{
    FifoSelection, HostRoundRobin, RandomSelection, SelectionPolicy, SelectionStrategy,
};

use std::collections::{HashSet, VecDeque};
use thiserror::Error;

/// Errors raised by frontier operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FrontierError {
    /// Nothing is left to select. This is how a crawl ends, not a fault.
    #[error("Frontier is empty")]
    Empty,
}

/// Visited set and unvisited queue driving crawl order
#[derive(Debug)]
pub struct Frontier {
    /// URLs already processed
    visited: HashSet<String>,

    /// URLs awaiting processing, duplicates allowed
    queue: VecDeque<String>,

    /// Decides which queued entry leaves next
    policy: Box<dyn SelectionPolicy>,
}

impl Frontier {
    /// Creates a frontier whose queue holds `seeds` in the given order
    pub fn new<I, S>(seeds: I, policy: Box<dyn SelectionPolicy>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            visited: HashSet::new(),
            queue: seeds.into_iter().map(Into::into).collect(),
            policy,
        }
    }

    /// Creates an empty frontier
    pub fn empty(policy: Box<dyn SelectionPolicy>) -> Self {
        Self::new(Vec::<String>::new(), policy)
    }

    /// Removes and returns one queued URL chosen by the selection policy
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The selected URL, no longer in the queue
    /// * `Err(FrontierError::Empty)` - The queue has zero entries
    pub fn select(&mut self) -> Result<String, FrontierError> {
        if self.queue.is_empty() {
            return Err(FrontierError::Empty);
        }

        let index = self.policy.choose(&self.queue);
        debug_assert!(
            index < self.queue.len(),
            "{} selection chose index {} of a {}-entry queue",
            self.policy.name(),
            index,
            self.queue.len()
        );

        let selected = if self.policy.keeps_queue_order() {
            self.queue.remove(index)
        } else {
            self.queue.swap_remove_back(index)
        };
        selected.ok_or(FrontierError::Empty)
    }

    /// Adds `url` to the visited set
    ///
    /// Idempotent. Returns true only the first time a URL is recorded.
    pub fn mark_visited(&mut self, url: &str) -> bool {
        if self.visited.contains(url) {
            return false;
        }
        self.visited.insert(url.to_string())
    }

    /// Appends `url` to the queue unless it has already been visited
    ///
    /// Returns true if the URL was queued. A URL that is queued but not yet
    /// visited is accepted again.
    pub fn offer(&mut self, url: &str) -> bool {
        if self.visited.contains(url) {
            return false;
        }
        self.queue.push_back(url.to_string());
        true
    }

    /// Returns whether the queue has zero entries
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns whether `url` is in the visited set
    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// Number of queued entries, counting duplicates
    pub fn queued_len(&self) -> usize {
        self.queue.len()
    }

    /// Number of visited URLs
    pub fn visited_len(&self) -> usize {
        self.visited.len()
    }

    /// Iterates over the visited set in no particular order
    pub fn visited(&self) -> impl Iterator<Item = &str> {
        self.visited.iter().map(String::as_str)
    }

    /// Iterates over the queue in insertion order
    pub fn queued(&self) -> impl Iterator<Item = &str> {
        self.queue.iter().map(String::as_str)
    }

    /// Visited URLs, sorted, for reporting
    pub fn visited_sorted(&self) -> Vec<String> {
        let mut urls: Vec<String> = self.visited.iter().cloned().collect();
        urls.sort();
        urls
    }

    /// Name of the active selection policy
    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }
}
