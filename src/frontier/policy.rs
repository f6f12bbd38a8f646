//! Selection policies for the frontier
//!
//! A policy only decides *which* queued entry goes next. Removing the entry
//! and enforcing the dedup contract stay with [`Frontier`](super::Frontier),
//! so any policy can be swapped in without touching the scheduler.

use crate::url::host_of;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use std::collections::{HashMap, VecDeque};
use std::fmt;

/// Chooses the next URL to leave the queue
pub trait SelectionPolicy: fmt::Debug + Send {
    /// Returns the index of the entry to remove from `queue`
    ///
    /// Callers guarantee `queue` is non-empty; the returned index must be in
    /// bounds.
    fn choose(&mut self, queue: &VecDeque<String>) -> usize;

    /// Whether the remaining entries must keep their insertion order
    ///
    /// Policies that never look at position can return false, letting the
    /// frontier fill the gap with the last entry instead of shifting.
    fn keeps_queue_order(&self) -> bool {
        true
    }

    /// Short name used in log output
    fn name(&self) -> &'static str;
}

/// Uniform random choice among every queued entry
///
/// Mixes breadth and depth without any per-host bookkeeping, which keeps a
/// single prolific host from monopolising the crawl the way FIFO would.
#[derive(Debug)]
pub struct RandomSelection {
    rng: StdRng,
}

impl RandomSelection {
    /// Creates a policy seeded from the operating system's entropy source
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a policy with a fixed seed, for reproducible crawl orders
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomSelection {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionPolicy for RandomSelection {
    fn choose(&mut self, queue: &VecDeque<String>) -> usize {
        self.rng.gen_range(0..queue.len())
    }

    fn keeps_queue_order(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "random"
    }
}

/// Oldest entry first
#[derive(Debug, Default)]
pub struct FifoSelection;

impl SelectionPolicy for FifoSelection {
    fn choose(&mut self, _queue: &VecDeque<String>) -> usize {
        0
    }

    fn name(&self) -> &'static str {
        "fifo"
    }
}

/// Rotates across hosts
///
/// Picks the oldest entry belonging to the host that has been served the
/// fewest times so far. Entries without a parsable host share one bucket.
#[derive(Debug, Default)]
pub struct HostRoundRobin {
    served: HashMap<String, u64>,
}

impl HostRoundRobin {
    pub fn new() -> Self {
        Self::default()
    }

    fn served_count(&self, host: &str) -> u64 {
        self.served.get(host).copied().unwrap_or(0)
    }
}

impl SelectionPolicy for HostRoundRobin {
    fn choose(&mut self, queue: &VecDeque<String>) -> usize {
        let mut best: Option<(usize, String, u64)> = None;

        for (index, url) in queue.iter().enumerate() {
            let host = host_of(url).unwrap_or_default();
            let count = self.served_count(&host);
            let better = match &best {
                Some((_, _, best_count)) => count < *best_count,
                None => true,
            };
            if better {
                let exhausted = count == 0;
                best = Some((index, host, count));
                if exhausted {
                    break;
                }
            }
        }

        match best {
            Some((index, host, _)) => {
                *self.served.entry(host).or_insert(0) += 1;
                index
            }
            None => 0,
        }
    }

    fn name(&self) -> &'static str {
        "host-round-robin"
    }
}

/// Configurable choice of selection policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionStrategy {
    /// Uniform random choice (default)
    #[default]
    Random,
    /// First in, first out
    Fifo,
    /// Least-served host first
    HostRoundRobin,
}

impl SelectionStrategy {
    /// Builds the policy this strategy names
    ///
    /// `seed` only affects [`SelectionStrategy::Random`].
    pub fn build(self, seed: Option<u64>) -> Box<dyn SelectionPolicy> {
        match self {
            Self::Random => match seed {
                Some(seed) => Box::new(RandomSelection::seeded(seed)),
                None => Box::new(RandomSelection::new()),
            },
            Self::Fifo => Box::new(FifoSelection),
            Self::HostRoundRobin => Box::new(HostRoundRobin::new()),
        }
    }
}

impl fmt::Display for SelectionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Random => "random",
            Self::Fifo => "fifo",
            Self::HostRoundRobin => "host-round-robin",
        };
        f.write_str(label)
    }
}
