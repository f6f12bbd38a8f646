//! Crawl scheduler: the control loop driving a crawl
//!
//! One iteration walks the state machine
//!
//! ```text
//! SELECTING -> PROBING -> (SKIPPING | FETCHING -> EXTRACTING -> UPDATING) -> SELECTING
//! ```
//!
//! and ends in `DONE` once selection finds the frontier empty. Exactly one URL
//! is in flight at a time, and every iteration takes exactly two politeness
//! pauses: one before the probe, one after it (ahead of the fetch, or in place
//! of it when the URL is skipped).
//!
//! Per-URL failures never stop the loop. A URL that fails the probe is dropped
//! without being recorded anywhere; a URL whose fetch or decode fails is still
//! marked visited, with zero links discovered.

use crate::crawler::classifier::UrlClassifier;
use crate::crawler::fetcher::{decode_html, PageFetcher};
use crate::crawler::pacing::Politeness;
use crate::crawler::parser::parse_html;
use crate::crawler::transport::HttpTransport;
use crate::frontier::{Frontier, FrontierError};
use crate::output::{CrawlProgress, CrawlReport, CrawlStats};
use crate::state::CrawlState;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// What a single call to [`CrawlScheduler::step`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IterationOutcome {
    /// The URL passed the probe, was fetched and marked visited
    Crawled {
        url: String,
        links_found: usize,
        links_enqueued: usize,
    },

    /// The URL failed the probe and was dropped
    Skipped { url: String },

    /// The stop signal was seen at the selection boundary; nothing was selected
    Stopped,

    /// The frontier is empty; the crawl is over
    Done,
}

/// Owns the frontier and drives probe / fetch / extract / update
pub struct CrawlScheduler<T> {
    frontier: Frontier,
    classifier: UrlClassifier<T>,
    fetcher: PageFetcher<T>,
    politeness: Politeness,
    state: CrawlState,
    stats: CrawlStats,
    stop: CancellationToken,
    progress: watch::Sender<CrawlProgress>,
}

impl<T: HttpTransport> CrawlScheduler<T> {
    /// Creates a scheduler over `frontier`
    ///
    /// # Arguments
    ///
    /// * `frontier` - Seeded frontier; the scheduler becomes its only owner
    /// * `transport` - Shared by the classifier and the fetcher
    /// * `politeness_interval` - Pause taken before every outbound request
    pub fn new(frontier: Frontier, transport: Arc<T>, politeness_interval: Duration) -> Self {
        let (progress, _) = watch::channel(CrawlProgress::default());

        Self {
            frontier,
            classifier: UrlClassifier::new(Arc::clone(&transport)),
            fetcher: PageFetcher::new(transport),
            politeness: Politeness::new(politeness_interval),
            state: CrawlState::Selecting,
            stats: CrawlStats::default(),
            stop: CancellationToken::new(),
            progress,
        }
    }

    /// Replaces the stop signal
    ///
    /// The signal is only honored at the selection boundary: a probe or fetch
    /// already in flight runs to completion first.
    pub fn with_stop_signal(mut self, stop: CancellationToken) -> Self {
        self.stop = stop;
        self
    }

    /// Receives a [`CrawlProgress`] after every completed iteration
    ///
    /// Snapshots are only built while someone is subscribed, so the receiver
    /// starts from the current progress rather than a stale one.
    pub fn subscribe(&self) -> watch::Receiver<CrawlProgress> {
        self.progress.send_replace(self.progress());
        self.progress.subscribe()
    }

    pub fn state(&self) -> CrawlState {
        self.state
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    pub fn stats(&self) -> CrawlStats {
        self.stats
    }

    /// Current visited count, queued count and visited set
    pub fn progress(&self) -> CrawlProgress {
        CrawlProgress {
            iterations: self.stats.iterations,
            visited_count: self.frontier.visited_len(),
            queued_count: self.frontier.queued_len(),
            visited: self.frontier.visited_sorted(),
        }
    }

    fn enter(&mut self, next: CrawlState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal crawl transition {} -> {}",
            self.state,
            next
        );
        tracing::trace!("{} -> {}", self.state, next);
        self.state = next;
    }

    /// Runs one iteration of the crawl loop
    ///
    /// # Returns
    ///
    /// * `Crawled` / `Skipped` - One URL left the queue
    /// * `Stopped` - The stop signal is set; the frontier was not touched
    /// * `Done` - The frontier is empty (and stays `Done` on further calls)
    pub async fn step(&mut self) -> IterationOutcome {
        if self.state.is_terminal() {
            return IterationOutcome::Done;
        }

        if self.stop.is_cancelled() {
            return IterationOutcome::Stopped;
        }

        let url = match self.frontier.select() {
            Ok(url) => url,
            Err(FrontierError::Empty) => {
                self.enter(CrawlState::Done);
                return IterationOutcome::Done;
            }
        };

        self.enter(CrawlState::Probing);
        tracing::debug!("Processing URL: {}", url);
        self.politeness.pause().await;

        if !self.classifier.is_fetchable(&url).await {
            self.enter(CrawlState::Skipping);
            // Paces the request the probe already made
            self.politeness.pause().await;
            self.stats.pages_skipped += 1;
            self.enter(CrawlState::Selecting);
            self.finish_iteration();
            return IterationOutcome::Skipped { url };
        }

        self.enter(CrawlState::Fetching);
        self.politeness.pause().await;
        let links = self.fetch_links(&url).await;

        self.enter(CrawlState::Updating);
        self.frontier.mark_visited(&url);
        let links_enqueued = links
            .iter()
            .filter(|link| self.frontier.offer(link))
            .count();

        self.stats.pages_crawled += 1;
        self.stats.links_discovered += links.len() as u64;
        self.stats.links_enqueued += links_enqueued as u64;

        self.enter(CrawlState::Selecting);
        self.finish_iteration();

        IterationOutcome::Crawled {
            url,
            links_found: links.len(),
            links_enqueued,
        }
    }

    /// Fetches, decodes and parses `url`; any failure yields no links
    async fn fetch_links(&mut self, url: &str) -> Vec<String> {
        let fetched = self.fetcher.fetch(url).await;
        self.enter(CrawlState::Extracting);

        let bytes = match fetched {
            Ok(bytes) => bytes,
            Err(failure) => {
                tracing::warn!("Failed to get {}: {}", url, failure);
                self.stats.fetch_failures += 1;
                return Vec::new();
            }
        };

        let html = match decode_html(url, &bytes) {
            Ok(html) => html,
            Err(failure) => {
                tracing::warn!("{}", failure);
                self.stats.decode_failures += 1;
                return Vec::new();
            }
        };

        let parsed = parse_html(url, &html);
        tracing::debug!(
            "Parsed {} ({}): {} links",
            url,
            parsed.title.as_deref().unwrap_or("untitled"),
            parsed.links.len()
        );
        parsed.links
    }

    fn finish_iteration(&mut self) {
        self.stats.iterations += 1;
        self.stats.politeness_delays = self.politeness.delays();

        tracing::info!(
            "Number of URLs visited: {}, unvisited: {}",
            self.frontier.visited_len(),
            self.frontier.queued_len()
        );
        if tracing::enabled!(tracing::Level::DEBUG) {
            tracing::debug!("URLs visited: {:?}", self.frontier.visited_sorted());
        }

        if self.progress.receiver_count() > 0 {
            self.progress.send_replace(self.progress());
        }
    }

    /// Runs iterations until the frontier is empty or the stop signal is set
    pub async fn run(&mut self) -> CrawlReport {
        let started_at = Utc::now();
        tracing::info!(
            "Starting crawl: {} URLs queued, {} selection, politeness {:?}",
            self.frontier.queued_len(),
            self.frontier.policy_name(),
            self.politeness.interval()
        );

        let stopped = loop {
            match self.step().await {
                IterationOutcome::Done => {
                    tracing::info!("Frontier is empty, crawl complete");
                    break false;
                }
                IterationOutcome::Stopped => {
                    tracing::info!(
                        "Stop requested, ending crawl with {} URLs queued",
                        self.frontier.queued_len()
                    );
                    break true;
                }
                IterationOutcome::Crawled { .. } | IterationOutcome::Skipped { .. } => {}
            }
        };

        let report = CrawlReport {
            started_at,
            finished_at: Utc::now(),
            stats: self.stats,
            visited: self.frontier.visited_sorted(),
            remaining: self.frontier.queued_len(),
            stopped,
        };

        tracing::info!(
            "Crawl finished: {} crawled, {} skipped in {}s",
            report.stats.pages_crawled,
            report.stats.pages_skipped,
            report.duration_seconds()
        );

        report
    }
}
