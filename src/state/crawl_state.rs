/// Crawl state definitions for the scheduler's control loop
///
/// This module defines every state a single crawl iteration passes through.
use std::fmt;

/// Represents where the scheduler is within the current iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlState {
    // ===== Iteration States =====
    /// Waiting to pull the next URL out of the frontier
    Selecting,

    /// Probing the selected URL to check that it serves HTML
    Probing,

    /// The probe said "not HTML" (or failed); the URL is being dropped
    Skipping,

    /// Retrieving the body of a URL that passed the probe
    Fetching,

    /// Pulling outbound links out of the fetched document
    Extracting,

    /// Marking the URL visited and offering discovered links to the frontier
    Updating,

    // ===== Terminal State =====
    /// The frontier ran dry; the crawl is over
    Done,
}

impl CrawlState {
    /// Returns true if no further iterations will run
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns true if `next` is a legal successor of this state
    ///
    /// ```text
    /// SELECTING -> PROBING -> (SKIPPING | FETCHING) -> EXTRACTING -> UPDATING -> SELECTING
    /// SELECTING -> DONE
    /// SKIPPING  -> SELECTING
    /// ```
    pub fn can_transition_to(&self, next: CrawlState) -> bool {
        matches!(
            (self, next),
            (Self::Selecting, Self::Probing)
                | (Self::Selecting, Self::Done)
                | (Self::Probing, Self::Skipping)
                | (Self::Probing, Self::Fetching)
                | (Self::Skipping, Self::Selecting)
                | (Self::Fetching, Self::Extracting)
                | (Self::Extracting, Self::Updating)
                | (Self::Updating, Self::Selecting)
        )
    }

    /// Lowercase label used in log output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Selecting => "selecting",
            Self::Probing => "probing",
            Self::Skipping => "skipping",
            Self::Fetching => "fetching",
            Self::Extracting => "extracting",
            Self::Updating => "updating",
            Self::Done => "done",
        }
    }

    /// Returns all possible crawl states
    pub fn all_states() -> Vec<Self> {
        vec![
            Self::Selecting,
            Self::Probing,
            Self::Skipping,
            Self::Fetching,
            Self::Extracting,
            Self::Updating,
            Self::Done,
        ]
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_terminal() {
        assert!(CrawlState::Done.is_terminal());

        assert!(!CrawlState::Selecting.is_terminal());
        assert!(!CrawlState::Probing.is_terminal());
        assert!(!CrawlState::Updating.is_terminal());
    }

    #[test]
    fn test_fetch_path_transitions() {
        let path = [
            CrawlState::Selecting,
            CrawlState::Probing,
            CrawlState::Fetching,
            CrawlState::Extracting,
            CrawlState::Updating,
            CrawlState::Selecting,
        ];
        for pair in path.windows(2) {
            assert!(
                pair[0].can_transition_to(pair[1]),
                "{} -> {} should be legal",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_skip_path_transitions() {
        assert!(CrawlState::Probing.can_transition_to(CrawlState::Skipping));
        assert!(CrawlState::Skipping.can_transition_to(CrawlState::Selecting));
        assert!(!CrawlState::Skipping.can_transition_to(CrawlState::Updating));
    }

    #[test]
    fn test_done_only_from_selecting() {
        for state in CrawlState::all_states() {
            let legal = state.can_transition_to(CrawlState::Done);
            assert_eq!(legal, state == CrawlState::Selecting, "{}", state);
        }
    }

    #[test]
    fn test_done_has_no_successors() {
        for state in CrawlState::all_states() {
            assert!(!CrawlState::Done.can_transition_to(state));
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", CrawlState::Selecting), "selecting");
        assert_eq!(format!("{}", CrawlState::Done), "done");
    }
}
