/// Phase definitions for the per-site crawl loop
///
/// Each site moves through `Fetching → Extracting → Resolving` once per page
/// and ends in `Done`.
use std::fmt;

/// Represents where a site's crawl loop currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// A page request is in flight
    Fetching,

    /// Records are being pulled out of the fetched page
    Extracting,

    /// The next-page link is being looked up
    Resolving,

    /// No further page will be fetched for this site
    Done,
}

impl CrawlPhase {
    /// Returns true if this is the terminal phase
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Checks whether moving from this phase to `next` is allowed
    ///
    /// A failed fetch goes straight to `Done`; otherwise the loop always
    /// passes through extraction and resolution before fetching again.
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        matches!(
            (self, next),
            (Self::Fetching, Self::Extracting)
                | (Self::Fetching, Self::Done)
                | (Self::Extracting, Self::Resolving)
                | (Self::Resolving, Self::Fetching)
                | (Self::Resolving, Self::Done)
        )
    }

    /// Short lowercase name, used in log output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fetching => "fetching",
            Self::Extracting => "extracting",
            Self::Resolving => "resolving",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_cycle() {
        assert!(CrawlPhase::Fetching.can_transition_to(CrawlPhase::Extracting));
        assert!(CrawlPhase::Extracting.can_transition_to(CrawlPhase::Resolving));
        assert!(CrawlPhase::Resolving.can_transition_to(CrawlPhase::Fetching));
        assert!(CrawlPhase::Resolving.can_transition_to(CrawlPhase::Done));
    }

    #[test]
    fn test_fetch_failure_ends_crawl() {
        assert!(CrawlPhase::Fetching.can_transition_to(CrawlPhase::Done));
    }

    #[test]
    fn test_invalid_transitions() {
        assert!(!CrawlPhase::Fetching.can_transition_to(CrawlPhase::Resolving));
        assert!(!CrawlPhase::Extracting.can_transition_to(CrawlPhase::Done));
        assert!(!CrawlPhase::Extracting.can_transition_to(CrawlPhase::Fetching));
        assert!(!CrawlPhase::Done.can_transition_to(CrawlPhase::Fetching));
    }

    #[test]
    fn test_terminal() {
        assert!(CrawlPhase::Done.is_terminal());
        assert!(!CrawlPhase::Fetching.is_terminal());
        assert!(!CrawlPhase::Resolving.is_terminal());
    }

    #[test]
    fn test_display() {
        assert_eq!(CrawlPhase::Extracting.to_string(), "extracting");
    }
}
