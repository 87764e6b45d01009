/// Link state definitions for tracking crawl progress
///
/// A link is in exactly one of these states during a crawl.
use std::fmt;

/// Represents where a URL is in the crawl lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkState {
    /// Not yet discovered, or discovered and rejected
    Unseen,

    /// Queued and waiting to be popped
    Frontier,

    /// Popped and fetched (or attempted); never revisited
    Visited,
}

impl LinkState {
    /// Returns true if moving from `self` to `next` is a legal transition
    ///
    /// The only legal moves are `Unseen -> Frontier` and `Frontier -> Visited`.
    pub fn can_transition_to(&self, next: LinkState) -> bool {
        matches!(
            (self, next),
            (Self::Unseen, Self::Frontier) | (Self::Frontier, Self::Visited)
        )
    }

    /// Returns true if this is the terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Visited)
    }

    /// Short lowercase name, used in log output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unseen => "unseen",
            Self::Frontier => "frontier",
            Self::Visited => "visited",
        }
    }
}

impl fmt::Display for LinkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
