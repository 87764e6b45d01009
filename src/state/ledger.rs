//! Per-crawl link ledger
//!
//! The ledger is owned by the crawl coordinator and is the crawl's visited set:
//! it maps each normalized URL to its `LinkState` and remembers visit order.

use crate::state::LinkState;
use crate::ScoutError;
use std::collections::HashMap;
use url::Url;

/// Tracks the lifecycle state of every URL touched by one crawl
#[derive(Debug, Default)]
pub struct LinkLedger {
    states: HashMap<String, LinkState>,
    visit_order: Vec<Url>,
}

impl LinkLedger {
    /// Creates an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current state of `url` (`Unseen` if never recorded)
    pub fn state(&self, url: &Url) -> LinkState {
        self.states
            .get(url.as_str())
            .copied()
            .unwrap_or(LinkState::Unseen)
    }

    /// Returns true if `url` has already been visited
    pub fn is_visited(&self, url: &Url) -> bool {
        self.state(url) == LinkState::Visited
    }

    /// Moves `url` from `Unseen` to `Frontier`
    ///
    /// Returns `false` without changing anything when the URL is already
    /// queued or visited, so callers can enqueue unconditionally.
    pub fn enqueue(&mut self, url: &Url) -> bool {
        match self.state(url) {
            LinkState::Unseen => {
                self.states
                    .insert(url.as_str().to_string(), LinkState::Frontier);
                true
            }
            LinkState::Frontier | LinkState::Visited => false,
        }
    }

    /// Moves `url` from `Frontier` to `Visited`
    ///
    /// # Errors
    ///
    /// Returns `ScoutError::InvalidTransition` if the URL was not in the
    /// frontier, which includes a second visit of the same URL.
    pub fn visit(&mut self, url: &Url) -> Result<(), ScoutError> {
        let current = self.state(url);
        if !current.can_transition_to(LinkState::Visited) {
            return Err(ScoutError::InvalidTransition {
                url: url.to_string(),
                from: current,
                to: LinkState::Visited,
            });
        }

        self.states
            .insert(url.as_str().to_string(), LinkState::Visited);
        self.visit_order.push(url.clone());
        Ok(())
    }

    /// Marks the final URL of a redirect as visited without counting a visit
    ///
    /// Returns `false` when the URL was already visited.
    pub fn record_redirect(&mut self, url: &Url) -> bool {
        if self.is_visited(url) {
            return false;
        }
        self.states
            .insert(url.as_str().to_string(), LinkState::Visited);
        true
    }

    /// Visited URLs in the order they were visited
    pub fn visited(&self) -> &[Url] {
        &self.visit_order
    }

    /// Number of visited URLs
    pub fn visited_count(&self) -> usize {
        self.visit_order.len()
    }
}
