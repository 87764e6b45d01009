//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `LinkState`: where a URL is in its lifecycle (unseen, frontier, visited)
//! - `LinkLedger`: the per-crawl record of those states, including the visited set

mod ledger;
mod link_state;

// Re-export main types
pub use ledger::LinkLedger;
pub use link_state::LinkState;
