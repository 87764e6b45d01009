//! URL handling module for Program-Scout
//!
//! This module provides URL normalization (the crawl's identity policy) and the
//! homepage scope that every crawled URL must fall under.
//!
//! # Identity policy
//!
//! Two URLs are the same crawl target when their normalized strings are equal:
//! - fragments are removed
//! - the host is lowercased (the `url` crate does this while parsing)
//! - trailing slashes are significant: `/majors` and `/majors/` are distinct
//! - query strings are significant and kept verbatim

mod normalize;
mod scope;

// Re-export main functions
pub use normalize::{normalize_url, strip_fragment};
pub use scope::{relative_path, HomepageScope};
