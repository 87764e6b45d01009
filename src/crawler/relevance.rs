//! Link relevance filter
//!
//! Classifies a discovered `(href, anchor text)` pair with two keyword lists.
//! Matching is a case-insensitive substring test against both strings, and a
//! deny hit always wins over an allow hit.

use crate::config::keywords::{DEFAULT_ALLOW_KEYWORDS, DEFAULT_DENY_KEYWORDS};
use crate::config::KeywordConfig;

/// Why a link was accepted or rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Relevance {
    /// An allow term matched and no deny term did
    Allowed(String),
    /// A deny term matched
    Denied(String),
    /// Neither list matched
    NoMatch,
}

impl Relevance {
    /// Returns true for `Allowed`
    pub fn is_relevant(&self) -> bool {
        matches!(self, Self::Allowed(_))
    }
}

/// Allow/deny keyword classifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelevanceFilter {
    allow: Vec<String>,
    deny: Vec<String>,
}

impl RelevanceFilter {
    /// Creates a filter from keyword lists; terms are lowercased
    pub fn new<S: AsRef<str>>(allow: &[S], deny: &[S]) -> Self {
        Self {
            allow: lowercase_all(allow),
            deny: lowercase_all(deny),
        }
    }

    /// Creates a filter from the `[keywords]` configuration
    pub fn from_config(config: &KeywordConfig) -> Self {
        Self::new(config.allow.as_slice(), config.deny.as_slice())
    }

    /// Classifies a link, reporting the term that decided it
    pub fn classify(&self, href: &str, anchor_text: &str) -> Relevance {
        let href = href.to_lowercase();
        let anchor_text = anchor_text.to_lowercase();
        let hits = |term: &str| href.contains(term) || anchor_text.contains(term);

        if let Some(term) = self.deny.iter().find(|t| hits(t.as_str())) {
            return Relevance::Denied(term.clone());
        }

        match self.allow.iter().find(|t| hits(t.as_str())) {
            Some(term) => Relevance::Allowed(term.clone()),
            None => Relevance::NoMatch,
        }
    }

    /// Returns true if the link should be followed
    pub fn is_relevant(&self, href: &str, anchor_text: &str) -> bool {
        self.classify(href, anchor_text).is_relevant()
    }
}

impl Default for RelevanceFilter {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOW_KEYWORDS, DEFAULT_DENY_KEYWORDS)
    }
}

fn lowercase_all<S: AsRef<str>>(terms: &[S]) -> Vec<String> {
    terms
        .iter()
        .map(|t| t.as_ref().trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}
