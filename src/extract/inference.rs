//! Inference fallback contract
//!
//! When markup gives no usable title, the page text and the user's criteria
//! are handed to a text-inference service. The service is reached through the
//! `InferenceClient` trait so the pipeline can run with a real provider, a fake,
//! or nothing at all.

use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;

/// Reply the service is told to give when the page lists no matching program
pub const NONE_SENTINEL: &str = "NONE";

/// System instruction sent with every request
pub const SYSTEM_INSTRUCTION: &str = "You read the text of a single page from a university or \
college website and identify the academic programs it describes. Reply with one program name \
per line and nothing else. If the page describes no program matching the criteria, reply with \
exactly NONE.";

/// Outcome of one inference call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inference {
    /// One or more program names
    Programs(Vec<String>),
    /// The service answered that nothing matched
    None,
    /// The call failed or the reply was unusable
    Error(String),
}

/// Prompt material for one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceRequest {
    /// System instruction
    pub system: String,
    /// User message with the criteria and the page excerpt
    pub user: String,
}

impl InferenceRequest {
    /// Builds the request for a page
    ///
    /// # Arguments
    ///
    /// * `criteria` - The user's relevance criteria
    /// * `page_text` - Visible text of the page
    /// * `excerpt_chars` - Maximum number of characters of `page_text` to send
    pub fn for_page(criteria: &str, page_text: &str, excerpt_chars: usize) -> Self {
        let user = format!(
            "Criteria: {}\n\nList the names of the academic programs on this page that match \
             the criteria, one per line. Reply {} if there are none.\n\nPage text:\n{}",
            criteria.trim(),
            NONE_SENTINEL,
            excerpt(page_text, excerpt_chars)
        );

        Self {
            system: SYSTEM_INSTRUCTION.to_string(),
            user,
        }
    }
}

/// A text-inference service
#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Sends one request; failures come back as `Inference::Error`
    async fn infer(&self, request: &InferenceRequest) -> Inference;
}

/// Returns at most `max_chars` characters from the start of `text`
pub fn excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

/// Turns a raw newline-delimited reply into an `Inference`
///
/// List bullets and numbering are stripped, blank lines and duplicates are
/// dropped, and a reply that is empty or only the `NONE` sentinel
/// (case-insensitive) becomes `Inference::None`.
///
/// # Example
///
/// ```
/// use program_scout::extract::{parse_inference_reply, Inference};
///
/// let reply = "1. Biology (B.S.)\n2. Chemistry (B.A.)";
/// assert_eq!(
///     parse_inference_reply(reply),
///     Inference::Programs(vec!["Biology (B.S.)".into(), "Chemistry (B.A.)".into()])
/// );
/// assert_eq!(parse_inference_reply("none"), Inference::None);
/// ```
pub fn parse_inference_reply(text: &str) -> Inference {
    static LIST_MARKER: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^\s*(?:[-*•]+|\(?\d+[.)])\s*").expect("valid regex")
    });

    let mut programs: Vec<String> = Vec::new();
    for line in text.lines() {
        let name = LIST_MARKER.replace(line, "");
        let name = name.trim().trim_matches('"').trim();
        if name.is_empty() || is_none_sentinel(name) {
            continue;
        }
        if !programs.iter().any(|p| p == name) {
            programs.push(name.to_string());
        }
    }

    if programs.is_empty() {
        Inference::None
    } else {
        Inference::Programs(programs)
    }
}

fn is_none_sentinel(line: &str) -> bool {
    line.trim_end_matches('.').eq_ignore_ascii_case(NONE_SENTINEL)
}
