//! HTML parser for extracting links
//!
//! This module turns fetched markup into `LinkCandidate`s: absolute,
//! fragment-free, in-scope links paired with their anchor text.

use crate::url::{strip_fragment, HomepageScope};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

/// A link discovered on a page, before the relevance filter has seen it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkCandidate {
    /// Absolute target URL with the fragment removed
    pub href: Url,
    /// Visible anchor text with whitespace collapsed
    pub anchor_text: String,
    /// Page the link was found on
    pub source_page: Url,
}

/// Parses HTML content and extracts in-scope links
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` tags anywhere in the document
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` links and data URIs
/// - Fragment-only links (same page anchors)
/// - Anything that resolves to a non-HTTP(S) URL
/// - Anything outside the homepage scope
///
/// Duplicate targets keep the first occurrence and its anchor text. Results
/// are in document order. Malformed markup never errors; it yields whatever
/// anchors the parser recovers.
///
/// # Example
///
/// ```
/// use program_scout::crawler::extract_links;
/// use program_scout::url::HomepageScope;
/// use url::Url;
///
/// let html = r#"<a href="/majors/biology-bs">Biology Major</a>"#;
/// let base = Url::parse("https://example.edu/").unwrap();
/// let scope = HomepageScope::new("https://example.edu").unwrap();
/// let links = extract_links(&base, html, &scope);
/// assert_eq!(links[0].href.as_str(), "https://example.edu/majors/biology-bs");
/// assert_eq!(links[0].anchor_text, "Biology Major");
/// ```
pub fn extract_links(base_url: &Url, content: &str, scope: &HomepageScope) -> Vec<LinkCandidate> {
    let document = Html::parse_document(content);
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    let Ok(a_selector) = Selector::parse("a[href]") else {
        return links;
    };

    for element in document.select(&a_selector) {
        // Skip if it has the download attribute
        if element.value().attr("download").is_some() {
            continue;
        }

        let Some(href) = element.value().attr("href") else {
            continue;
        };

        let Some(absolute_url) = resolve_link(href, base_url) else {
            continue;
        };

        if !scope.contains(&absolute_url) {
            continue;
        }

        if !seen.insert(absolute_url.as_str().to_string()) {
            continue;
        }

        links.push(LinkCandidate {
            href: absolute_url,
            anchor_text: anchor_text(&element),
            source_page: base_url.clone(),
        });
    }

    links
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Fragment-only links
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if lowered.starts_with("javascript:")
        || lowered.starts_with("mailto:")
        || lowered.starts_with("tel:")
        || lowered.starts_with("data:")
    {
        return None;
    }

    if href.starts_with('#') {
        return None;
    }

    // Handles relative, root-relative and protocol-relative (`//host/path`) hrefs
    let absolute_url = base_url.join(href).ok()?;
    if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
        Some(strip_fragment(absolute_url))
    } else {
        None
    }
}

/// Visible text of an anchor, falling back to its `title` or `aria-label`
fn anchor_text(element: &ElementRef) -> String {
    let text = collapse_whitespace(&element.text().collect::<String>());
    if !text.is_empty() {
        return text;
    }

    element
        .value()
        .attr("title")
        .or_else(|| element.value().attr("aria-label"))
        .map(collapse_whitespace)
        .unwrap_or_default()
}

/// Collapses runs of whitespace into single spaces and trims the ends
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
