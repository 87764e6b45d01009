//! Program title extraction
//!
//! Three steps are tried in order until one yields a title:
//! 1. Structured: configured CSS selectors, first non-empty match wins
//! 2. Heuristic: h1-h3 headings that mention a degree keyword
//! 3. Inference: the page's visible text is sent to an `InferenceClient`
//!
//! The first two steps run synchronously on the parsed document; the document
//! is dropped before the inference call is awaited.

use crate::config::{ExtractionConfig, KeywordConfig};
use crate::crawler::collapse_whitespace;
use crate::extract::inference::{Inference, InferenceClient, InferenceRequest};
use crate::{ConfigError, ConfigResult};
use scraper::{ElementRef, Html, Selector};
use std::sync::Arc;

/// Elements whose text is never visible
const HIDDEN_ELEMENTS: &[&str] = &["head", "script", "style", "noscript", "template"];

/// Which extraction step produced a title
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleSource {
    Selector,
    Heading,
    Inference,
}

/// Program name(s) found on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedTitle {
    /// One entry per program; selectors and headings always give exactly one
    pub programs: Vec<String>,
    pub source: TitleSource,
}

impl ExtractedTitle {
    fn single(title: String, source: TitleSource) -> Self {
        Self {
            programs: vec![title],
            source,
        }
    }
}

/// Result of the synchronous steps
enum LocalExtraction {
    Found(ExtractedTitle),
    NotFound { visible_text: String },
}

/// Extracts program titles from page markup
#[derive(Clone)]
pub struct TitleExtractor {
    selectors: Vec<String>,
    degree_keywords: Vec<String>,
    min_text_length: usize,
    excerpt_chars: usize,
    inference: Option<Arc<dyn InferenceClient>>,
}

impl TitleExtractor {
    /// Creates an extractor without an inference fallback
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidSelector` if a selector does not parse.
    pub fn new(extraction: &ExtractionConfig, keywords: &KeywordConfig) -> ConfigResult<Self> {
        for selector in &extraction.selectors {
            Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
                selector: selector.clone(),
                message: format!("{:?}", e),
            })?;
        }

        Ok(Self {
            selectors: extraction.selectors.clone(),
            degree_keywords: keywords
                .degree
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
            min_text_length: extraction.min_text_length,
            excerpt_chars: extraction.excerpt_chars,
            inference: None,
        })
    }

    /// Enables the inference fallback
    pub fn with_inference(mut self, client: Arc<dyn InferenceClient>) -> Self {
        self.inference = Some(client);
        self
    }

    /// Returns true if an inference client is configured
    pub fn has_inference(&self) -> bool {
        self.inference.is_some()
    }

    /// Extracts a title, falling back to inference when markup gives nothing
    ///
    /// Never fails: inference errors are logged and yield `None`.
    pub async fn extract_title(&self, markup: &str, criteria: &str) -> Option<ExtractedTitle> {
        let visible_text = match self.extract_local(markup) {
            LocalExtraction::Found(title) => return Some(title),
            LocalExtraction::NotFound { visible_text } => visible_text,
        };

        let client = self.inference.as_ref()?;

        let text_length = visible_text.chars().count();
        if text_length < self.min_text_length {
            tracing::debug!(
                "Skipping inference: {} visible characters (minimum {})",
                text_length,
                self.min_text_length
            );
            return None;
        }

        let request = InferenceRequest::for_page(criteria, &visible_text, self.excerpt_chars);
        match client.infer(&request).await {
            Inference::Programs(programs) => Some(ExtractedTitle {
                programs,
                source: TitleSource::Inference,
            }),
            Inference::None => None,
            Inference::Error(reason) => {
                tracing::warn!("Inference failed: {}", reason);
                None
            }
        }
    }

    /// Runs the selector and heading steps
    fn extract_local(&self, markup: &str) -> LocalExtraction {
        let document = Html::parse_document(markup);

        if let Some(title) = self.structured_title(&document) {
            return LocalExtraction::Found(ExtractedTitle::single(title, TitleSource::Selector));
        }
        if let Some(title) = self.heading_title(&document) {
            return LocalExtraction::Found(ExtractedTitle::single(title, TitleSource::Heading));
        }

        LocalExtraction::NotFound {
            visible_text: document_text(&document),
        }
    }

    fn structured_title(&self, document: &Html) -> Option<String> {
        self.selectors
            .iter()
            .filter_map(|s| Selector::parse(s).ok())
            .find_map(|selector| {
                document
                    .select(&selector)
                    .map(|element| collapse_whitespace(&element.text().collect::<String>()))
                    .find(|text| !text.is_empty())
            })
    }

    fn heading_title(&self, document: &Html) -> Option<String> {
        let selector = Selector::parse("h1, h2, h3").ok()?;
        let mut matches: Vec<String> = Vec::new();

        for element in document.select(&selector) {
            let text = collapse_whitespace(&element.text().collect::<String>());
            let lowered = text.to_lowercase();
            if self.degree_keywords.iter().any(|k| lowered.contains(k.as_str()))
                && !matches.contains(&text)
            {
                matches.push(text);
            }
        }

        if matches.is_empty() {
            None
        } else {
            Some(matches.join("; "))
        }
    }
}

/// Visible text of an HTML document with whitespace collapsed
///
/// Text inside `head`, `script`, `style`, `noscript` and `template` is skipped.
pub fn visible_text(markup: &str) -> String {
    document_text(&Html::parse_document(markup))
}

fn document_text(document: &Html) -> String {
    let mut out = String::new();
    collect_text(document.root_element(), &mut out);
    collapse_whitespace(&out)
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
            out.push(' ');
        } else if let Some(child_element) = ElementRef::wrap(child) {
            if !HIDDEN_ELEMENTS.contains(&child_element.value().name()) {
                collect_text(child_element, out);
            }
        }
    }
}
