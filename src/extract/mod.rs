//! Per-page extraction
//!
//! Turns a crawled page into a program title and turns its relative path into
//! a URL pattern. Title extraction may call out to a text-inference service;
//! pattern generalization is a pure string transformation.

mod inference;
mod openai;
mod pattern;
mod title;

pub use inference::{
    excerpt, parse_inference_reply, Inference, InferenceClient, InferenceRequest, NONE_SENTINEL,
    SYSTEM_INSTRUCTION,
};
pub use openai::OpenAiClient;
pub use pattern::generalize;
pub use title::{visible_text, ExtractedTitle, TitleExtractor, TitleSource};
