//! HTML processing module
//!
//! Provides markup handling for analyzed documents including:
//! - Allow-list sanitization of untrusted markup
//! - Text flattening (the coordinate space for sentence ranges)
//! - Sentence marker injection
//!
//! Uses lol_html for efficient streaming HTML processing.

mod annotator;
mod error;
mod sanitizer;
mod walk;

pub(crate) use annotator::marker_open;
pub use annotator::{anchor_id, annotate, AnnotateOptions, AnnotatedHtml, SentenceMark};
pub use error::HtmlError;
pub use sanitizer::{
    is_blocked_url, sanitize_html, ALLOWED_ATTRIBUTES, BLOCKED_URL_SCHEMES, REMOVED_ELEMENTS,
};
pub use walk::flatten_text;
