//! Plain-text alignment
//!
//! Provides the text side of sentence alignment:
//! - Whitespace normalization with an offset map to the source text
//! - Forward-only sentence range location (with optional word-mark anchors)
//! - Merging of exact ranges supplied by the analysis service

mod locator;
mod normalize;

pub use locator::{locate, locate_with_hints, merge_upstream_ranges, CharRange, LocateReport};
pub use normalize::{normalize, NormalizedText};
