//! Sentence marker injection
//!
//! Wraps located sentence ranges of a sanitized document in marker spans.
//! Ranges are expressed in the flattened text of the sanitized markup (see
//! [`flatten_text`](super::flatten_text)); only the text nodes they overlap
//! are rewritten, every element and attribute around them is left alone.
//!
//! A sentence that crosses element boundaries gets one marker per text node
//! it touches. Only the first of those carries the scroll anchor `id`.

use std::collections::HashSet;
use std::fmt::Write;

use html_escape::{encode_double_quoted_attribute, encode_text};

use super::walk::rewrite_text_nodes;
use super::HtmlError;
use crate::text::CharRange;
use crate::topics::HighlightState;

/// Configuration for marker injection
#[derive(Debug, Clone)]
pub struct AnnotateOptions {
    /// CSS class prefix for markers and anchor ids
    pub class_prefix: String,
    /// Document index used in anchor ids
    pub document_index: usize,
}

impl Default for AnnotateOptions {
    fn default() -> Self {
        Self {
            class_prefix: "sl".to_string(),
            document_index: 0,
        }
    }
}

/// A located sentence and how it should be displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentenceMark {
    pub range: CharRange,
    pub state: HighlightState,
}

/// Result of marker injection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedHtml {
    /// The markup with marker spans
    pub html: String,
    /// Number of marker spans emitted
    pub markers: usize,
    /// Marks that extended past the end of the text and were cut short
    pub clipped: usize,
}

/// Wrap each mark's text in marker spans
pub fn annotate(
    sanitized: &str,
    marks: &[SentenceMark],
    options: &AnnotateOptions,
) -> Result<AnnotatedHtml, HtmlError> {
    let mut plan: Vec<&SentenceMark> = marks.iter().filter(|m| !m.range.is_empty()).collect();
    if plan.is_empty() {
        return Ok(AnnotatedHtml {
            html: sanitized.to_string(),
            markers: 0,
            clipped: 0,
        });
    }
    plan.sort_by_key(|m| (m.range.start, m.range.sentence_index));

    let mut offset = 0usize;
    let mut next = 0usize;
    let mut markers = 0usize;
    let mut anchored: HashSet<usize> = HashSet::new();

    let html = rewrite_text_nodes(sanitized, |text| {
        let node_start = offset;
        let bounds: Vec<usize> = text
            .char_indices()
            .map(|(byte, _)| byte)
            .chain(std::iter::once(text.len()))
            .collect();
        let node_end = node_start + bounds.len() - 1;
        offset = node_end;

        while next < plan.len() && plan[next].range.end <= node_start {
            next += 1;
        }
        if next >= plan.len() || plan[next].range.start >= node_end {
            return None;
        }

        let at = |char_offset: usize| bounds[char_offset - node_start];
        let mut out = String::with_capacity(text.len() + 64);
        let mut pos = node_start;

        for mark in plan[next..].iter().take_while(|m| m.range.start < node_end) {
            let start = mark.range.start.max(pos);
            let end = mark.range.end.min(node_end);
            if start >= end {
                continue;
            }
            out.push_str(&encode_text(&text[at(pos)..at(start)]));
            let anchor = anchored.insert(mark.range.sentence_index);
            out.push_str(&marker_open(mark.range.sentence_index, mark.state, anchor, options));
            out.push_str(&encode_text(&text[at(start)..at(end)]));
            out.push_str("</span>");
            markers += 1;
            pos = end;
        }
        out.push_str(&encode_text(&text[at(pos)..at(node_end)]));
        Some(out)
    })?;

    let clipped = plan.iter().filter(|m| m.range.end > offset).count();
    if clipped > 0 {
        tracing::debug!(clipped, text_length = offset, "Clipped marks past end of text");
    }

    Ok(AnnotatedHtml {
        html,
        markers,
        clipped,
    })
}

/// Opening tag of a marker span
pub(crate) fn marker_open(
    sentence_index: usize,
    state: HighlightState,
    anchor: bool,
    options: &AnnotateOptions,
) -> String {
    let prefix = encode_double_quoted_attribute(&options.class_prefix);
    let mut tag = format!(
        "<span class=\"{prefix}-sentence {prefix}-{}\" data-sentence=\"{}\"",
        state.as_str(),
        sentence_index
    );
    if anchor {
        let _ = write!(
            tag,
            " id=\"{}\"",
            anchor_id(&prefix, options.document_index, sentence_index)
        );
    }
    tag.push('>');
    tag
}

/// Stable anchor id for the first marker of a sentence
pub fn anchor_id(prefix: &str, document_index: usize, sentence_index: usize) -> String {
    format!("{}-{}-{}", prefix, document_index, sentence_index)
}
