//! Document rendering pipeline
//!
//! Turns raw markup, sentences and the current selection into the HTML the
//! reader displays:
//!
//! ```text
//! raw html -> sanitize -> flatten -> normalize -> locate (+ hints, + upstream ranges)
//!                                                     |
//! topics + selection -> project ----------------------+-> annotate -> html
//! ```
//!
//! Rendering never fails. When the markup cannot be processed or too few
//! sentences can be aligned with it, each sentence is rendered on its own
//! instead, which needs no alignment at all.

use std::collections::BTreeSet;

use html_escape::{encode_double_quoted_attribute, encode_text};
use serde::{Deserialize, Serialize};

use crate::html::{
    annotate, flatten_text, marker_open, sanitize_html, AnnotateOptions, HtmlError, SentenceMark,
};
use crate::text::{locate_with_hints, merge_upstream_ranges, normalize, CharRange};
use crate::topics::{project, HighlightProjection, SelectionState, Topic};

/// Everything the analysis service supplies for one document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInput {
    /// Position of the document among the analyzed documents
    #[serde(default)]
    pub document_index: usize,
    /// Pre-segmented sentences; sentence `i` has index `i + 1`
    pub sentences: Vec<String>,
    /// Untrusted source markup
    pub raw_html: String,
    #[serde(default)]
    pub topics: Vec<Topic>,
    /// Word index at which each sentence starts, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_marks: Option<Vec<usize>>,
}

/// Rendering options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOptions {
    /// CSS class prefix for markers and anchor ids
    pub class_prefix: String,
    /// Minimum fraction of sentences that must align before the markup is used
    pub min_coverage: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            class_prefix: "sl".to_string(),
            min_coverage: 0.5,
        }
    }
}

/// How a document ended up being rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Sanitized source markup with sentence markers
    Aligned,
    /// One marker per sentence, no source markup
    Fallback,
}

/// Rendered output for one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedDocument {
    pub html: String,
    pub mode: RenderMode,
    /// Number of sentences with a range in the markup
    pub located: usize,
    pub sentence_count: usize,
    /// 0-based positions of highlighted sentences
    pub highlighted: BTreeSet<usize>,
    /// 0-based positions of faded sentences
    pub faded: BTreeSet<usize>,
}

/// Render a document for the current selection
pub fn render_document(
    input: &DocumentInput,
    selection: &SelectionState,
    options: &RenderOptions,
) -> RenderedDocument {
    let projection = project(&input.topics, selection);

    match render_aligned(input, &projection, options) {
        Ok(Some(document)) => document,
        Ok(None) => render_fallback(input, projection, options),
        Err(e) => {
            tracing::warn!(
                document_index = input.document_index,
                "Falling back to per-sentence rendering: {}",
                e
            );
            render_fallback(input, projection, options)
        }
    }
}

/// Sanitized, flattened text and the sentence ranges located in it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment {
    pub sanitized: String,
    /// Length of the flattened text in chars
    pub text_length: usize,
    pub ranges: Vec<CharRange>,
    /// 1-based indices of sentences without a range
    pub unmatched: Vec<usize>,
}

/// Sanitize the markup and align the document's sentences with it
pub fn align(input: &DocumentInput) -> Result<Alignment, HtmlError> {
    let sanitized = sanitize_html(&input.raw_html)?;
    let flattened = flatten_text(&sanitized)?;
    let text_length = flattened.chars().count();

    let report = locate_with_hints(
        &normalize(&flattened),
        &input.sentences,
        input.word_marks.as_deref(),
    );
    let upstream: Vec<CharRange> = input.topics.iter().flat_map(Topic::upstream_ranges).collect();
    let ranges = merge_upstream_ranges(report.ranges, &upstream, text_length);

    let located: BTreeSet<usize> = ranges.iter().map(|r| r.sentence_index).collect();
    let unmatched = (1..=input.sentences.len())
        .filter(|index| !located.contains(index))
        .collect();

    Ok(Alignment {
        sanitized,
        text_length,
        ranges,
        unmatched,
    })
}

fn render_aligned(
    input: &DocumentInput,
    projection: &HighlightProjection,
    options: &RenderOptions,
) -> Result<Option<RenderedDocument>, HtmlError> {
    let alignment = align(input)?;

    let sentence_count = input.sentences.len();
    if sentence_count > 0 {
        let coverage = alignment.ranges.len() as f64 / sentence_count as f64;
        if coverage < options.min_coverage {
            tracing::debug!(
                document_index = input.document_index,
                located = alignment.ranges.len(),
                sentence_count,
                "Alignment coverage too low"
            );
            return Ok(None);
        }
    }

    let marks: Vec<SentenceMark> = alignment
        .ranges
        .iter()
        .map(|range| SentenceMark {
            range: *range,
            state: projection.state_of(range.sentence_index),
        })
        .collect();
    let annotated = annotate(
        &alignment.sanitized,
        &marks,
        &AnnotateOptions {
            class_prefix: options.class_prefix.clone(),
            document_index: input.document_index,
        },
    )?;

    Ok(Some(RenderedDocument {
        html: annotated.html,
        mode: RenderMode::Aligned,
        located: alignment.ranges.len(),
        sentence_count,
        highlighted: projection.highlighted.clone(),
        faded: projection.faded.clone(),
    }))
}

/// Render each sentence as its own marker, ignoring the source markup
pub fn render_fallback(
    input: &DocumentInput,
    projection: HighlightProjection,
    options: &RenderOptions,
) -> RenderedDocument {
    let marker_options = AnnotateOptions {
        class_prefix: options.class_prefix.clone(),
        document_index: input.document_index,
    };

    let mut html = format!(
        "<div class=\"{}-fallback\">\n",
        encode_double_quoted_attribute(&options.class_prefix)
    );
    for (position, sentence) in input.sentences.iter().enumerate() {
        let sentence_index = position + 1;
        html.push_str(&marker_open(
            sentence_index,
            projection.state_of(sentence_index),
            true,
            &marker_options,
        ));
        html.push_str(&encode_text(sentence));
        html.push_str("</span>\n");
    }
    html.push_str("</div>");

    RenderedDocument {
        html,
        mode: RenderMode::Fallback,
        located: 0,
        sentence_count: input.sentences.len(),
        highlighted: projection.highlighted,
        faded: projection.faded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(raw_html: &str, sentences: &[&str]) -> DocumentInput {
        DocumentInput {
            raw_html: raw_html.to_string(),
            sentences: sentences.iter().map(|s| s.to_string()).collect(),
            ..DocumentInput::default()
        }
    }

    #[test]
    fn test_aligned_render_marks_every_sentence() {
        let input = document(
            "<p>First sentence. <b>Second sentence.</b></p>",
            &["First sentence.", "Second sentence."],
        );
        let rendered = render_document(&input, &SelectionState::default(), &RenderOptions::default());

        assert_eq!(rendered.mode, RenderMode::Aligned);
        assert_eq!(rendered.located, 2);
        assert!(rendered.html.contains("id=\"sl-0-1\""));
        assert!(rendered.html.contains("<b><span"));
        assert!(rendered.html.ends_with("</span></b></p>"));
    }

    #[test]
    fn test_selection_is_reflected_in_classes() {
        let mut input = document("<p>One. Two.</p>", &["One.", "Two."]);
        input.topics = vec![Topic::new("A", [2])];
        let selection = SelectionState {
            selected: vec!["A".to_string()],
            ..SelectionState::default()
        };
        let rendered = render_document(&input, &selection, &RenderOptions::default());

        assert_eq!(rendered.highlighted, BTreeSet::from([1]));
        assert!(rendered
            .html
            .contains("class=\"sl-sentence sl-highlighted\" data-sentence=\"2\""));
        assert!(rendered
            .html
            .contains("class=\"sl-sentence sl-neutral\" data-sentence=\"1\""));
    }

    #[test]
    fn test_low_coverage_falls_back() {
        let input = document(
            "<p>Nothing matches here.</p>",
            &["Completely different.", "Also <different>."],
        );
        let rendered = render_document(&input, &SelectionState::default(), &RenderOptions::default());

        assert_eq!(rendered.mode, RenderMode::Fallback);
        assert!(rendered.html.starts_with("<div class=\"sl-fallback\">"));
        assert!(rendered.html.contains("Also &lt;different&gt;."));
        assert!(rendered.html.contains("id=\"sl-0-2\""));
        assert!(!rendered.html.contains("Nothing matches"));
    }

    #[test]
    fn test_partial_alignment_above_threshold_is_kept() {
        let input = document(
            "<p>Kept one. Kept two. Kept three.</p>",
            &["Kept one.", "Paraphrased.", "Kept three."],
        );
        let rendered = render_document(&input, &SelectionState::default(), &RenderOptions::default());

        assert_eq!(rendered.mode, RenderMode::Aligned);
        assert_eq!(rendered.located, 2);
        assert_eq!(rendered.sentence_count, 3);
        assert!(!rendered.html.contains("data-sentence=\"2\""));
    }

    #[test]
    fn test_scripts_never_reach_output() {
        let input = document(
            "<p>Safe text.</p><script>alert(1)</script><p onclick=\"x()\">More.</p>",
            &["Safe text.", "More."],
        );
        let rendered = render_document(&input, &SelectionState::default(), &RenderOptions::default());

        assert!(!rendered.html.contains("script"));
        assert!(!rendered.html.contains("onclick"));
        assert_eq!(rendered.located, 2);
    }

    #[test]
    fn test_upstream_ranges_preferred() {
        // "Hi." appears twice; the topic pins sentence 1 to the second one
        let mut input = document("<p>Hi. Hi.</p>", &["Hi."]);
        input.topics = vec![Topic::new("A", [1]).with_ranges(1, vec![[4, 7]])];
        let alignment = align(&input).unwrap();

        assert_eq!(alignment.ranges, vec![CharRange::new(1, 4, 7)]);
        assert!(alignment.unmatched.is_empty());
    }

    #[test]
    fn test_no_sentences_renders_sanitized_markup() {
        let input = document("<p title=\"t\" style=\"x\">Text</p>", &[]);
        let rendered = render_document(&input, &SelectionState::default(), &RenderOptions::default());

        assert_eq!(rendered.mode, RenderMode::Aligned);
        assert_eq!(rendered.html, "<p title=\"t\">Text</p>");
    }
}
