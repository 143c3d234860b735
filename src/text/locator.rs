//! Sentence range location
//!
//! Aligns each pre-segmented sentence with a character range of the document
//! text. The search is forward-only: every match starts at or after the end
//! of the previous one, so the resulting ranges are ordered and never overlap.
//! Sentences that cannot be found (paraphrased upstream, stripped by the
//! sanitizer, ...) are reported as unmatched and simply get no range.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::normalize::{normalize, NormalizedText};

/// Half-open `[start, end)` char range tagged with a 1-based sentence index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharRange {
    pub sentence_index: usize,
    pub start: usize,
    pub end: usize,
}

impl CharRange {
    pub fn new(sentence_index: usize, start: usize, end: usize) -> Self {
        Self {
            sentence_index,
            start,
            end,
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Whether two ranges share at least one char
    pub fn overlaps(&self, other: &CharRange) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Outcome of locating a document's sentences
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocateReport {
    /// Located ranges, strictly increasing by sentence index and offset
    pub ranges: Vec<CharRange>,
    /// 1-based indices of sentences that could not be located
    pub unmatched: Vec<usize>,
}

impl LocateReport {
    /// Fraction of `sentence_count` sentences that received a range
    pub fn coverage(&self, sentence_count: usize) -> f64 {
        if sentence_count == 0 {
            return 1.0;
        }
        self.ranges.len() as f64 / sentence_count as f64
    }
}

/// Locate sentences by forward substring search
pub fn locate(document: &NormalizedText, sentences: &[String]) -> LocateReport {
    locate_with_hints(document, sentences, None)
}

/// Locate sentences, trying word-mark anchors before searching
///
/// `word_marks[i]`, when present, is the index of the word in `document` at
/// which sentence `i` is expected to begin. An anchor is only taken when the
/// normalized sentence actually starts there and the anchor is not behind the
/// search cursor; otherwise the regular forward search runs.
pub fn locate_with_hints(
    document: &NormalizedText,
    sentences: &[String],
    word_marks: Option<&[usize]>,
) -> LocateReport {
    let haystack = document.text.as_str();
    let words = match word_marks {
        Some(_) => document.word_boundaries(),
        None => Vec::new(),
    };

    let mut report = LocateReport::default();
    let mut cursor_byte = 0;
    let mut cursor_char = 0;

    for (position, sentence) in sentences.iter().enumerate() {
        let sentence_index = position + 1;
        let needle = normalize(sentence).text;
        if needle.is_empty() {
            tracing::debug!(sentence_index, "Sentence is empty after normalization");
            report.unmatched.push(sentence_index);
            continue;
        }

        let anchored = word_marks
            .and_then(|marks| marks.get(position))
            .and_then(|&word| words.get(word))
            .filter(|w| w.byte >= cursor_byte && haystack[w.byte..].starts_with(&needle))
            .map(|w| (w.byte, w.offset));

        let found = anchored.or_else(|| {
            haystack[cursor_byte..].find(&needle).map(|relative| {
                let byte = cursor_byte + relative;
                let offset = cursor_char + haystack[cursor_byte..byte].chars().count();
                (byte, offset)
            })
        });

        let Some((byte, offset)) = found else {
            tracing::debug!(sentence_index, "Sentence not found in document text");
            report.unmatched.push(sentence_index);
            continue;
        };

        let needle_chars = needle.chars().count();
        match document.original_span(offset, offset + needle_chars) {
            Some((start, end)) => report
                .ranges
                .push(CharRange::new(sentence_index, start, end)),
            None => report.unmatched.push(sentence_index),
        }
        cursor_byte = byte + needle.len();
        cursor_char = offset + needle_chars;
    }

    report
}

/// Prefer exact ranges supplied upstream over located ones
///
/// Upstream ranges that are empty, point past `text_len`, or carry sentence
/// index 0 are ignored. An upstream range is only taken when it fits between
/// the ranges of the neighbouring sentences; otherwise the located range for
/// that sentence is kept as it is.
pub fn merge_upstream_ranges(
    located: Vec<CharRange>,
    upstream: &[CharRange],
    text_len: usize,
) -> Vec<CharRange> {
    if upstream.is_empty() {
        return located;
    }

    let mut by_sentence: BTreeMap<usize, CharRange> = located
        .into_iter()
        .map(|range| (range.sentence_index, range))
        .collect();

    for range in upstream {
        if range.sentence_index == 0 || range.is_empty() || range.end > text_len {
            tracing::debug!(?range, "Ignoring invalid upstream range");
            continue;
        }

        let previous_end = by_sentence
            .range(..range.sentence_index)
            .next_back()
            .map_or(0, |(_, previous)| previous.end);
        let next_start = by_sentence
            .range(range.sentence_index + 1..)
            .next()
            .map_or(usize::MAX, |(_, next)| next.start);
        if range.start < previous_end || range.end > next_start {
            tracing::debug!(?range, previous_end, next_start, "Ignoring out-of-order upstream range");
            continue;
        }

        by_sentence.insert(range.sentence_index, *range);
    }

    by_sentence.into_values().collect()
}
