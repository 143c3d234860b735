//! Whitespace normalization with an offset map back to the source text
//!
//! Sentences handed to us by the analysis service rarely match the markup
//! byte-for-byte: line breaks, indentation and non-breaking spaces all differ.
//! Both sides are collapsed the same way before matching, and the index map
//! lets a match in normalized text be reported in original coordinates.
//!
//! All offsets are counted in `char`s, not bytes.

/// Text with whitespace runs collapsed to a single space
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedText {
    /// Collapsed text, never starting or ending with a space
    pub text: String,
    /// `index_map[i]` is the original char offset of the i-th char of `text`
    pub index_map: Vec<usize>,
}

/// Start of a word inside normalized text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct WordStart {
    /// Char offset into the normalized text
    pub offset: usize,
    /// Byte offset into the normalized text
    pub byte: usize,
}

/// Collapse whitespace runs, keeping a map to original char offsets
///
/// A whitespace run becomes one space tied to the run's first character.
/// Leading and trailing whitespace is dropped, so whitespace-only input
/// normalizes to an empty string.
pub fn normalize(input: &str) -> NormalizedText {
    let mut text = String::with_capacity(input.len());
    let mut index_map = Vec::with_capacity(input.len());
    let mut previous_was_whitespace = false;

    for (offset, c) in input.chars().enumerate() {
        if c.is_whitespace() {
            if !previous_was_whitespace && !text.is_empty() {
                text.push(' ');
                index_map.push(offset);
            }
            previous_was_whitespace = true;
        } else {
            text.push(c);
            index_map.push(offset);
            previous_was_whitespace = false;
        }
    }

    if text.ends_with(' ') {
        text.pop();
        index_map.pop();
    }

    NormalizedText { text, index_map }
}

impl NormalizedText {
    /// Length in chars
    pub fn len(&self) -> usize {
        self.index_map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index_map.is_empty()
    }

    /// Map a half-open normalized char span back to the original text
    ///
    /// Returns `None` for empty or out-of-bounds spans.
    pub fn original_span(&self, start: usize, end: usize) -> Option<(usize, usize)> {
        if start >= end || end > self.index_map.len() {
            return None;
        }
        Some((self.index_map[start], self.index_map[end - 1] + 1))
    }

    /// Char offsets at which each word begins
    pub fn word_starts(&self) -> Vec<usize> {
        self.word_boundaries().into_iter().map(|w| w.offset).collect()
    }

    pub(crate) fn word_boundaries(&self) -> Vec<WordStart> {
        let mut starts = Vec::new();
        let mut at_word_start = true;
        for (offset, (byte, c)) in self.text.char_indices().enumerate() {
            if c == ' ' {
                at_word_start = true;
            } else if at_word_start {
                starts.push(WordStart { offset, byte });
                at_word_start = false;
            }
        }
        starts
    }
}
