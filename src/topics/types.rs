//! Topic and selection types
//!
//! Topics come from the analysis service; selection state comes from the
//! rendering layer on every call. Neither is stored here.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::text::CharRange;

/// An upstream grouping of sentences
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    /// Hierarchical, path-like name (e.g. `economy/trade`)
    pub name: String,
    /// 1-based sentence indices
    #[serde(default)]
    pub sentences: BTreeSet<usize>,
    /// Exact `[start, end)` ranges in flattened text, one per sentence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub char_ranges: Option<Vec<[usize; 2]>>,
    /// Index of the sentence the first entry of `char_ranges` belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_sentence: Option<usize>,
}

impl Topic {
    pub fn new(name: &str, sentences: impl IntoIterator<Item = usize>) -> Self {
        Self {
            name: name.to_string(),
            sentences: sentences.into_iter().collect(),
            char_ranges: None,
            start_sentence: None,
        }
    }

    /// Attach exact ranges starting at `start_sentence`
    pub fn with_ranges(mut self, start_sentence: usize, ranges: Vec<[usize; 2]>) -> Self {
        self.start_sentence = Some(start_sentence);
        self.char_ranges = Some(ranges);
        self
    }

    /// Exact ranges supplied for this topic, tagged with their sentence index
    pub fn upstream_ranges(&self) -> Vec<CharRange> {
        match (&self.char_ranges, self.start_sentence) {
            (Some(ranges), Some(first)) => ranges
                .iter()
                .enumerate()
                .map(|(k, [start, end])| CharRange::new(first + k, *start, *end))
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Current topic selection, owned by the rendering layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionState {
    /// Names of selected topics
    #[serde(default)]
    pub selected: Vec<String>,
    /// Name of the topic under the pointer, if any
    #[serde(default)]
    pub hovered: Option<String>,
    /// Names of topics the reader has marked as read
    #[serde(default)]
    pub read: BTreeSet<String>,
}

/// Display state of one sentence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightState {
    #[default]
    Neutral,
    Highlighted,
    Faded,
}

impl HighlightState {
    /// Class suffix used on marker spans
    pub fn as_str(&self) -> &'static str {
        match self {
            HighlightState::Neutral => "neutral",
            HighlightState::Highlighted => "highlighted",
            HighlightState::Faded => "faded",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_ranges() {
        let topic = Topic::new("a", [3, 4]).with_ranges(3, vec![[10, 20], [21, 30]]);
        assert_eq!(
            topic.upstream_ranges(),
            vec![CharRange::new(3, 10, 20), CharRange::new(4, 21, 30)]
        );
        assert!(Topic::new("b", [1]).upstream_ranges().is_empty());
    }

    #[test]
    fn test_topic_json_shape() {
        let topic: Topic = serde_json::from_str(
            r#"{"name":"A/B","sentences":[2,1],"charRanges":[[0,4]],"startSentence":1}"#,
        )
        .unwrap();
        assert_eq!(topic.sentences.iter().copied().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(topic.upstream_ranges(), vec![CharRange::new(1, 0, 4)]);
    }

    #[test]
    fn test_selection_defaults() {
        let selection: SelectionState = serde_json::from_str("{}").unwrap();
        assert_eq!(selection, SelectionState::default());
        assert_eq!(
            serde_json::to_string(&HighlightState::Faded).unwrap(),
            "\"faded\""
        );
    }
}
