//! Highlight state projection
//!
//! Derives which sentences are highlighted or faded from the current topic
//! selection. Recomputed on every selection change; nothing is cached.

use std::collections::{BTreeSet, HashSet};

use serde::Serialize;

use super::types::{HighlightState, SelectionState, Topic};

/// Per-sentence display state as two disjoint sets of 0-based positions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HighlightProjection {
    pub highlighted: BTreeSet<usize>,
    pub faded: BTreeSet<usize>,
}

impl HighlightProjection {
    /// State of the sentence with the given 1-based index
    pub fn state_of(&self, sentence_index: usize) -> HighlightState {
        let Some(position) = sentence_index.checked_sub(1) else {
            return HighlightState::Neutral;
        };
        if self.highlighted.contains(&position) {
            HighlightState::Highlighted
        } else if self.faded.contains(&position) {
            HighlightState::Faded
        } else {
            HighlightState::Neutral
        }
    }
}

/// Project the selection onto sentences
///
/// A sentence is highlighted when any selected or the hovered topic contains
/// it, otherwise faded when any read topic contains it.
pub fn project(topics: &[Topic], selection: &SelectionState) -> HighlightProjection {
    let active: HashSet<&str> = selection
        .selected
        .iter()
        .map(String::as_str)
        .chain(selection.hovered.as_deref())
        .collect();

    let mut projection = HighlightProjection::default();
    for topic in topics {
        let is_active = active.contains(topic.name.as_str());
        let is_read = selection.read.contains(&topic.name);
        if !is_active && !is_read {
            continue;
        }

        for &sentence_index in &topic.sentences {
            let Some(position) = sentence_index.checked_sub(1) else {
                tracing::debug!(topic = %topic.name, "Ignoring sentence index 0");
                continue;
            };
            if is_active {
                projection.highlighted.insert(position);
            } else {
                projection.faded.insert(position);
            }
        }
    }

    let highlighted = &projection.highlighted;
    projection.faded.retain(|position| !highlighted.contains(position));
    projection
}
