//! Topic selection
//!
//! Topic and selection types plus the projection of a selection onto
//! per-sentence highlight state.

mod projector;
mod types;

pub use projector::{project, HighlightProjection};
pub use types::{HighlightState, SelectionState, Topic};
