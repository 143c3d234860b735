//! Sentence Lens
//!
//! Re-renders untrusted document markup so that every analyzed sentence
//! becomes an addressable, independently styleable unit, without letting
//! the markup execute anything.
//!
//! # Modules
//!
//! - `text`: whitespace normalization and sentence range location
//! - `html`: sanitization, text flattening and sentence marker injection
//! - `topics`: topic/selection types and highlight state projection
//! - `render`: the full pipeline with per-sentence fallback
//! - `cache`: input-hash keyed cache of rendered documents
//!
//! The HTTP surface (`routes`, `state`, `config`, `error`) is used by the
//! `sentence-lens-server` binary.

pub mod cache;
pub mod config;
pub mod error;
pub mod html;
pub mod render;
pub mod routes;
pub mod state;
pub mod text;
pub mod topics;

pub use render::{render_document, DocumentInput, RenderMode, RenderOptions, RenderedDocument};
pub use topics::{HighlightState, SelectionState, Topic};
