//! Document API endpoints
//!
//! Thin JSON wrappers around the sanitize / locate / project / render core.
//! All work is synchronous and bounded by document size.

use std::collections::BTreeSet;

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::html::sanitize_html;
use crate::render::{align, DocumentInput, RenderedDocument};
use crate::state::AppState;
use crate::text::CharRange;
use crate::topics::{project, SelectionState, Topic};

/// Create the documents router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sanitize", post(sanitize))
        .route("/locate", post(locate))
        .route("/project", post(project_selection))
        .route("/render", post(render))
}

#[derive(Debug, Deserialize)]
pub struct SanitizeRequest {
    pub html: String,
}

#[derive(Debug, Serialize)]
pub struct SanitizeResponse {
    pub html: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocateRequest {
    pub html: String,
    pub sentences: Vec<String>,
    #[serde(default)]
    pub word_marks: Option<Vec<usize>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocateResponse {
    pub ranges: Vec<CharRange>,
    pub unmatched: Vec<usize>,
    pub text_length: usize,
}

#[derive(Debug, Deserialize)]
pub struct ProjectRequest {
    #[serde(default)]
    pub topics: Vec<Topic>,
    #[serde(default)]
    pub selection: SelectionState,
}

#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub highlighted: BTreeSet<usize>,
    pub faded: BTreeSet<usize>,
}

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    pub document: DocumentInput,
    #[serde(default)]
    pub selection: SelectionState,
}

/// Sanitize untrusted markup
async fn sanitize(
    State(state): State<AppState>,
    Json(req): Json<SanitizeRequest>,
) -> Result<Json<SanitizeResponse>> {
    check_size(&state, &req.html)?;
    let html = sanitize_html(&req.html)?;
    Ok(Json(SanitizeResponse { html }))
}

/// Locate sentences in the sanitized markup's text
async fn locate(
    State(state): State<AppState>,
    Json(req): Json<LocateRequest>,
) -> Result<Json<LocateResponse>> {
    check_size(&state, &req.html)?;
    let input = DocumentInput {
        raw_html: req.html,
        sentences: req.sentences,
        word_marks: req.word_marks,
        ..DocumentInput::default()
    };
    let alignment = align(&input)?;
    Ok(Json(LocateResponse {
        ranges: alignment.ranges,
        unmatched: alignment.unmatched,
        text_length: alignment.text_length,
    }))
}

/// Project a selection onto sentence indices
async fn project_selection(Json(req): Json<ProjectRequest>) -> Json<ProjectResponse> {
    let projection = project(&req.topics, &req.selection);
    Json(ProjectResponse {
        highlighted: projection.highlighted,
        faded: projection.faded,
    })
}

/// Render a document for the current selection
async fn render(
    State(state): State<AppState>,
    Json(req): Json<RenderRequest>,
) -> Result<Json<RenderedDocument>> {
    check_size(&state, &req.document.raw_html)?;
    if let Some(marks) = &req.document.word_marks {
        if marks.len() != req.document.sentences.len() {
            return Err(AppError::BadRequest(format!(
                "wordMarks has {} entries for {} sentences",
                marks.len(),
                req.document.sentences.len()
            )));
        }
    }

    let rendered = state.render_cache().get_or_render(
        &req.document,
        &req.selection,
        state.render_options(),
    );
    Ok(Json(RenderedDocument::clone(&rendered)))
}

fn check_size(state: &AppState, html: &str) -> Result<()> {
    let limit = state.config().server.max_html_bytes;
    if html.len() > limit {
        return Err(AppError::PayloadTooLarge(format!(
            "markup is {} bytes, limit is {}",
            html.len(),
            limit
        )));
    }
    Ok(())
}
