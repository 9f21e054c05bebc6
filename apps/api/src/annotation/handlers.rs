//! Axum route handlers for the Prompt annotation API.

use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::info;

use crate::annotation::annotator::{annotate, Annotation, PlaceholderValue};
use crate::catalog::placeholders::placeholders_from_record;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnnotateRequest {
    pub prompt: String,
    #[serde(default)]
    pub placeholders: Vec<PlaceholderValue>,
}

#[derive(Debug, Deserialize)]
pub struct SelectPromptRequest {
    pub prompt: String,
}

/// POST /api/v1/prompts/annotate
///
/// Annotates a prompt against caller-supplied placeholders. Never fails on content:
/// an empty prompt or empty placeholder list comes back unchanged.
pub async fn handle_annotate(Json(request): Json<AnnotateRequest>) -> Json<Annotation> {
    Json(annotate(&request.prompt, &request.placeholders))
}

/// POST /api/v1/prompts/select
///
/// Looks up the selected prompt's record in the catalog and annotates it with
/// the record's placeholders.
pub async fn handle_select_prompt(
    State(state): State<AppState>,
    Json(request): Json<SelectPromptRequest>,
) -> Result<Json<Annotation>, AppError> {
    if request.prompt.trim().is_empty() {
        return Err(AppError::Validation("prompt cannot be empty".to_string()));
    }

    let record = state.catalog.prompt_record(&request.prompt).await?;
    let placeholders = placeholders_from_record(&record);
    info!(
        placeholders = placeholders.len(),
        "annotating selected prompt"
    );

    Ok(Json(annotate(&request.prompt, &placeholders)))
}
