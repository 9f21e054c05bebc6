//! Axum route handlers for the Chat API.

use axum::{extract::State, http::HeaderMap, Json};
use serde::Deserialize;

use crate::chat::orchestrator::{ChatExchange, ChatOrchestrator};
use crate::errors::AppError;
use crate::state::AppState;

/// Inbound headers relayed to the backend so it sees the caller's session.
const FORWARDED_HEADERS: &[&str] = &["cookie", "authorization"];

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Editor content; may still contain highlight markup.
    pub prompt: String,
}

/// POST /api/v1/chat
pub async fn handle_chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatExchange>, AppError> {
    if request.prompt.trim().is_empty() {
        return Err(AppError::Validation(
            "Please select a prompt to proceed".to_string(),
        ));
    }

    let orchestrator =
        ChatOrchestrator::new(state.chat_transport.clone(), &state.config.backend_base_url)
            .with_session(forwarded_session(&headers));

    let exchange = orchestrator.send(&request.prompt).await?;
    Ok(Json(exchange))
}

fn forwarded_session(headers: &HeaderMap) -> Vec<(String, String)> {
    FORWARDED_HEADERS
        .iter()
        .filter_map(|name| {
            headers
                .get(*name)
                .and_then(|v| v.to_str().ok())
                .map(|v| (name.to_string(), v.to_string()))
        })
        .collect()
}
