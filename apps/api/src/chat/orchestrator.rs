//! Chat orchestration — one prompt in, one combined HTML artifact out.
//!
//! Flow: strip markup → anti-forgery probe → current user → chat POST (90s deadline)
//!       → classify answer → answer block + query block.
//!
//! Every failure is terminal for the send. Nothing is retried here; the caller
//! decides whether to try again.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::chat::artifact::ChatReply;
use crate::chat::transport::{Transport, TransportError, TransportRequest};
use crate::markup::strip_annotations;

/// Hard deadline for the chat POST. Not configurable.
pub const CHAT_TIMEOUT: Duration = Duration::from_secs(90);

pub const CSRF_HEADER: &str = "X-CSRF-Token";
const CHAT_PATH: &str = "/api/chat";
const CURRENT_USER_PATH: &str = "/user-api/currentUser";

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Prompt is empty")]
    EmptyPrompt,

    #[error("Anti-forgery token unavailable: {0}")]
    CsrfToken(String),

    #[error("Not a valid user: {0}")]
    Identity(String),

    #[error("Chat endpoint returned status {status}")]
    Status { status: u16 },

    #[error("Chat request timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("Network error: {0}")]
    Network(#[from] TransportError),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The outcome of one successful send.
#[derive(Debug, Clone, Serialize)]
pub struct ChatExchange {
    pub exchange_id: Uuid,
    pub raw_input: String,
    pub user_id: String,
    pub answer_text: String,
    pub generated_query: String,
    pub is_html: bool,
    pub combined_artifact: String,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct CurrentUser {
    #[serde(default)]
    name: Option<String>,
}

/// Builds the outbound chat message. The backend parses the user id out of this exact format.
pub fn compose_message(user_id: &str, plain_prompt: &str) -> String {
    format!("user_id:{user_id}:Intellibase {plain_prompt}")
}

pub struct ChatOrchestrator {
    transport: Arc<dyn Transport>,
    base_url: String,
    session: Vec<(String, String)>,
    timeout: Duration,
}

impl ChatOrchestrator {
    pub fn new(transport: Arc<dyn Transport>, base_url: &str) -> Self {
        Self {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
            session: Vec::new(),
            timeout: CHAT_TIMEOUT,
        }
    }

    /// Session headers (cookie, authorization) forwarded on every backend call.
    pub fn with_session(mut self, session: Vec<(String, String)>) -> Self {
        self.session = session;
        self
    }

    /// Sends the prompt shown in the editor (highlight markup allowed) to the chat backend.
    pub async fn send(&self, prompt: &str) -> Result<ChatExchange, ChatError> {
        let raw_input = strip_annotations(prompt).trim().to_string();
        if raw_input.is_empty() {
            return Err(ChatError::EmptyPrompt);
        }

        let exchange_id = Uuid::new_v4();
        info!(%exchange_id, chars = raw_input.chars().count(), "chat send started");

        let csrf = self.fetch_csrf_token().await.inspect_err(|e| {
            warn!(%exchange_id, "anti-forgery probe failed: {e}");
        })?;
        let user_id = self.fetch_user_id(&csrf).await.inspect_err(|e| {
            warn!(%exchange_id, "identity lookup failed: {e}");
        })?;

        let message = compose_message(&user_id, &raw_input);
        let reply = self.post_chat(&csrf, &message).await.inspect_err(|e| {
            warn!(%exchange_id, "chat request failed: {e}");
        })?;

        let artifact = reply.to_artifact();
        if !artifact.is_html {
            warn!(%exchange_id, "backend answered with plain text");
        }
        info!(%exchange_id, is_html = artifact.is_html, "chat send completed");

        Ok(ChatExchange {
            exchange_id,
            raw_input,
            user_id,
            answer_text: reply.answer(),
            generated_query: reply.query(),
            is_html: artifact.is_html,
            combined_artifact: artifact.html,
            completed_at: Utc::now(),
        })
    }

    /// Probes the app base route for an anti-forgery token.
    async fn fetch_csrf_token(&self) -> Result<String, ChatError> {
        let request = TransportRequest::new(Method::HEAD, self.base_url.as_str())
            .headers(self.session.clone())
            .header(CSRF_HEADER, "Fetch");

        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(ChatError::CsrfToken(format!(
                "probe returned status {}",
                response.status
            )));
        }

        response
            .header(CSRF_HEADER)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .ok_or_else(|| ChatError::CsrfToken("no token in probe response".to_string()))
    }

    async fn fetch_user_id(&self, csrf: &str) -> Result<String, ChatError> {
        let request = TransportRequest::new(Method::GET, self.url(CURRENT_USER_PATH))
            .headers(self.session.clone())
            .header(CSRF_HEADER, csrf)
            .header("Content-Type", "application/json");

        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(ChatError::Identity(format!(
                "user endpoint returned status {}",
                response.status
            )));
        }

        let user: CurrentUser = serde_json::from_slice(&response.body)
            .map_err(|e| ChatError::Identity(format!("unreadable user payload: {e}")))?;

        user.name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ChatError::Identity("user payload has no name".to_string()))
    }

    /// Posts the message under the hard deadline. On expiry the request future is dropped,
    /// so a late response is never read.
    async fn post_chat(&self, csrf: &str, message: &str) -> Result<ChatReply, ChatError> {
        let request = TransportRequest::new(Method::POST, self.url(CHAT_PATH))
            .headers(self.session.clone())
            .header(CSRF_HEADER, csrf)
            .header("Content-Type", "application/json")
            .json(json!({ "message": message }));

        let response = tokio::time::timeout(self.timeout, self.transport.send(request))
            .await
            .map_err(|_| ChatError::Timeout {
                secs: self.timeout.as_secs(),
            })??;

        if !response.is_success() {
            return Err(ChatError::Status {
                status: response.status,
            });
        }

        Ok(serde_json::from_slice(&response.body)?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
