//! REST endpoints for the chat surface.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use skyquery::{AskError, Mode, SourceRecord};
use tracing::{error, info};
use uuid::Uuid;

/// Role of a prior conversation turn.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A prior conversation turn.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// Chat request body.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    pub message: String,
    /// Accepted for contract compatibility; the orchestrator is single-turn.
    #[serde(default)]
    pub history: Vec<ChatMessage>,
}

/// Chat response body.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub answer: String,
    pub sources: Vec<SourceRecord>,
    pub mode: Mode,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Answer a chat message.
pub async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, Json<ErrorResponse>)> {
    if req.message.trim().is_empty() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse {
                error: "message must not be empty".to_string(),
            }),
        ));
    }

    let request_id = Uuid::new_v4();
    info!(
        %request_id,
        user_id = req.user_id.as_deref(),
        history_turns = req.history.len(),
        "chat request"
    );

    match state.orchestrator.ask(&req.message).await {
        Ok(bundle) => Ok(Json(ChatResponse {
            answer: bundle.answer,
            sources: bundle.sources,
            mode: bundle.mode,
        })),
        Err(e) => {
            error!(%request_id, error = %e, "orchestration failed");
            Err((status_for(&e), Json(ErrorResponse { error: e.to_string() })))
        }
    }
}

fn status_for(error: &AskError) -> StatusCode {
    match error {
        // Generation/execution failures are upstream problems, not client ones.
        AskError::Graph(_) | AskError::Documents(_) | AskError::BothFailed { .. } => {
            StatusCode::BAD_GATEWAY
        }
    }
}

/// Health probe.
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
