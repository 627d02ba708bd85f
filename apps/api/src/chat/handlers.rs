//! Axum route handlers for the AI chat API.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::chat::context::{build_messages, ConversationMessage};
use crate::chat::dispatcher::{dispatch, ModelConfig};
use crate::chat::modes::{ProfessionalMode, ProfessionalModeId};
use crate::errors::AppError;
use crate::state::AppState;

fn default_mode() -> String {
    "general".to_string()
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Trailing conversation history, oldest first. Older clients send this
    /// field as `context`.
    #[serde(default, alias = "context")]
    pub history: Vec<ConversationMessage>,
    #[serde(default = "default_mode")]
    pub mode: String,
    pub config: ModelConfig,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub text: String,
    pub tokens_used: u32,
    pub model: String,
    pub mode: String,
    pub timestamp: DateTime<Utc>,
}

/// POST /api/v1/ai/chat
///
/// Assembles `[system, ...bounded history, user]` for the requested
/// professional mode and forwards it to the upstream chat-completion
/// service. The caller supplies the model config; nothing is persisted.
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let messages = build_messages(
        &state.modes,
        &request.mode,
        &request.history,
        &request.message,
    )?;

    let outcome = dispatch(state.transport.as_ref(), &messages, &request.config).await?;

    // Echo the resolved mode so the UI learns about a silent fallback.
    let mode = state.modes.resolve(&request.mode).id.as_str().to_string();

    Ok(Json(ChatResponse {
        text: outcome.text,
        tokens_used: outcome.tokens_used,
        model: outcome.model,
        mode,
        timestamp: Utc::now(),
    }))
}

#[derive(Debug, Serialize)]
pub struct ModeListResponse {
    pub modes: Vec<ProfessionalMode>,
    pub default: ProfessionalModeId,
}

/// GET /api/v1/ai/modes
///
/// Lists the professional modes the assistant can assume. Prompts stay
/// server-side; only id and display name are exposed.
pub async fn handle_list_modes(State(state): State<AppState>) -> Json<ModeListResponse> {
    Json(ModeListResponse {
        modes: state.modes.list().to_vec(),
        default: ProfessionalModeId::DEFAULT,
    })
}
