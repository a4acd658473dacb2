use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, instrument};

use crate::extract::{require_text, ValidJson};
use crate::session::CurrentUser;
use crate::shared::{AppError, AppState};

#[derive(Debug, Deserialize)]
pub struct AiAgentRequest {
    pub prompt: Option<String>,
}

/// HTTP handler for the assistant proxy
///
/// POST /api/ai-agent
#[instrument(name = "ai_agent", skip(state, request))]
pub async fn ai_agent(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidJson(request): ValidJson<AiAgentRequest>,
) -> Result<Json<Value>, AppError> {
    let prompt = require_text(request.prompt, "prompt")?;

    let response = state.text_generator.generate(&prompt).await?;
    info!(user_id = %user.user_id, "AI agent answered");

    Ok(Json(response))
}
