use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    service::InvitationService,
    types::{
        InvitationCreateRequest, InvitationCreatedResponse, InvitationListQuery,
        InvitationListResponse,
    },
};
use crate::extract::{require, require_text, ValidJson, ValidQuery};
use crate::shared::{AppError, AppState};

/// HTTP handler for inviting someone to a gym
///
/// POST /api/invitations
/// Nothing is written unless email, gym_id and invited_by are all present
#[instrument(name = "create_invitation", skip(state, request))]
pub async fn create_invitation(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<InvitationCreateRequest>,
) -> Result<Json<InvitationCreatedResponse>, AppError> {
    let email = require_text(request.email, "email")?;
    let gym_id = require(request.gym_id, "gym_id")?;
    let invited_by = require(request.invited_by, "invited_by")?;

    let service = InvitationService::new(Arc::clone(&state.invitation_repository));
    let invitation = service.invite(email, gym_id, invited_by).await?;

    Ok(Json(InvitationCreatedResponse {
        message: "Invitation created successfully".to_string(),
        data: invitation,
    }))
}

/// HTTP handler for listing a gym's invitations
///
/// GET /api/invitations/fetch?gym_id=<uuid>
#[instrument(name = "list_invitations", skip(state))]
pub async fn list_invitations(
    State(state): State<AppState>,
    ValidQuery(params): ValidQuery<InvitationListQuery>,
) -> Result<Json<InvitationListResponse>, AppError> {
    let gym_id = require(params.gym_id, "gym_id")?;

    let service = InvitationService::new(Arc::clone(&state.invitation_repository));
    let invitations = service.list_for_gym(gym_id).await?;
    info!(gym_id = %gym_id, invitation_count = invitations.len(), "Invitations listed");

    Ok(Json(InvitationListResponse { invitations }))
}
