use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::models::InvitationModel;

/// Request payload for inviting someone to a gym. Every field is required; they are
/// optional here so a missing one yields a 400 naming the field.
#[derive(Debug, Deserialize)]
pub struct InvitationCreateRequest {
    pub email: Option<String>,
    pub gym_id: Option<Uuid>,
    pub invited_by: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InvitationCreatedResponse {
    pub message: String,
    pub data: InvitationModel,
}

#[derive(Debug, Deserialize)]
pub struct InvitationListQuery {
    pub gym_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InvitationListResponse {
    pub invitations: Vec<InvitationModel>,
}
