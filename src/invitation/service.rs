use std::sync::Arc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::{models::InvitationModel, repository::InvitationRepository};
use crate::shared::AppError;

/// Days an invitation stays valid
pub const INVITATION_TTL_DAYS: i64 = 7;

/// Service for handling invitation business logic
pub struct InvitationService {
    repository: Arc<dyn InvitationRepository + Send + Sync>,
}

impl InvitationService {
    pub fn new(repository: Arc<dyn InvitationRepository + Send + Sync>) -> Self {
        Self { repository }
    }

    /// Records a new invitation expiring in seven days. Delivery happens elsewhere.
    #[instrument(skip(self, email))]
    pub async fn invite(
        &self,
        email: String,
        gym_id: Uuid,
        invited_by: Uuid,
    ) -> Result<InvitationModel, AppError> {
        let invitation = InvitationModel::new(email, gym_id, invited_by, INVITATION_TTL_DAYS);
        debug!(invitation_id = %invitation.id, "Generated invitation");

        self.repository.create_invitation(&invitation).await?;

        info!(
            invitation_id = %invitation.id,
            gym_id = %gym_id,
            expires_at = %invitation.expires_at,
            "Invitation created"
        );
        Ok(invitation)
    }

    #[instrument(skip(self))]
    pub async fn list_for_gym(&self, gym_id: Uuid) -> Result<Vec<InvitationModel>, AppError> {
        self.repository.list_by_gym(gym_id).await
    }
}
