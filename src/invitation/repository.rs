use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::models::InvitationModel;
use crate::shared::AppError;

/// Trait for invitation repository operations
#[async_trait]
pub trait InvitationRepository {
    async fn create_invitation(&self, invitation: &InvitationModel) -> Result<(), AppError>;

    /// Invitations for a gym, newest first
    async fn list_by_gym(&self, gym_id: Uuid) -> Result<Vec<InvitationModel>, AppError>;
}

/// In-memory implementation of InvitationRepository for development and testing
#[derive(Default)]
pub struct InMemoryInvitationRepository {
    invitations: Mutex<Vec<InvitationModel>>,
}

impl InMemoryInvitationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current number of invitations in the repository
    pub fn invitation_count(&self) -> usize {
        self.invitations.lock().map(|i| i.len()).unwrap_or_default()
    }
}

#[async_trait]
impl InvitationRepository for InMemoryInvitationRepository {
    #[instrument(skip(self, invitation))]
    async fn create_invitation(&self, invitation: &InvitationModel) -> Result<(), AppError> {
        debug!(invitation_id = %invitation.id, "Creating invitation in memory");

        self.invitations
            .lock()
            .map_err(|_| AppError::DatabaseError("Invitation store poisoned".to_string()))?
            .push(invitation.clone());
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_by_gym(&self, gym_id: Uuid) -> Result<Vec<InvitationModel>, AppError> {
        let invitations = self
            .invitations
            .lock()
            .map_err(|_| AppError::DatabaseError("Invitation store poisoned".to_string()))?;

        let mut found: Vec<InvitationModel> = invitations
            .iter()
            .filter(|i| i.gym_id == gym_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }
}

/// PostgreSQL implementation of invitation repository
pub struct PostgresInvitationRepository {
    pool: PgPool,
}

impl PostgresInvitationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InvitationRepository for PostgresInvitationRepository {
    #[instrument(skip(self, invitation))]
    async fn create_invitation(&self, invitation: &InvitationModel) -> Result<(), AppError> {
        debug!(invitation_id = %invitation.id, "Creating invitation in database");

        sqlx::query(
            "INSERT INTO invitations (id, email, gym_id, invited_by, created_at, expires_at) VALUES ($1, $2, $3, $4, $5, $6)"
        )
        .bind(invitation.id)
        .bind(&invitation.email)
        .bind(invitation.gym_id)
        .bind(invitation.invited_by)
        .bind(invitation.created_at)
        .bind(invitation.expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to create invitation in database");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_by_gym(&self, gym_id: Uuid) -> Result<Vec<InvitationModel>, AppError> {
        sqlx::query_as::<_, InvitationModel>(
            "SELECT id, email, gym_id, invited_by, created_at, expires_at FROM invitations WHERE gym_id = $1 ORDER BY created_at DESC"
        )
        .bind(gym_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, gym_id = %gym_id, "Failed to list invitations from database");
            AppError::DatabaseError(e.to_string())
        })
    }
}
