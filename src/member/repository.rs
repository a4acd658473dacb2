use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::models::MemberModel;
use crate::shared::AppError;

/// Trait for member (users table) repository operations
#[async_trait]
pub trait MemberRepository {
    async fn list_by_gym(&self, gym_id: Uuid) -> Result<Vec<MemberModel>, AppError>;
}

/// In-memory implementation of MemberRepository for development and testing
#[derive(Default)]
pub struct InMemoryMemberRepository {
    members: Mutex<Vec<MemberModel>>,
}

impl InMemoryMemberRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_members(members: Vec<MemberModel>) -> Self {
        Self {
            members: Mutex::new(members),
        }
    }
}

#[async_trait]
impl MemberRepository for InMemoryMemberRepository {
    #[instrument(skip(self))]
    async fn list_by_gym(&self, gym_id: Uuid) -> Result<Vec<MemberModel>, AppError> {
        let members = self
            .members
            .lock()
            .map_err(|_| AppError::DatabaseError("Member store poisoned".to_string()))?;
        let mut found: Vec<MemberModel> = members
            .iter()
            .filter(|m| m.gym_id == Some(gym_id))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));

        debug!(gym_id = %gym_id, member_count = found.len(), "Members listed from memory");
        Ok(found)
    }
}

/// PostgreSQL implementation of member repository
pub struct PostgresMemberRepository {
    pool: PgPool,
}

impl PostgresMemberRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberRepository for PostgresMemberRepository {
    #[instrument(skip(self))]
    async fn list_by_gym(&self, gym_id: Uuid) -> Result<Vec<MemberModel>, AppError> {
        let members = sqlx::query_as::<_, MemberModel>(
            "SELECT id, gym_id, name, email, role FROM users WHERE gym_id = $1 ORDER BY name",
        )
        .bind(gym_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, gym_id = %gym_id, "Failed to list members from database");
            AppError::DatabaseError(e.to_string())
        })?;

        debug!(gym_id = %gym_id, member_count = members.len(), "Members listed from database");
        Ok(members)
    }
}
