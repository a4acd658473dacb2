use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for invitations table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct InvitationModel {
    pub id: Uuid,
    pub email: String,
    pub gym_id: Uuid,
    pub invited_by: Uuid, // User id of the staff member who sent it
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl InvitationModel {
    /// Creates an invitation that expires `ttl_days` from now
    pub fn new(email: String, gym_id: Uuid, invited_by: Uuid, ttl_days: i64) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            email,
            gym_id,
            invited_by,
            created_at: now,
            expires_at: now + Duration::days(ttl_days),
        }
    }
}
