use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for the users table. `id` is the auth service's user id.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct MemberModel {
    pub id: Uuid,
    pub gym_id: Option<Uuid>,
    pub name: String,
    pub email: String,
    pub role: String, // "owner", "coach" or "member"
}

impl MemberModel {
    pub fn new(
        gym_id: Uuid,
        name: impl Into<String>,
        email: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            gym_id: Some(gym_id),
            name: name.into(),
            email: email.into(),
            role: role.into(),
        }
    }
}
