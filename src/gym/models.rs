use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for gyms table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct GymModel {
    pub id: Uuid,
    pub name: String,
    pub member_code: String, // Code members enter to join the gym
}

impl GymModel {
    pub fn new(name: impl Into<String>, member_code: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            member_code: member_code.into(),
        }
    }

    /// Case-insensitive substring match on the gym name
    pub fn name_contains(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(&query.to_lowercase())
    }
}
