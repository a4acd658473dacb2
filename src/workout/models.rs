use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for workout_results table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct WorkoutResultModel {
    pub id: Uuid,
    pub user_id: Uuid,
    pub workout_name: String,
    pub result: String, // Free-form score: time, rounds, load
    pub notes: Option<String>,
    pub date_logged: DateTime<Utc>,
}

impl WorkoutResultModel {
    pub fn new(
        user_id: Uuid,
        workout_name: String,
        result: String,
        notes: Option<String>,
        date_logged: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            workout_name,
            result,
            notes,
            date_logged,
        }
    }
}
