use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::models::WorkoutResultModel;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutMetricsResponse {
    pub workouts_completed_past_7_days: i64,
}

/// Request payload for logging a workout result
#[derive(Debug, Deserialize)]
pub struct LogWorkoutRequest {
    pub workout_name: Option<String>,
    pub result: Option<String>,
    pub notes: Option<String>,
    /// Defaults to now
    pub date_logged: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WorkoutResponse {
    pub workout: WorkoutResultModel,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WorkoutListResponse {
    pub workouts: Vec<WorkoutResultModel>,
}
