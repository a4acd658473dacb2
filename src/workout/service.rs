use chrono::{DateTime, Duration, NaiveTime, Utc};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use super::{models::WorkoutResultModel, repository::WorkoutRepository};
use crate::shared::AppError;

const METRICS_WINDOW_DAYS: i64 = 7;
const RECENT_LIMIT: i64 = 50;

/// Start of the metrics window: midnight (UTC) of the day seven days before `now`
pub fn metrics_window_start(now: DateTime<Utc>) -> DateTime<Utc> {
    (now - Duration::days(METRICS_WINDOW_DAYS))
        .date_naive()
        .and_time(NaiveTime::MIN)
        .and_utc()
}

/// Service for handling workout result business logic
pub struct WorkoutService {
    repository: Arc<dyn WorkoutRepository + Send + Sync>,
}

impl WorkoutService {
    pub fn new(repository: Arc<dyn WorkoutRepository + Send + Sync>) -> Self {
        Self { repository }
    }

    /// Workouts the user logged since the start of the metrics window
    #[instrument(skip(self))]
    pub async fn completed_past_week(&self, user_id: Uuid) -> Result<i64, AppError> {
        let since = metrics_window_start(Utc::now());
        let count = self.repository.count_since(user_id, since).await?;

        info!(user_id = %user_id, since = %since, count, "Computed weekly workout count");
        Ok(count)
    }

    #[instrument(skip(self, result, notes))]
    pub async fn log_result(
        &self,
        user_id: Uuid,
        workout_name: String,
        result: String,
        notes: Option<String>,
        date_logged: Option<DateTime<Utc>>,
    ) -> Result<WorkoutResultModel, AppError> {
        let model = WorkoutResultModel::new(
            user_id,
            workout_name,
            result,
            notes.filter(|n| !n.trim().is_empty()),
            date_logged.unwrap_or_else(Utc::now),
        );

        self.repository.create_result(&model).await?;

        info!(user_id = %user_id, result_id = %model.id, "Workout result logged");
        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn recent_results(&self, user_id: Uuid) -> Result<Vec<WorkoutResultModel>, AppError> {
        self.repository.list_recent(user_id, RECENT_LIMIT).await
    }
}
