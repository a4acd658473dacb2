use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::models::WorkoutResultModel;
use crate::shared::AppError;

/// Trait for workout result repository operations
#[async_trait]
pub trait WorkoutRepository {
    async fn create_result(&self, result: &WorkoutResultModel) -> Result<(), AppError>;

    /// Number of results the user logged at or after `since`
    async fn count_since(&self, user_id: Uuid, since: DateTime<Utc>) -> Result<i64, AppError>;

    /// The user's most recent results, newest first
    async fn list_recent(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<WorkoutResultModel>, AppError>;
}

/// In-memory implementation of WorkoutRepository for development and testing
#[derive(Default)]
pub struct InMemoryWorkoutRepository {
    results: Mutex<Vec<WorkoutResultModel>>,
}

impl InMemoryWorkoutRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_results(results: Vec<WorkoutResultModel>) -> Self {
        Self {
            results: Mutex::new(results),
        }
    }

    fn snapshot(&self) -> Result<Vec<WorkoutResultModel>, AppError> {
        self.results
            .lock()
            .map(|results| results.clone())
            .map_err(|_| AppError::DatabaseError("Workout store poisoned".to_string()))
    }
}

#[async_trait]
impl WorkoutRepository for InMemoryWorkoutRepository {
    #[instrument(skip(self, result))]
    async fn create_result(&self, result: &WorkoutResultModel) -> Result<(), AppError> {
        debug!(result_id = %result.id, user_id = %result.user_id, "Logging workout in memory");

        self.results
            .lock()
            .map_err(|_| AppError::DatabaseError("Workout store poisoned".to_string()))?
            .push(result.clone());
        Ok(())
    }

    #[instrument(skip(self))]
    async fn count_since(&self, user_id: Uuid, since: DateTime<Utc>) -> Result<i64, AppError> {
        let count = self
            .snapshot()?
            .iter()
            .filter(|r| r.user_id == user_id && r.date_logged >= since)
            .count();
        Ok(count as i64)
    }

    #[instrument(skip(self))]
    async fn list_recent(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<WorkoutResultModel>, AppError> {
        let mut results: Vec<WorkoutResultModel> = self
            .snapshot()?
            .into_iter()
            .filter(|r| r.user_id == user_id)
            .collect();
        results.sort_by(|a, b| b.date_logged.cmp(&a.date_logged));
        results.truncate(limit.max(0) as usize);
        Ok(results)
    }
}

/// PostgreSQL implementation of workout result repository
pub struct PostgresWorkoutRepository {
    pool: PgPool,
}

impl PostgresWorkoutRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WorkoutRepository for PostgresWorkoutRepository {
    #[instrument(skip(self, result))]
    async fn create_result(&self, result: &WorkoutResultModel) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO workout_results (id, user_id, workout_name, result, notes, date_logged) VALUES ($1, $2, $3, $4, $5, $6)"
        )
        .bind(result.id)
        .bind(result.user_id)
        .bind(&result.workout_name)
        .bind(&result.result)
        .bind(&result.notes)
        .bind(result.date_logged)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to log workout in database");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn count_since(&self, user_id: Uuid, since: DateTime<Utc>) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM workout_results WHERE user_id = $1 AND date_logged >= $2",
        )
        .bind(user_id)
        .bind(since)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, user_id = %user_id, "Failed to count workouts in database");
            AppError::DatabaseError(e.to_string())
        })?;

        debug!(user_id = %user_id, count, "Counted workouts in database");
        Ok(count)
    }

    #[instrument(skip(self))]
    async fn list_recent(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<WorkoutResultModel>, AppError> {
        sqlx::query_as::<_, WorkoutResultModel>(
            "SELECT id, user_id, workout_name, result, notes, date_logged FROM workout_results WHERE user_id = $1 ORDER BY date_logged DESC LIMIT $2"
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, user_id = %user_id, "Failed to list workouts from database");
            AppError::DatabaseError(e.to_string())
        })
    }
}
