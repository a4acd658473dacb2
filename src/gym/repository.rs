use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::models::GymModel;
use crate::shared::AppError;

/// Trait for gym repository operations
#[async_trait]
pub trait GymRepository {
    async fn get_gym(&self, gym_id: Uuid) -> Result<Option<GymModel>, AppError>;

    /// Gyms whose name contains `query` (case-insensitive), ordered by name.
    /// `None` lists every gym.
    async fn search_gyms(&self, query: Option<&str>) -> Result<Vec<GymModel>, AppError>;
}

/// In-memory implementation of GymRepository for development and testing
pub struct InMemoryGymRepository {
    gyms: Mutex<HashMap<Uuid, GymModel>>,
}

impl Default for InMemoryGymRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryGymRepository {
    pub fn new() -> Self {
        Self {
            gyms: Mutex::new(HashMap::new()),
        }
    }

    /// Creates an in-memory repository with pre-populated gyms
    pub fn with_gyms(gyms: Vec<GymModel>) -> Self {
        Self {
            gyms: Mutex::new(gyms.into_iter().map(|gym| (gym.id, gym)).collect()),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<Uuid, GymModel>>, AppError> {
        self.gyms
            .lock()
            .map_err(|_| AppError::DatabaseError("Gym store poisoned".to_string()))
    }
}

#[async_trait]
impl GymRepository for InMemoryGymRepository {
    #[instrument(skip(self))]
    async fn get_gym(&self, gym_id: Uuid) -> Result<Option<GymModel>, AppError> {
        debug!(gym_id = %gym_id, "Fetching gym from memory");
        Ok(self.lock()?.get(&gym_id).cloned())
    }

    #[instrument(skip(self))]
    async fn search_gyms(&self, query: Option<&str>) -> Result<Vec<GymModel>, AppError> {
        let gyms = self.lock()?;
        let mut matches: Vec<GymModel> = gyms
            .values()
            .filter(|gym| query.map_or(true, |q| gym.name_contains(q)))
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.name.cmp(&b.name));

        debug!(match_count = matches.len(), "Gym search completed in memory");
        Ok(matches)
    }
}

/// PostgreSQL implementation of gym repository
pub struct PostgresGymRepository {
    pool: PgPool,
}

impl PostgresGymRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Escapes LIKE wildcards so the user's query is matched literally
fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[async_trait]
impl GymRepository for PostgresGymRepository {
    #[instrument(skip(self))]
    async fn get_gym(&self, gym_id: Uuid) -> Result<Option<GymModel>, AppError> {
        debug!(gym_id = %gym_id, "Fetching gym from database");

        sqlx::query_as::<_, GymModel>("SELECT id, name, member_code FROM gyms WHERE id = $1")
            .bind(gym_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, gym_id = %gym_id, "Failed to fetch gym from database");
                AppError::DatabaseError(e.to_string())
            })
    }

    #[instrument(skip(self))]
    async fn search_gyms(&self, query: Option<&str>) -> Result<Vec<GymModel>, AppError> {
        let gyms = match query {
            Some(q) => {
                sqlx::query_as::<_, GymModel>(
                    "SELECT id, name, member_code FROM gyms WHERE name ILIKE $1 ORDER BY name",
                )
                .bind(like_pattern(q))
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, GymModel>(
                    "SELECT id, name, member_code FROM gyms ORDER BY name",
                )
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| {
            warn!(error = %e, "Failed to search gyms in database");
            AppError::DatabaseError(e.to_string())
        })?;

        debug!(match_count = gyms.len(), "Gym search completed in database");
        Ok(gyms)
    }
}
