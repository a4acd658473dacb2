use axum::{extract::State, Json};
use tracing::{info, instrument};
use uuid::Uuid;

use super::types::{GymDetailResponse, GymListResponse, GymSearchQuery, GymSummary};
use crate::extract::{ValidPath, ValidQuery};
use crate::shared::{AppError, AppState};

/// HTTP handler for searching gyms by name
///
/// GET /api/gyms?query=<substr>
/// An empty or missing query lists every gym
#[instrument(name = "search_gyms", skip(state))]
pub async fn search_gyms(
    State(state): State<AppState>,
    ValidQuery(params): ValidQuery<GymSearchQuery>,
) -> Result<Json<GymListResponse>, AppError> {
    let query = params
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty());

    let gyms = state.gym_repository.search_gyms(query).await?;
    info!(gym_count = gyms.len(), "Gyms listed successfully");

    Ok(Json(GymListResponse {
        gyms: gyms.into_iter().map(GymSummary::from).collect(),
    }))
}

/// HTTP handler for a single gym
///
/// GET /api/gyms/:id
#[instrument(name = "get_gym", skip(state))]
pub async fn get_gym(
    State(state): State<AppState>,
    ValidPath(gym_id): ValidPath<Uuid>,
) -> Result<Json<GymDetailResponse>, AppError> {
    let gym = state
        .gym_repository
        .get_gym(gym_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Gym not found".to_string()))?;

    Ok(Json(gym.into()))
}
