use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::instrument;

use super::{
    service::WorkoutService,
    types::{LogWorkoutRequest, WorkoutListResponse, WorkoutMetricsResponse, WorkoutResponse},
};
use crate::extract::{require_text, ValidJson};
use crate::session::CurrentUser;
use crate::shared::{AppError, AppState};

async fn weekly_metrics(
    state: &AppState,
    user: CurrentUser,
) -> Result<Json<WorkoutMetricsResponse>, AppError> {
    let service = WorkoutService::new(Arc::clone(&state.workout_repository));
    let count = service.completed_past_week(user.user_id).await?;

    Ok(Json(WorkoutMetricsResponse {
        workouts_completed_past_7_days: count,
    }))
}

/// GET /api/workouts/recent
#[instrument(name = "recent_workouts", skip(state))]
pub async fn recent_workouts(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<WorkoutMetricsResponse>, AppError> {
    weekly_metrics(&state, user).await
}

/// GET /api/user/metrics
///
/// Same figure as /api/workouts/recent; the dashboard widgets use both routes
#[instrument(name = "user_metrics", skip(state))]
pub async fn user_metrics(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<WorkoutMetricsResponse>, AppError> {
    weekly_metrics(&state, user).await
}

/// HTTP handler for logging a workout result for the signed-in user
///
/// POST /api/workouts
#[instrument(name = "log_workout", skip(state, request))]
pub async fn log_workout(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidJson(request): ValidJson<LogWorkoutRequest>,
) -> Result<Json<WorkoutResponse>, AppError> {
    let workout_name = require_text(request.workout_name, "workout_name")?;
    let result = require_text(request.result, "result")?;

    let service = WorkoutService::new(Arc::clone(&state.workout_repository));
    let workout = service
        .log_result(
            user.user_id,
            workout_name,
            result,
            request.notes,
            request.date_logged,
        )
        .await?;

    Ok(Json(WorkoutResponse { workout }))
}

/// GET /api/workouts
#[instrument(name = "list_workouts", skip(state))]
pub async fn list_workouts(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<WorkoutListResponse>, AppError> {
    let service = WorkoutService::new(Arc::clone(&state.workout_repository));
    let workouts = service.recent_results(user.user_id).await?;

    Ok(Json(WorkoutListResponse { workouts }))
}
