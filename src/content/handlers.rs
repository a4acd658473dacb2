use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::{feeds::aggregate_articles, feeds::Article, wod::Wod};
use crate::shared::{AppError, AppState};

#[derive(Debug, Serialize, Deserialize)]
pub struct WodResponse {
    pub wod: Wod,
}

/// HTTP handler for the aggregated article feed
///
/// GET /api/content/articles
#[instrument(name = "list_articles", skip(state))]
pub async fn list_articles(State(state): State<AppState>) -> Json<Vec<Article>> {
    let articles = aggregate_articles(state.feed_fetcher.as_ref(), &state.content.feeds).await;
    Json(articles)
}

/// HTTP handler for the workout of the day
///
/// GET /api/content/wod
#[instrument(name = "workout_of_the_day", skip(state))]
pub async fn workout_of_the_day(
    State(state): State<AppState>,
) -> Result<Json<WodResponse>, AppError> {
    let wod = state
        .wod_source
        .fetch_wod()
        .await?
        .ok_or_else(|| AppError::NotFound("Workout of the day not found".to_string()))?;

    info!(title = ?wod.title, "Workout of the day scraped");
    Ok(Json(WodResponse { wod }))
}
