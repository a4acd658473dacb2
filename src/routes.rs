use std::path::PathBuf;

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::shared::{AppError, AppState};
use crate::{assistant, content, gym, invitation, member, session, workout};

/// Router settings that are not part of the request-time state
#[derive(Debug, Clone)]
pub struct RouterOptions {
    pub static_dir: PathBuf,
    /// Browser origin allowed to call the API with credentials
    pub allowed_origin: Option<HeaderValue>,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            static_dir: PathBuf::from("static"),
            allowed_origin: None,
        }
    }
}

async fn not_found() -> AppError {
    AppError::NotFound("Not found".to_string())
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/gyms", get(gym::search_gyms))
        .route("/gyms/:id", get(gym::get_gym))
        .route("/users", get(member::list_members))
        .route("/invitations", post(invitation::create_invitation))
        .route("/invitations/fetch", get(invitation::list_invitations))
        .route("/workouts", get(workout::list_workouts).post(workout::log_workout))
        .route("/workouts/recent", get(workout::recent_workouts))
        .route("/user/metrics", get(workout::user_metrics))
        .route("/content/articles", get(content::list_articles))
        .route("/content/wod", get(content::workout_of_the_day))
        .route("/ai-agent", post(assistant::ai_agent))
}

/// Builds the full application: resource routes, auth routes, static files, and the
/// session gate in front of all of them.
pub fn app(state: AppState, options: RouterOptions) -> Router {
    let router = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/auth/login", post(session::login))
        .route("/auth/logout", post(session::logout))
        .nest("/api", api_routes())
        .nest_service("/static", ServeDir::new(&options.static_dir))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session::session_gate,
        ))
        .layer(TraceLayer::new_for_http());

    let router = match options.allowed_origin {
        Some(origin) => router.layer(
            CorsLayer::new()
                .allow_origin(origin)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE])
                .allow_credentials(true),
        ),
        None => router,
    };

    router.with_state(state)
}
