use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::assistant::{AssistantConfig, HttpTextGenerator, TextGenerator};
use crate::content::{ContentConfig, FeedFetcher, HtmlWodSource, RssFeedFetcher, WodSource};
use crate::gym::repository::{GymRepository, InMemoryGymRepository};
use crate::invitation::repository::{InMemoryInvitationRepository, InvitationRepository};
use crate::member::repository::{InMemoryMemberRepository, MemberRepository};
use crate::session::{AuthProvider, CookieOptions, SessionGate};
use crate::workout::repository::{InMemoryWorkoutRepository, WorkoutRepository};

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub gym_repository: Arc<dyn GymRepository + Send + Sync>,
    pub member_repository: Arc<dyn MemberRepository + Send + Sync>,
    pub invitation_repository: Arc<dyn InvitationRepository + Send + Sync>,
    pub workout_repository: Arc<dyn WorkoutRepository + Send + Sync>,
    pub auth_provider: Arc<dyn AuthProvider + Send + Sync>,
    pub session_gate: SessionGate,
    pub cookie_options: CookieOptions,
    pub feed_fetcher: Arc<dyn FeedFetcher + Send + Sync>,
    pub wod_source: Arc<dyn WodSource + Send + Sync>,
    pub text_generator: Arc<dyn TextGenerator + Send + Sync>,
    pub content: ContentConfig,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::DatabaseError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", msg),
            ),
            AppError::Upstream(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}

/// Builder for AppState. Every collaborator except the auth provider defaults to an
/// in-memory or unconfigured implementation, so tests only override what they exercise.
pub struct AppStateBuilder {
    auth_provider: Arc<dyn AuthProvider + Send + Sync>,
    gym_repository: Option<Arc<dyn GymRepository + Send + Sync>>,
    member_repository: Option<Arc<dyn MemberRepository + Send + Sync>>,
    invitation_repository: Option<Arc<dyn InvitationRepository + Send + Sync>>,
    workout_repository: Option<Arc<dyn WorkoutRepository + Send + Sync>>,
    feed_fetcher: Option<Arc<dyn FeedFetcher + Send + Sync>>,
    wod_source: Option<Arc<dyn WodSource + Send + Sync>>,
    text_generator: Option<Arc<dyn TextGenerator + Send + Sync>>,
    session_gate: SessionGate,
    cookie_options: CookieOptions,
    content: ContentConfig,
    assistant: AssistantConfig,
    http_client: reqwest::Client,
}

impl AppStateBuilder {
    pub fn new(auth_provider: Arc<dyn AuthProvider + Send + Sync>) -> Self {
        Self {
            auth_provider,
            gym_repository: None,
            member_repository: None,
            invitation_repository: None,
            workout_repository: None,
            feed_fetcher: None,
            wod_source: None,
            text_generator: None,
            session_gate: SessionGate::default(),
            cookie_options: CookieOptions::default(),
            content: ContentConfig::default(),
            assistant: AssistantConfig::default(),
            http_client: reqwest::Client::new(),
        }
    }

    pub fn with_gym_repository(mut self, repo: Arc<dyn GymRepository + Send + Sync>) -> Self {
        self.gym_repository = Some(repo);
        self
    }

    pub fn with_member_repository(
        mut self,
        repo: Arc<dyn MemberRepository + Send + Sync>,
    ) -> Self {
        self.member_repository = Some(repo);
        self
    }

    pub fn with_invitation_repository(
        mut self,
        repo: Arc<dyn InvitationRepository + Send + Sync>,
    ) -> Self {
        self.invitation_repository = Some(repo);
        self
    }

    pub fn with_workout_repository(
        mut self,
        repo: Arc<dyn WorkoutRepository + Send + Sync>,
    ) -> Self {
        self.workout_repository = Some(repo);
        self
    }

    pub fn with_feed_fetcher(mut self, fetcher: Arc<dyn FeedFetcher + Send + Sync>) -> Self {
        self.feed_fetcher = Some(fetcher);
        self
    }

    pub fn with_wod_source(mut self, source: Arc<dyn WodSource + Send + Sync>) -> Self {
        self.wod_source = Some(source);
        self
    }

    pub fn with_text_generator(
        mut self,
        generator: Arc<dyn TextGenerator + Send + Sync>,
    ) -> Self {
        self.text_generator = Some(generator);
        self
    }

    pub fn with_session_gate(mut self, gate: SessionGate) -> Self {
        self.session_gate = gate;
        self
    }

    pub fn with_cookie_options(mut self, options: CookieOptions) -> Self {
        self.cookie_options = options;
        self
    }

    pub fn with_content_config(mut self, content: ContentConfig) -> Self {
        self.content = content;
        self
    }

    pub fn with_assistant_config(mut self, assistant: AssistantConfig) -> Self {
        self.assistant = assistant;
        self
    }

    /// Shared client for the default HTTP-backed collaborators
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = client;
        self
    }

    pub fn build(self) -> AppState {
        let http_client = self.http_client;
        let content = self.content;

        AppState {
            gym_repository: self
                .gym_repository
                .unwrap_or_else(|| Arc::new(InMemoryGymRepository::new())),
            member_repository: self
                .member_repository
                .unwrap_or_else(|| Arc::new(InMemoryMemberRepository::new())),
            invitation_repository: self
                .invitation_repository
                .unwrap_or_else(|| Arc::new(InMemoryInvitationRepository::new())),
            workout_repository: self
                .workout_repository
                .unwrap_or_else(|| Arc::new(InMemoryWorkoutRepository::new())),
            auth_provider: self.auth_provider,
            session_gate: self.session_gate,
            cookie_options: self.cookie_options,
            feed_fetcher: self
                .feed_fetcher
                .unwrap_or_else(|| Arc::new(RssFeedFetcher::new(http_client.clone()))),
            wod_source: self.wod_source.unwrap_or_else(|| {
                Arc::new(HtmlWodSource::new(http_client.clone(), content.wod.clone()))
            }),
            text_generator: self.text_generator.unwrap_or_else(|| {
                Arc::new(HttpTextGenerator::new(http_client.clone(), self.assistant))
            }),
            content,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    async fn status_and_error(error: AppError) -> (StatusCode, String) {
        let response = error.into_response();
        let status = response.status();
        let body = test_utils::body_json(response).await;
        (status, body["error"].as_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn test_error_status_mapping() {
        let (status, message) = status_and_error(AppError::Validation("gym_id is required".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, "gym_id is required");

        let (status, _) = status_and_error(AppError::Unauthorized("no session".into())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = status_and_error(AppError::NotFound("Gym not found".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, message) = status_and_error(AppError::DatabaseError("boom".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "Database error: boom");

        let (status, message) = status_and_error(AppError::Upstream("feed down".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "feed down");
    }
}
