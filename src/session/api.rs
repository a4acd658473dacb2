use async_trait::async_trait;
use chrono::{Duration, Utc};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::models::Session;
use crate::shared::AppError;

/// Connection settings for the hosted auth service
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Base URL of the auth API, e.g. `https://project.example.co/auth/v1`
    pub url: String,
    /// Public project key sent as the `apikey` header
    pub anon_key: String,
}

/// HTTP surface of the hosted auth service that the session layer depends on
#[async_trait]
pub trait AuthApi {
    /// Exchanges a refresh token for a new session. `Ok(None)` means the service rejected
    /// the token (revoked, reused or expired).
    async fn refresh_session(&self, refresh_token: &str) -> Result<Option<Session>, AppError>;

    /// Password sign-in. `Ok(None)` means the credentials were rejected.
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Session>, AppError>;

    /// Revokes the session the access token belongs to
    async fn sign_out(&self, access_token: &str) -> Result<(), AppError>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    expires_in: i64,
    user: TokenUser,
}

#[derive(Debug, Deserialize)]
struct TokenUser {
    id: Uuid,
}

impl From<TokenResponse> for Session {
    fn from(response: TokenResponse) -> Self {
        Session {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            user_id: response.user.id,
            expires_at: Utc::now() + Duration::seconds(response.expires_in),
        }
    }
}

/// reqwest-backed client for the hosted auth service
pub struct HttpAuthApi {
    client: reqwest::Client,
    config: AuthConfig,
}

impl HttpAuthApi {
    pub fn new(client: reqwest::Client, config: AuthConfig) -> Self {
        Self { client, config }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.url.trim_end_matches('/'), path)
    }

    async fn token_grant(
        &self,
        grant_type: &str,
        body: serde_json::Value,
    ) -> Result<Option<Session>, AppError> {
        let response = self
            .client
            .post(self.endpoint("token"))
            .query(&[("grant_type", grant_type)])
            .header("apikey", &self.config.anon_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, grant_type, "Auth service request failed");
                AppError::Upstream(format!("Auth service unreachable: {}", e))
            })?;

        let status = response.status();
        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
            debug!(%status, grant_type, "Auth service rejected token grant");
            return Ok(None);
        }
        if !status.is_success() {
            warn!(%status, grant_type, "Auth service returned unexpected status");
            return Err(AppError::Upstream(format!(
                "Auth service returned status {}",
                status
            )));
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            warn!(error = %e, "Failed to decode auth service token response");
            AppError::Upstream(format!("Malformed auth service response: {}", e))
        })?;

        Ok(Some(token.into()))
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    #[instrument(skip(self, refresh_token))]
    async fn refresh_session(&self, refresh_token: &str) -> Result<Option<Session>, AppError> {
        self.token_grant("refresh_token", json!({ "refresh_token": refresh_token }))
            .await
    }

    #[instrument(skip(self, password))]
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Session>, AppError> {
        self.token_grant("password", json!({ "email": email, "password": password }))
            .await
    }

    #[instrument(skip(self, access_token))]
    async fn sign_out(&self, access_token: &str) -> Result<(), AppError> {
        let response = self
            .client
            .post(self.endpoint("logout"))
            .header("apikey", &self.config.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Auth service logout request failed");
                AppError::Upstream(format!("Auth service unreachable: {}", e))
            })?;

        let status = response.status();
        // 401/404: the session is already gone on the service side
        if status.is_success()
            || status == StatusCode::UNAUTHORIZED
            || status == StatusCode::NOT_FOUND
        {
            debug!(%status, "Remote session invalidated");
            return Ok(());
        }

        warn!(%status, "Auth service logout returned unexpected status");
        Err(AppError::Upstream(format!(
            "Auth service returned status {}",
            status
        )))
    }
}
