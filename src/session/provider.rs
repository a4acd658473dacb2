use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use tracing::{debug, info, instrument, warn};

use super::{
    api::AuthApi,
    cookies::{CookieJar, ACCESS_COOKIE_NAME, REFRESH_COOKIE_NAME},
    models::Session,
    token::{TokenConfig, TokenError},
    types::{AuthStatus, Credentials, CurrentUser},
};
use crate::shared::AppError;

/// The auth collaborator as seen by the session gate and the auth handlers.
///
/// Every operation receives the request's cookie jar by mutable reference and may rewrite
/// it; the caller propagates the final jar onto the response.
#[async_trait]
pub trait AuthProvider {
    /// Validates the session carried in `jar`, renewing it when the access token is
    /// expired (or about to be) and the refresh token is still accepted
    async fn validate_or_refresh(&self, jar: &mut CookieJar) -> Result<AuthStatus, AppError>;

    async fn sign_in(
        &self,
        credentials: &Credentials,
        jar: &mut CookieJar,
    ) -> Result<AuthStatus, AppError>;

    /// Invalidates the remote session (if any) and clears the session cookies
    async fn sign_out(&self, jar: &mut CookieJar) -> Result<(), AppError>;
}

/// Cookie-based session provider backed by the hosted auth service
pub struct SessionAuthenticator {
    api: Arc<dyn AuthApi + Send + Sync>,
    tokens: TokenConfig,
    refresh_cookie_max_age: Duration,
}

impl SessionAuthenticator {
    pub fn new(api: Arc<dyn AuthApi + Send + Sync>, tokens: TokenConfig) -> Self {
        Self {
            api,
            tokens,
            refresh_cookie_max_age: Duration::days(30),
        }
    }

    pub fn with_refresh_cookie_max_age(mut self, max_age: Duration) -> Self {
        self.refresh_cookie_max_age = max_age;
        self
    }

    fn store_session(&self, jar: &mut CookieJar, session: &Session) {
        jar.set(
            ACCESS_COOKIE_NAME,
            session.access_token.clone(),
            session.remaining_secs(),
        );
        jar.set(
            REFRESH_COOKIE_NAME,
            session.refresh_token.clone(),
            self.refresh_cookie_max_age.num_seconds(),
        );
    }
}

#[async_trait]
impl AuthProvider for SessionAuthenticator {
    #[instrument(skip(self, jar))]
    async fn validate_or_refresh(&self, jar: &mut CookieJar) -> Result<AuthStatus, AppError> {
        let access_token = jar.get(ACCESS_COOKIE_NAME).map(str::to_string);
        let refresh_token = jar.get(REFRESH_COOKIE_NAME).map(str::to_string);

        if access_token.is_none() && refresh_token.is_none() {
            debug!("No session cookies present");
            return Ok(AuthStatus::Anonymous);
        }

        if let Some(token) = access_token.as_deref() {
            match self.tokens.validate_token(token) {
                Ok(claims) if self.tokens.is_fresh(&claims) => {
                    debug!(user_id = %claims.sub, "Access token valid");
                    return Ok(AuthStatus::Authenticated(CurrentUser {
                        user_id: claims.sub,
                    }));
                }
                Ok(claims) => {
                    debug!(user_id = %claims.sub, "Access token close to expiry, renewing")
                }
                Err(TokenError::Expired) => debug!("Access token expired, renewing"),
                Err(e) => warn!(error = %e, "Access token rejected, attempting renewal"),
            }
        }

        let Some(refresh_token) = refresh_token else {
            info!("Session not renewable: no refresh token");
            jar.clear_session();
            return Ok(AuthStatus::Anonymous);
        };

        match self.api.refresh_session(&refresh_token).await? {
            Some(session) => {
                info!(user_id = %session.user_id, "Session renewed");
                self.store_session(jar, &session);
                Ok(AuthStatus::Authenticated(CurrentUser {
                    user_id: session.user_id,
                }))
            }
            None => {
                info!("Refresh token rejected, clearing session cookies");
                jar.clear_session();
                Ok(AuthStatus::Anonymous)
            }
        }
    }

    #[instrument(skip(self, credentials, jar), fields(email = %credentials.email))]
    async fn sign_in(
        &self,
        credentials: &Credentials,
        jar: &mut CookieJar,
    ) -> Result<AuthStatus, AppError> {
        match self
            .api
            .sign_in_with_password(&credentials.email, &credentials.password)
            .await?
        {
            Some(session) => {
                info!(user_id = %session.user_id, "Signed in");
                self.store_session(jar, &session);
                Ok(AuthStatus::Authenticated(CurrentUser {
                    user_id: session.user_id,
                }))
            }
            None => {
                info!("Sign-in rejected");
                Ok(AuthStatus::Anonymous)
            }
        }
    }

    #[instrument(skip(self, jar))]
    async fn sign_out(&self, jar: &mut CookieJar) -> Result<(), AppError> {
        let access_token = jar.get(ACCESS_COOKIE_NAME).map(str::to_string);
        jar.clear_session();

        match access_token {
            Some(token) => self.api.sign_out(&token).await,
            None => {
                debug!("No access token to revoke");
                Ok(())
            }
        }
    }
}
