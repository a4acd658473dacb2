use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use thiserror::Error;
use tracing::{debug, instrument};
use uuid::Uuid;

use super::types::AccessClaims;

pub const DEFAULT_SECRET: &str = "your-secret-key-change-in-production";
pub const DEFAULT_AUDIENCE: &str = "authenticated";

#[derive(Debug, Error, PartialEq)]
pub enum TokenError {
    #[error("Access token has expired")]
    Expired,

    #[error("Invalid access token: {0}")]
    Invalid(String),
}

/// Verifies access tokens minted by the hosted auth service (HS256, shared project secret)
#[derive(Clone)]
pub struct TokenConfig {
    secret: String,
    audience: String,
    /// Tokens expiring sooner than this are treated as due for renewal
    pub refresh_margin: Duration,
}

impl TokenConfig {
    pub fn new(secret: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            audience: audience.into(),
            refresh_margin: Duration::seconds(60),
        }
    }

    pub fn with_refresh_margin(mut self, margin: Duration) -> Self {
        self.refresh_margin = margin;
        self
    }

    /// True when the secret is still the built-in development default
    pub fn uses_default_secret(&self) -> bool {
        self.secret == DEFAULT_SECRET
    }

    /// Mints an access token. The hosted service does this in production; the server only
    /// needs it for local development and tests.
    #[instrument(skip(self))]
    pub fn create_token(&self, user_id: Uuid, ttl: Duration) -> Result<String, TokenError> {
        let now = Utc::now();
        let exp = (now + ttl).timestamp().max(0) as usize;

        debug!(exp_timestamp = exp, "Creating access token with expiration");

        let claims = AccessClaims {
            sub: user_id,
            exp,
            iat: now.timestamp() as usize,
            aud: Some(self.audience.clone()),
            email: None,
            role: Some("authenticated".to_string()),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_ref()),
        )
        .map_err(|e| {
            debug!(error = %e, "Failed to encode access token");
            TokenError::Invalid(e.to_string())
        })
    }

    /// Verifies signature, audience and expiry, returning the claims if valid
    #[instrument(skip(self, token))]
    pub fn validate_token(&self, token: &str) -> Result<AccessClaims, TokenError> {
        debug!("Decoding and validating access token");

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[self.audience.as_str()]);
        validation.leeway = 0;

        decode::<AccessClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_ref()),
            &validation,
        )
        .map(|data| {
            debug!(
                user_id = %data.claims.sub,
                exp = data.claims.exp,
                "Access token decoded successfully"
            );
            data.claims
        })
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => {
                debug!(error = %e, "Failed to decode access token");
                TokenError::Invalid(e.to_string())
            }
        })
    }

    /// True when the claims stay valid for longer than the refresh margin
    pub fn is_fresh(&self, claims: &AccessClaims) -> bool {
        let remaining = claims.exp as i64 - Utc::now().timestamp();
        remaining > self.refresh_margin.num_seconds()
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SECRET, DEFAULT_AUDIENCE)
    }
}
