use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The authenticated principal the session gate hands to handlers via request extensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub user_id: Uuid,
}

/// Outcome of asking the auth provider about the cookies on a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthStatus {
    Authenticated(CurrentUser),
    Anonymous,
}

/// JWT claims carried by the hosted auth service's access tokens
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccessClaims {
    pub sub: Uuid,
    pub exp: usize, // Expiration timestamp (standard JWT claim)
    #[serde(default)]
    pub iat: usize, // Issued at timestamp (standard JWT claim)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Login request body. Fields are optional so that a missing one is reported as a 400
/// rather than a deserialization rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct LoginResponse {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct LogoutResponse {
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_claims_tolerate_missing_optional_fields() {
        let json = r#"{"sub":"2b0a3f4e-8c1d-4f7a-9a55-0c8a1e2d3b4c","exp":1234567890}"#;
        let claims: AccessClaims = serde_json::from_str(json).unwrap();

        assert_eq!(claims.exp, 1234567890);
        assert_eq!(claims.iat, 0);
        assert!(claims.aud.is_none());
        assert!(claims.email.is_none());
    }

    #[test]
    fn test_login_request_missing_fields() {
        let request: LoginRequest = serde_json::from_str(r#"{"email":"a@b.c"}"#).unwrap();
        assert_eq!(request.email.as_deref(), Some("a@b.c"));
        assert!(request.password.is_none());
    }
}
