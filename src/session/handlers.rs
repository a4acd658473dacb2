use axum::{extract::State, Json};
use tracing::{info, instrument, warn};

use super::{
    cookies::CookieJar,
    types::{AuthStatus, Credentials, LoginRequest, LoginResponse, LogoutResponse},
};
use crate::extract::{require_text, ValidJson};
use crate::shared::{AppError, AppState};

/// HTTP handler for password sign-in
///
/// POST /auth/login
/// Sets the session cookies and returns the signed-in user's id
#[instrument(name = "login", skip(state, jar, request))]
pub async fn login(
    State(state): State<AppState>,
    mut jar: CookieJar,
    ValidJson(request): ValidJson<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), AppError> {
    let credentials = Credentials {
        email: require_text(request.email, "email")?,
        password: require_text(request.password, "password")?,
    };

    match state.auth_provider.sign_in(&credentials, &mut jar).await? {
        AuthStatus::Authenticated(user) => {
            info!(user_id = %user.user_id, "Login successful");
            Ok((
                jar,
                Json(LoginResponse {
                    user_id: user.user_id,
                }),
            ))
        }
        AuthStatus::Anonymous => Err(AppError::Unauthorized(
            "Invalid email or password".to_string(),
        )),
    }
}

/// HTTP handler for signing out
///
/// POST /auth/logout
/// Always clears the session cookies and reports success, so repeated calls are harmless
#[instrument(name = "logout", skip(state, jar))]
pub async fn logout(
    State(state): State<AppState>,
    mut jar: CookieJar,
) -> (CookieJar, Json<LogoutResponse>) {
    if let Err(e) = state.auth_provider.sign_out(&mut jar).await {
        warn!(error = %e, "Remote session invalidation failed, clearing cookies anyway");
    }
    jar.clear_session();

    info!("Logged out");
    (jar, Json(LogoutResponse { success: true }))
}
