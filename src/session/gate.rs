use std::time::Duration;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::{debug, info, instrument, warn};

use super::{
    cookies::CookieJar,
    matcher::{ProtectedArea, RouteRules},
    provider::AuthProvider,
    types::{AuthStatus, CurrentUser},
};
use crate::shared::{AppError, AppState};

/// How a rejected page request is answered
#[derive(Debug, Clone)]
pub struct FailurePolicy {
    pub redirect_on_failure: bool,
    pub login_path: String,
}

impl Default for FailurePolicy {
    fn default() -> Self {
        Self {
            redirect_on_failure: true,
            login_path: "/login".to_string(),
        }
    }
}

/// Terminal state of the gate for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Path is not protected; the request passes through untouched
    NotMatched,
    Authorized(CurrentUser),
    Rejected(ProtectedArea),
}

/// Route protection settings. The provider itself lives in AppState.
#[derive(Debug, Clone)]
pub struct SessionGate {
    pub rules: RouteRules,
    pub policy: FailurePolicy,
    /// Upper bound on the provider call; exceeding it rejects the request
    pub auth_timeout: Duration,
}

impl Default for SessionGate {
    fn default() -> Self {
        Self {
            rules: RouteRules::default(),
            policy: FailurePolicy::default(),
            auth_timeout: Duration::from_secs(3),
        }
    }
}

impl SessionGate {
    /// Classifies the path and, for protected paths, asks the provider about the session.
    /// Provider errors and timeouts reject the request.
    #[instrument(skip(self, jar, provider))]
    pub async fn evaluate(
        &self,
        path: &str,
        jar: &mut CookieJar,
        provider: &(dyn AuthProvider + Send + Sync),
    ) -> GateDecision {
        let Some(area) = self.rules.classify(path) else {
            return GateDecision::NotMatched;
        };

        match tokio::time::timeout(self.auth_timeout, provider.validate_or_refresh(jar)).await {
            Ok(Ok(AuthStatus::Authenticated(user))) => {
                debug!(user_id = %user.user_id, ?area, "Session accepted");
                GateDecision::Authorized(user)
            }
            Ok(Ok(AuthStatus::Anonymous)) => {
                info!(?area, "No valid session for protected path");
                GateDecision::Rejected(area)
            }
            Ok(Err(e)) => {
                warn!(error = %e, ?area, "Auth provider failed, rejecting request");
                GateDecision::Rejected(area)
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.auth_timeout.as_millis() as u64,
                    ?area,
                    "Auth provider timed out, rejecting request"
                );
                GateDecision::Rejected(area)
            }
        }
    }

    fn rejection(&self, area: ProtectedArea) -> Response {
        match area {
            ProtectedArea::Page if self.policy.redirect_on_failure => {
                Redirect::to(&self.policy.login_path).into_response()
            }
            _ => AppError::Unauthorized("Authentication required".to_string()).into_response(),
        }
    }
}

/// Session gate middleware. Validates or renews the session on protected paths and
/// inserts [`CurrentUser`] into the request extensions for handlers.
/// Usage: .layer(middleware::from_fn_with_state(app_state.clone(), session::session_gate))
pub async fn session_gate(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let gate = &state.session_gate;
    let path = req.uri().path().to_string();

    if gate.rules.classify(&path).is_none() {
        return next.run(req).await;
    }

    let mut jar = CookieJar::from_headers(req.headers(), state.cookie_options.clone());
    let decision = gate
        .evaluate(&path, &mut jar, state.auth_provider.as_ref())
        .await;

    let mut response = match decision {
        GateDecision::NotMatched => next.run(req).await,
        GateDecision::Authorized(user) => {
            if jar.has_changes() {
                // Downstream handlers must see the renewed tokens
                match HeaderValue::from_str(&jar.cookie_header()) {
                    Ok(value) => {
                        req.headers_mut().insert(header::COOKIE, value);
                    }
                    Err(e) => warn!(error = %e, "Could not rewrite request Cookie header"),
                }
            }
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        GateDecision::Rejected(area) => gate.rejection(area),
    };

    jar.apply(response.headers_mut());
    response
}
