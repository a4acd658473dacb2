//! Cookie sessions delegated to the hosted auth service, and the gate that protects routes.

// Public API - what other modules can use
pub use api::{AuthApi, AuthConfig, HttpAuthApi};
pub use cookies::{CookieJar, CookieOptions, SameSite, ACCESS_COOKIE_NAME, REFRESH_COOKIE_NAME};
pub use gate::{session_gate, FailurePolicy, GateDecision, SessionGate};
pub use handlers::{login, logout};
pub use matcher::{PathPattern, PatternError, ProtectedArea, RouteRules};
pub use models::Session;
pub use provider::{AuthProvider, SessionAuthenticator};
pub use token::{TokenConfig, TokenError, DEFAULT_AUDIENCE, DEFAULT_SECRET};
pub use types::{AuthStatus, Credentials, CurrentUser};

// Internal modules
mod api;
mod cookies;
mod gate;
mod handlers;
mod matcher;
pub mod models;
mod provider;
mod token;
pub mod types;
