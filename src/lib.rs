// Library crate for the gym management backend
// This file exposes the public API for the binary and integration tests

pub mod assistant;
pub mod config;
pub mod content;
pub mod extract;
pub mod gym;
pub mod invitation;
pub mod member;
pub mod routes;
pub mod session;
pub mod shared;
pub mod workout;

// Re-export commonly used types for easier access in tests
pub use config::{AppConfig, ConfigError};
pub use routes::{app, RouterOptions};
pub use shared::{AppError, AppState, AppStateBuilder};
