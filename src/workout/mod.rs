// Public API - what other modules can use
pub use handlers::{list_workouts, log_workout, recent_workouts, user_metrics};
pub use service::metrics_window_start;

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
mod service;
pub mod types;
