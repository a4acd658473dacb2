// Public API - what other modules can use
pub use handlers::{get_gym, search_gyms};

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
pub mod types;
