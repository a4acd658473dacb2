// Public API - what other modules can use
pub use handlers::{create_invitation, list_invitations};
pub use service::INVITATION_TTL_DAYS;

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
mod service;
pub mod types;
