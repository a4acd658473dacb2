//! Proxy to a hosted text-generation API for the coaching assistant widget.

pub use generator::{AssistantConfig, HttpTextGenerator, TextGenerator};
pub use handlers::ai_agent;

mod generator;
mod handlers;
