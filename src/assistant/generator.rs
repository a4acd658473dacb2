use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, instrument, warn};

use crate::shared::AppError;

pub const DEFAULT_AI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_AI_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub api_url: String,
    /// Without a key every generation request fails
    pub api_key: Option<String>,
    pub model: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_AI_API_URL.to_string(),
            api_key: None,
            model: DEFAULT_AI_MODEL.to_string(),
        }
    }
}

#[async_trait]
pub trait TextGenerator {
    /// Returns the provider's JSON response untouched
    async fn generate(&self, prompt: &str) -> Result<Value, AppError>;
}

/// Chat-completions client
pub struct HttpTextGenerator {
    client: reqwest::Client,
    config: AssistantConfig,
}

impl HttpTextGenerator {
    pub fn new(client: reqwest::Client, config: AssistantConfig) -> Self {
        Self { client, config }
    }

    fn request_body(&self, prompt: &str) -> Value {
        json!({
            "model": self.config.model,
            "messages": [
                { "role": "user", "content": prompt }
            ],
        })
    }
}

#[async_trait]
impl TextGenerator for HttpTextGenerator {
    #[instrument(skip(self, prompt), fields(prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &str) -> Result<Value, AppError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::Upstream("AI agent is not configured".to_string()))?;

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(api_key)
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "AI request failed");
                AppError::Upstream(format!("AI request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "AI provider rejected request");
            return Err(AppError::Upstream(format!(
                "AI provider returned {}",
                status.as_u16()
            )));
        }

        let body = response
            .json::<Value>()
            .await
            .map_err(|e| AppError::Upstream(format!("AI response was not JSON: {}", e)))?;

        debug!(model = %self.config.model, "AI response received");
        Ok(body)
    }
}
