use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::shared::AppError;

pub const DEFAULT_WOD_SELECTOR: &str = ".wod";

/// Where the workout of the day is scraped from
#[derive(Debug, Clone)]
pub struct WodConfig {
    /// Page to scrape; unset means the widget is disabled
    pub url: Option<String>,
    /// CSS selector of the element holding the workout
    pub selector: String,
}

impl Default for WodConfig {
    fn default() -> Self {
        Self {
            url: None,
            selector: DEFAULT_WOD_SELECTOR.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Wod {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub description: String,
}

#[async_trait]
pub trait WodSource {
    /// `Ok(None)` when the page loaded but nothing matched
    async fn fetch_wod(&self) -> Result<Option<Wod>, AppError>;
}

/// Scrapes the configured page over HTTP
pub struct HtmlWodSource {
    client: reqwest::Client,
    config: WodConfig,
}

impl HtmlWodSource {
    pub fn new(client: reqwest::Client, config: WodConfig) -> Self {
        Self { client, config }
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

/// Pulls the first element matching `selector` out of `html`. A heading inside it becomes
/// the title and the remaining text the description.
pub fn extract_wod(html: &str, selector: &str) -> Result<Option<Wod>, AppError> {
    let selector = Selector::parse(selector).map_err(|e| {
        warn!(selector, error = ?e, "Invalid WOD selector");
        AppError::Internal
    })?;
    let heading = Selector::parse("h1, h2, h3").map_err(|e| {
        warn!(error = ?e, "Invalid heading selector");
        AppError::Internal
    })?;

    let document = Html::parse_document(html);
    let Some(element) = document.select(&selector).next() else {
        return Ok(None);
    };

    let full_text = element_text(element);
    let title = element
        .select(&heading)
        .next()
        .map(element_text)
        .filter(|t| !t.is_empty());

    let description = match &title {
        Some(t) => full_text
            .strip_prefix(t.as_str())
            .unwrap_or(&full_text)
            .trim()
            .to_string(),
        None => full_text,
    };

    if title.is_none() && description.is_empty() {
        return Ok(None);
    }

    Ok(Some(Wod { title, description }))
}

#[async_trait]
impl WodSource for HtmlWodSource {
    #[instrument(skip(self))]
    async fn fetch_wod(&self) -> Result<Option<Wod>, AppError> {
        let url = self
            .config
            .url
            .as_deref()
            .ok_or_else(|| AppError::Upstream("Workout of the day source is not configured".to_string()))?;

        let html = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| AppError::Upstream(format!("WOD request failed: {}", e)))?
            .text()
            .await
            .map_err(|e| AppError::Upstream(format!("WOD body unreadable: {}", e)))?;

        debug!(url, bytes = html.len(), "WOD page fetched");
        extract_wod(&html, &self.config.selector)
    }
}
