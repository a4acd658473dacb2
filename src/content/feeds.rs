use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::shared::AppError;

/// Items taken from each feed before merging
pub const PER_FEED_LIMIT: usize = 5;
/// Items returned after merging
pub const MAX_ARTICLES: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Article {
    pub title: String,
    pub link: String,
    #[serde(rename = "pubDate")]
    pub pub_date: Option<String>,
    pub source: String,
}

impl Article {
    /// Parsed publish date (RFC 2822, or ISO 8601 as some feeds emit); missing or
    /// unparseable dates sort as the epoch
    pub fn published_at(&self) -> DateTime<Utc> {
        self.pub_date
            .as_deref()
            .map(str::trim)
            .and_then(|raw| {
                DateTime::parse_from_rfc2822(raw)
                    .or_else(|_| DateTime::parse_from_rfc3339(raw))
                    .ok()
            })
            .map(|date| date.with_timezone(&Utc))
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }
}

/// Source of feed items, one feed URL at a time
#[async_trait]
pub trait FeedFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<Article>, AppError>;
}

/// Fetches and parses RSS 2.0 feeds over HTTP
pub struct RssFeedFetcher {
    client: reqwest::Client,
}

impl RssFeedFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

/// Parses an RSS document into articles tagged with `source`
pub fn parse_rss(bytes: &[u8], source: &str) -> Result<Vec<Article>, AppError> {
    let channel = rss::Channel::read_from(bytes)
        .map_err(|e| AppError::Upstream(format!("Invalid RSS from {}: {}", source, e)))?;

    Ok(channel
        .items()
        .iter()
        .map(|item| Article {
            title: item.title().unwrap_or_default().trim().to_string(),
            link: item.link().unwrap_or_default().trim().to_string(),
            pub_date: item.pub_date().map(str::to_string),
            source: source.to_string(),
        })
        .collect())
}

#[async_trait]
impl FeedFetcher for RssFeedFetcher {
    #[instrument(skip(self))]
    async fn fetch(&self, url: &str) -> Result<Vec<Article>, AppError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| AppError::Upstream(format!("Feed request to {} failed: {}", url, e)))?;

        let body = response
            .bytes()
            .await
            .map_err(|e| AppError::Upstream(format!("Feed body from {} unreadable: {}", url, e)))?;

        let articles = parse_rss(&body, url)?;
        debug!(url, article_count = articles.len(), "Feed parsed");
        Ok(articles)
    }
}

/// Fetches every feed concurrently, keeps the first few items of each, and returns the
/// newest articles overall. A feed that fails is logged and left out; it never fails the
/// whole aggregation.
#[instrument(skip(fetcher))]
pub async fn aggregate_articles(
    fetcher: &(dyn FeedFetcher + Send + Sync),
    feeds: &[String],
) -> Vec<Article> {
    let results = join_all(feeds.iter().map(|url| fetcher.fetch(url))).await;

    let mut articles: Vec<Article> = Vec::new();
    for (url, result) in feeds.iter().zip(results) {
        match result {
            Ok(items) => articles.extend(items.into_iter().take(PER_FEED_LIMIT)),
            Err(e) => warn!(url = %url, error = %e, "Dropping feed that failed to load"),
        }
    }

    // Stable sort keeps feed order among equal dates
    articles.sort_by(|a, b| b.published_at().cmp(&a.published_at()));
    articles.truncate(MAX_ARTICLES);

    info!(article_count = articles.len(), "Articles aggregated");
    articles
}
