//! Content widgets: aggregated fitness articles and the scraped workout of the day.

// Public API - what other modules can use
pub use feeds::{aggregate_articles, Article, FeedFetcher, RssFeedFetcher};
pub use handlers::{list_articles, workout_of_the_day};
pub use wod::{HtmlWodSource, Wod, WodConfig, WodSource};

// Internal modules
mod feeds;
mod handlers;
mod wod;

/// Feeds aggregated by default
pub const DEFAULT_FEEDS: [&str; 3] = [
    "https://breakingmuscle.com/feed/",
    "https://www.boxrox.com/feed/",
    "https://www.t-nation.com/feed/",
];

#[derive(Debug, Clone)]
pub struct ContentConfig {
    pub feeds: Vec<String>,
    pub wod: WodConfig,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            feeds: DEFAULT_FEEDS.iter().map(|url| url.to_string()).collect(),
            wod: WodConfig::default(),
        }
    }
}
