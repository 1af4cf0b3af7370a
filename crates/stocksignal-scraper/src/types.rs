use stocksignal_core::{AppConfig, Article};

/// Where to find articles and how to read them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsSource {
    /// Page enumerating links to individual articles.
    pub listing_url: String,
    /// Prefix for host-relative article links.
    pub base_url: String,
    /// CSS selector matching the article anchors on the listing page.
    pub listing_selector: String,
    /// CSS selector matching the body paragraphs on an article page.
    pub body_selector: String,
}

impl NewsSource {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            listing_url: config.listing_url.clone(),
            base_url: config.base_url.clone(),
            listing_selector: config.listing_selector.clone(),
            body_selector: config.body_selector.clone(),
        }
    }
}

/// One article anchor found on the listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    /// Absolute article URL, or `None` when the anchor has no usable `href`.
    pub url: Option<String>,
    pub title: String,
}

/// Articles fetched in listing order.
#[derive(Debug, Clone, Default)]
pub struct ArticleBatch {
    pub articles: Vec<Article>,
    /// Number of articles whose page could not be fetched or had no usable
    /// link; their body is empty.
    pub degraded: usize,
}
