use futures::stream::{self, StreamExt};
use scraper::Selector;
use stocksignal_core::Article;

use super::NewsClient;
use crate::error::ScraperError;
use crate::parse::{parse_article_body, parse_listing, parse_selector};
use crate::types::{ArticleBatch, ListingEntry, NewsSource};

impl NewsClient {
    /// Fetches the listing page and returns its first `limit` anchors in
    /// listing order, including anchors without a usable link.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError`] if the listing selector is invalid or the
    /// listing page cannot be fetched. This failure is terminal for a run.
    pub async fn fetch_listing(
        &self,
        source: &NewsSource,
        limit: usize,
    ) -> Result<Vec<ListingEntry>, ScraperError> {
        let selector = parse_selector(&source.listing_selector)?;
        let html = self
            .fetch_page(&source.listing_url, self.listing_timeout)
            .await?;

        let mut entries = parse_listing(&html, &selector, &source.base_url);
        entries.truncate(limit);
        tracing::info!(
            url = %source.listing_url,
            count = entries.len(),
            unlinked = entries.iter().filter(|e| e.url.is_none()).count(),
            "parsed listing page"
        );
        Ok(entries)
    }

    /// Fetches the listing page, then each listed article.
    ///
    /// Up to `max_concurrent` article pages are in flight at once (`1` fetches
    /// sequentially). The returned articles are always in listing order. An
    /// article whose page fails to load, or whose anchor has no usable link,
    /// keeps its title and gets an empty body.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError`] only for listing-level failures, or an invalid
    /// body selector.
    pub async fn fetch_articles(
        &self,
        source: &NewsSource,
        limit: usize,
        max_concurrent: usize,
    ) -> Result<ArticleBatch, ScraperError> {
        let body_selector = parse_selector(&source.body_selector)?;
        let entries = self.fetch_listing(source, limit).await?;

        let results: Vec<(Article, bool)> = stream::iter(entries)
            .map(|entry| self.fetch_article(entry, &body_selector))
            .buffered(max_concurrent.max(1))
            .collect()
            .await;

        let degraded = results.iter().filter(|(_, ok)| !ok).count();
        let articles: Vec<Article> = results.into_iter().map(|(article, _)| article).collect();

        if degraded > 0 {
            tracing::warn!(
                degraded,
                total = articles.len(),
                "some article pages could not be fetched"
            );
        }

        Ok(ArticleBatch { articles, degraded })
    }

    /// Returns the article and whether its page was fetched successfully.
    async fn fetch_article(&self, entry: ListingEntry, body_selector: &Selector) -> (Article, bool) {
        let ListingEntry { url, title } = entry;
        let Some(url) = url else {
            tracing::warn!(title = %title, "listing anchor has no usable link, continuing with empty body");
            return (
                Article {
                    url: String::new(),
                    title,
                    body: String::new(),
                },
                false,
            );
        };

        match self.fetch_page(&url, self.article_timeout).await {
            Ok(html) => {
                let body = parse_article_body(&html, body_selector);
                tracing::debug!(url = %url, bytes = body.len(), "fetched article");
                (Article { url, title, body }, true)
            }
            Err(e) => {
                tracing::warn!(
                    url = %url,
                    error = %e,
                    "article fetch failed, continuing with empty body"
                );
                (
                    Article {
                        url,
                        title,
                        body: String::new(),
                    },
                    false,
                )
            }
        }
    }
}
