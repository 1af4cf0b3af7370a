//! HTML parsing for listing and article pages.

use scraper::{Html, Selector};

use crate::error::ScraperError;
use crate::types::ListingEntry;
use crate::urls::resolve_article_url;

/// Compile a CSS selector, mapping failures to [`ScraperError::InvalidSelector`].
///
/// # Errors
///
/// Returns [`ScraperError::InvalidSelector`] if `raw` is not a valid selector.
pub fn parse_selector(raw: &str) -> Result<Selector, ScraperError> {
    Selector::parse(raw).map_err(|e| ScraperError::InvalidSelector {
        selector: raw.to_string(),
        reason: e.to_string(),
    })
}

/// Extract every anchor matching `selector` from a listing page, in
/// document order.
///
/// An anchor whose `href` is missing or cannot be resolved is kept with
/// `url: None` so it still occupies its slot in the listing.
#[must_use]
pub fn parse_listing(html: &str, selector: &Selector, base_url: &str) -> Vec<ListingEntry> {
    let document = Html::parse_document(html);

    document
        .select(selector)
        .map(|element| {
            let href = element.value().attr("href");
            let url = href.and_then(|href| resolve_article_url(href, base_url));
            if url.is_none() {
                tracing::debug!(href = href.unwrap_or_default(), "listing anchor has no usable link");
            }
            ListingEntry {
                url,
                title: element.text().collect::<String>().trim().to_string(),
            }
        })
        .collect()
}

/// Extract the article body: the text of every element matching `selector`,
/// joined by single spaces.
#[must_use]
pub fn parse_article_body(html: &str, selector: &Selector) -> String {
    let document = Html::parse_document(html);
    document
        .select(selector)
        .map(|element| element.text().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}
