//! HTTP client for news listing and article pages.

mod fetch_all;

use std::time::Duration;

use reqwest::Client;

use crate::error::ScraperError;
use crate::rate_limit::retry_with_backoff;

/// Cap on connect time; the per-request timeout still bounds the whole request.
const MAX_CONNECT_TIMEOUT_SECS: u64 = 10;

/// HTTP client for a news site.
///
/// Listing and article requests carry separate timeouts; the article timeout
/// is the tighter one. Transient errors (429, network failures) are retried
/// with exponential backoff up to `max_retries` additional attempts.
pub struct NewsClient {
    client: Client,
    listing_timeout: Duration,
    article_timeout: Duration,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl NewsClient {
    /// Creates a `NewsClient` with the given timeouts, `User-Agent` and retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        listing_timeout_secs: u64,
        article_timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(
                article_timeout_secs.min(MAX_CONNECT_TIMEOUT_SECS),
            ))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            listing_timeout: Duration::from_secs(listing_timeout_secs),
            article_timeout: Duration::from_secs(article_timeout_secs),
            max_retries,
            backoff_base_secs,
        })
    }

    /// Builds a client from the application config.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the HTTP client cannot be constructed.
    pub fn from_app_config(config: &stocksignal_core::AppConfig) -> Result<Self, ScraperError> {
        Self::new(
            config.listing_timeout_secs,
            config.article_timeout_secs,
            &config.user_agent,
            config.max_retries,
            config.retry_backoff_base_secs,
        )
    }

    /// GETs `url` and returns the body text, with retry on transient errors.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::RateLimited`]: HTTP 429 after all retries.
    /// - [`ScraperError::UnexpectedStatus`]: any other non-2xx status.
    /// - [`ScraperError::Http`]: network failure or timeout after all retries.
    async fn fetch_page(&self, url: &str, timeout: Duration) -> Result<String, ScraperError> {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || async move {
            let response = self
                .client
                .get(url)
                .timeout(timeout)
                .header(
                    reqwest::header::ACCEPT,
                    "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8",
                )
                .header(reqwest::header::ACCEPT_LANGUAGE, "vi-VN,vi;q=0.9,en;q=0.8")
                .send()
                .await?;
            let status = response.status();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                let retry_after_secs = response
                    .headers()
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(60);
                return Err(ScraperError::RateLimited {
                    url: url.to_owned(),
                    retry_after_secs,
                });
            }

            if !status.is_success() {
                return Err(ScraperError::UnexpectedStatus {
                    status: status.as_u16(),
                    url: url.to_owned(),
                });
            }

            Ok(response.text().await?)
        })
        .await
    }
}
