use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("listing fetch failed: {0}")]
    Listing(#[from] stocksignal_scraper::ScraperError),
}
