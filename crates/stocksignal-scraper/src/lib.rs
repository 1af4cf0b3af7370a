//! News article source adapter.
//!
//! Fetches a listing page, resolves the article links it enumerates and
//! downloads each article body. Per-article failures degrade that article to
//! an empty body; a listing failure fails the whole fetch.

pub mod client;
pub mod error;
pub mod parse;
pub mod types;
pub mod urls;

mod rate_limit;

pub use client::NewsClient;
pub use error::ScraperError;
pub use types::{ArticleBatch, ListingEntry, NewsSource};
