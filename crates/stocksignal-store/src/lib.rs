//! File-backed persistence for sentiment reports and price datasets.

pub mod error;
pub mod prices;
pub mod report_store;

pub use error::StoreError;
pub use prices::{load_price_quotes, parse_price};
pub use report_store::ReportStore;
