//! Ticker extraction and keyword sentiment pipeline.
//!
//! Reads fetched articles, pulls candidate tickers out of each one, labels
//! each article Buy / Sell / Undetermined by keyword, tallies articles per
//! ticker and direction, and builds the ranked report table.

pub mod aggregate;
pub mod classify;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod pricing;
pub mod rank;

pub use aggregate::{aggregate, ClassifiedArticle, SignalTallies, Tally};
pub use classify::classify;
pub use error::PipelineError;
pub use extract::extract_tickers;
pub use pipeline::{analyze, run_pipeline, PipelineOutcome, PipelineSettings, PipelineSummary};
pub use pricing::{apply_quotes, change_percent};
pub use rank::{build_report, rank, RankedEntry, ReportOptions};
