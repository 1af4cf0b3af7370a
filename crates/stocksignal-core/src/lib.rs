//! Shared data model and configuration for the stocksignal workspace.

pub mod app_config;
pub mod config;
pub mod report;

use thiserror::Error;

pub use app_config::{AppConfig, Environment, SmtpConfig};
pub use config::{load_app_config, load_app_config_from_env};
pub use report::{
    Article, ChangePercent, PriceQuote, Recommendation, Report, ReportFilter, ReportRow,
    SentimentLabel, REPORT_COLUMNS,
};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid recommendation: {0}")]
    InvalidRecommendation(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
