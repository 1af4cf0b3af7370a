use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Outbound mail relay settings. Only the mailer ever reads these.
#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// `From` address; defaults to `username` when not configured.
    pub from: String,
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .field("from", &self.from)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub listing_url: String,
    pub base_url: String,
    pub listing_selector: String,
    pub body_selector: String,
    pub article_limit: usize,
    pub listing_timeout_secs: u64,
    pub article_timeout_secs: u64,
    pub user_agent: String,
    pub max_concurrent_articles: usize,
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
    pub top_n: usize,
    pub source_label: String,
    pub report_path: PathBuf,
    pub prices_path: Option<PathBuf>,
    pub run_timeout_secs: u64,
    pub smtp: Option<SmtpConfig>,
}
