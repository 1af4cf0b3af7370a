use crate::app_config::{AppConfig, Environment, SmtpConfig};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid or SMTP settings are incomplete.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid or SMTP settings are incomplete.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can feed a plain `HashMap`.
#[allow(clippy::too_many_lines)]
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u16 = |var: &str, default: &str| -> Result<u16, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u16>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("STOCKSIGNAL_ENV", "development"))?;
    let bind_addr = parse("STOCKSIGNAL_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("STOCKSIGNAL_LOG_LEVEL", "info");

    let listing_url = or_default(
        "STOCKSIGNAL_LISTING_URL",
        "https://cafef.vn/tai-chinh-chung-khoan.chn",
    );
    let base_url = or_default("STOCKSIGNAL_BASE_URL", "https://cafef.vn");
    let listing_selector = or_default("STOCKSIGNAL_LISTING_SELECTOR", "h3.title-news a");
    let body_selector = or_default("STOCKSIGNAL_BODY_SELECTOR", "div.contentdetail > p");

    let article_limit = parse_usize("STOCKSIGNAL_ARTICLE_LIMIT", "20")?;
    let listing_timeout_secs = parse_u64("STOCKSIGNAL_LISTING_TIMEOUT_SECS", "15")?;
    let article_timeout_secs = parse_u64("STOCKSIGNAL_ARTICLE_TIMEOUT_SECS", "10")?;
    if article_timeout_secs == 0 || article_timeout_secs >= listing_timeout_secs {
        return Err(ConfigError::InvalidEnvVar {
            var: "STOCKSIGNAL_ARTICLE_TIMEOUT_SECS".to_string(),
            reason: format!(
                "must be non-zero and shorter than the listing timeout ({listing_timeout_secs}s)"
            ),
        });
    }

    let user_agent = or_default("STOCKSIGNAL_USER_AGENT", "stocksignal/0.1 (news-sentiment)");
    let max_concurrent_articles = parse_usize("STOCKSIGNAL_MAX_CONCURRENT_ARTICLES", "1")?;
    let max_retries = parse_u32("STOCKSIGNAL_MAX_RETRIES", "0")?;
    let retry_backoff_base_secs = parse_u64("STOCKSIGNAL_RETRY_BACKOFF_BASE_SECS", "1")?;

    let top_n = parse_usize("STOCKSIGNAL_TOP_N", "10")?;
    let source_label = or_default("STOCKSIGNAL_SOURCE_LABEL", "CafeF");
    let report_path = PathBuf::from(or_default(
        "STOCKSIGNAL_REPORT_PATH",
        "./stock_sentiment.csv",
    ));
    let prices_path = lookup("STOCKSIGNAL_PRICES_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);
    let run_timeout_secs = parse_u64("STOCKSIGNAL_RUN_TIMEOUT_SECS", "300")?;

    let smtp = match lookup("STOCKSIGNAL_SMTP_HOST") {
        Ok(host) if !host.trim().is_empty() => {
            let username = require("STOCKSIGNAL_SMTP_USERNAME")?;
            let password = require("STOCKSIGNAL_SMTP_PASSWORD")?;
            let port = parse_u16("STOCKSIGNAL_SMTP_PORT", "587")?;
            let from = or_default("STOCKSIGNAL_SMTP_FROM", &username);
            Some(SmtpConfig {
                host,
                port,
                username,
                password,
                from,
            })
        }
        _ => None,
    };

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        listing_url,
        base_url,
        listing_selector,
        body_selector,
        article_limit,
        listing_timeout_secs,
        article_timeout_secs,
        user_agent,
        max_concurrent_articles,
        max_retries,
        retry_backoff_base_secs,
        top_n,
        source_label,
        report_path,
        prices_path,
        run_timeout_secs,
        smtp,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "STOCKSIGNAL_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}
