//! Retry schedule for page fetches.
//!
//! Only HTTP 429 and network-level failures (including timeouts) are retried.
//! With `base = backoff_base_secs`, the waits before successive retries are:
//!
//! | retry | wait                               |
//! |-------|------------------------------------|
//! | 1st   | `base`                             |
//! | 2nd   | `base * 2`                         |
//! | 3rd   | `base * 4`                         |
//! | n-th  | `base * 2^(n-1)`                   |
//!
//! A 429 whose `Retry-After` is longer than the scheduled wait is honoured,
//! capped at `MAX_RETRY_AFTER_SECS`.

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;

/// Longest `Retry-After` the client will sleep for.
const MAX_RETRY_AFTER_SECS: u64 = 30;

/// Wait before retry number `retry` (0-based) after `err`, or `None` if the
/// error is not transient.
fn retry_delay(err: &ScraperError, retry: u32, backoff_base_secs: u64) -> Option<Duration> {
    let scheduled = backoff_base_secs.saturating_mul(1u64 << retry.min(62));
    let secs = match err {
        ScraperError::RateLimited {
            retry_after_secs, ..
        } => scheduled.max((*retry_after_secs).min(MAX_RETRY_AFTER_SECS)),
        ScraperError::Http(_) => scheduled,
        _ => return None,
    };
    Some(Duration::from_secs(secs))
}

/// Runs `fetch`, retrying transient errors up to `max_retries` extra times.
/// `max_retries = 0` means a single attempt.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut fetch: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    for retry in 0..max_retries {
        let err = match fetch().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        let Some(delay) = retry_delay(&err, retry, backoff_base_secs) else {
            return Err(err);
        };
        tracing::warn!(
            retry = retry + 1,
            max_retries,
            delay_secs = delay.as_secs(),
            error = %err,
            "transient fetch error, backing off"
        );
        tokio::time::sleep(delay).await;
    }
    fetch().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn rate_limited() -> ScraperError {
        ScraperError::RateLimited {
            url: "https://cafef.vn/tai-chinh-chung-khoan.chn".to_owned(),
            retry_after_secs: 0,
        }
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(3, 0, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, ScraperError>(42)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_on_rate_limited_then_succeeds() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(3, 0, || {
            let cc = Arc::clone(&cc);
            async move {
                let n = cc.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(rate_limited())
                } else {
                    Ok::<u32, ScraperError>(99)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 99);
        assert_eq!(call_count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn zero_retries_runs_once() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(0, 0, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Err::<u32, ScraperError>(rate_limited())
            }
        })
        .await;
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(ScraperError::RateLimited { .. })));
    }

    #[test]
    fn schedule_doubles_from_base() {
        let err = ScraperError::RateLimited {
            url: String::new(),
            retry_after_secs: 0,
        };
        let waits: Vec<u64> = (0..4)
            .map(|retry| retry_delay(&err, retry, 2).unwrap().as_secs())
            .collect();
        assert_eq!(waits, [2, 4, 8, 16]);
    }

    #[test]
    fn retry_after_is_a_capped_floor() {
        let err = |retry_after_secs| ScraperError::RateLimited {
            url: String::new(),
            retry_after_secs,
        };
        assert_eq!(retry_delay(&err(5), 0, 1), Some(Duration::from_secs(5)));
        assert_eq!(retry_delay(&err(5), 3, 1), Some(Duration::from_secs(8)));
        assert_eq!(
            retry_delay(&err(600), 0, 1),
            Some(Duration::from_secs(MAX_RETRY_AFTER_SECS))
        );
    }

    #[test]
    fn non_transient_errors_have_no_delay() {
        let err = ScraperError::UnexpectedStatus {
            status: 404,
            url: String::new(),
        };
        assert_eq!(retry_delay(&err, 0, 1), None);
    }

    #[tokio::test]
    async fn does_not_retry_unexpected_status() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(3, 0, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Err::<u32, ScraperError>(ScraperError::UnexpectedStatus {
                    status: 404,
                    url: "https://cafef.vn/missing.chn".to_owned(),
                })
            }
        })
        .await;
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
        assert!(matches!(
            result,
            Err(ScraperError::UnexpectedStatus { status: 404, .. })
        ));
    }
}
