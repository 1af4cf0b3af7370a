//! Validating a recipient and sending the report to it.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use stocksignal_core::Report;

use crate::error::MailerError;
use crate::render::{render_html, render_plain, report_subject};
use crate::transport::{MailTransport, OutgoingEmail};

static RECIPIENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid recipient regex"));

/// Check that `raw` has the `local@domain.tld` shape. Returns the trimmed address.
///
/// # Errors
///
/// Returns [`MailerError::InvalidRecipient`] otherwise.
pub fn validate_recipient(raw: &str) -> Result<&str, MailerError> {
    let trimmed = raw.trim();
    if RECIPIENT_RE.is_match(trimmed) {
        Ok(trimmed)
    } else {
        Err(MailerError::InvalidRecipient(raw.to_string()))
    }
}

/// What happened to one delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryOutcome {
    pub delivered: bool,
    pub message: String,
}

/// Email `report` to `recipient`.
///
/// Never fails: an invalid recipient or a transport error comes back as an
/// undelivered outcome. The transport is not touched for invalid recipients.
pub async fn send_report(
    transport: &dyn MailTransport,
    report: &Report,
    recipient: &str,
) -> DeliveryOutcome {
    let to = match validate_recipient(recipient) {
        Ok(to) => to,
        Err(e) => {
            tracing::warn!(recipient, "rejected email recipient");
            return DeliveryOutcome {
                delivered: false,
                message: e.to_string(),
            };
        }
    };

    let email = OutgoingEmail {
        to: to.to_string(),
        subject: report_subject(report),
        text_body: render_plain(report),
        html_body: render_html(report),
    };

    match transport.send(&email).await {
        Ok(()) => {
            tracing::info!(recipient = to, rows = report.len(), "report emailed");
            DeliveryOutcome {
                delivered: true,
                message: format!("report sent to {to}"),
            }
        }
        Err(e) => {
            tracing::error!(recipient = to, error = %e, "report email failed");
            DeliveryOutcome {
                delivered: false,
                message: format!("failed to send report to {to}: {e}"),
            }
        }
    }
}
