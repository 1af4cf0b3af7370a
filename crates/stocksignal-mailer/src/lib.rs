//! Report delivery by email.

pub mod delivery;
pub mod error;
pub mod render;
pub mod transport;

pub use delivery::{send_report, validate_recipient, DeliveryOutcome};
pub use error::MailerError;
pub use render::{render_html, render_plain, report_subject};
pub use transport::{MailTransport, OutgoingEmail, SmtpMailer};
