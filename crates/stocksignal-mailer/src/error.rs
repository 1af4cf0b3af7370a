#[derive(Debug, thiserror::Error)]
pub enum MailerError {
    #[error("invalid recipient address: {0:?}")]
    InvalidRecipient(String),

    #[error("invalid sender address {address:?}: {reason}")]
    InvalidSender { address: String, reason: String },

    #[error("failed to build message: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}
