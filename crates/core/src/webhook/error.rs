//! Webhook error types.

use thiserror::Error;
use tourbook_shared::AppError;

/// Errors raised while authenticating or decoding a webhook delivery.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WebhookError {
    /// No signature header on the request.
    #[error("Missing webhook signature")]
    MissingSignature,

    /// Signature does not match the body.
    #[error("Invalid webhook signature")]
    InvalidSignature,

    /// Body is not a gateway event.
    #[error("Malformed webhook payload: {0}")]
    MalformedPayload(String),
}

impl WebhookError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingSignature | Self::InvalidSignature => 401,
            Self::MalformedPayload(_) => 400,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingSignature => "MISSING_SIGNATURE",
            Self::InvalidSignature => "INVALID_SIGNATURE",
            Self::MalformedPayload(_) => "MALFORMED_PAYLOAD",
        }
    }

    /// True for payload problems that are logged and acknowledged so the
    /// provider does not keep redelivering them.
    #[must_use]
    pub fn is_acknowledged(&self) -> bool {
        matches!(self, Self::MalformedPayload(_))
    }
}

impl From<WebhookError> for AppError {
    fn from(err: WebhookError) -> Self {
        match err {
            WebhookError::MissingSignature | WebhookError::InvalidSignature => {
                Self::Unauthorized(err.to_string())
            }
            WebhookError::MalformedPayload(_) => Self::ExternalService(err.to_string()),
        }
    }
}
