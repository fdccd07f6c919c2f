//! Error to HTTP response mapping.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{error, warn};

use tourbook_core::webhook::WebhookError;
use tourbook_db::EngineError;
use tourbook_shared::AppError;

/// Handler error rendered as `{"error": <code>, "message": <text>}`.
///
/// Engine and webhook failures keep their own codes (`EXCEEDS_REMAINING`,
/// `INVALID_SIGNATURE`, ...) instead of the generic application code.
#[derive(Debug)]
pub struct ApiError {
    status: u16,
    code: &'static str,
    error: AppError,
}

impl ApiError {
    /// Returns the HTTP status code of the response.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        self.status
    }

    /// Returns the error code placed in the response body.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        self.code
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // Internal details stay in the log.
        let message = if status.is_server_error() {
            error!(error = %self.error, code = self.code, "Request failed");
            "An error occurred".to_string()
        } else {
            warn!(error = %self.error, code = self.code, "Request rejected");
            self.error.to_string()
        };

        (
            status,
            Json(json!({
                "error": self.code,
                "message": message
            })),
        )
            .into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(error: AppError) -> Self {
        Self {
            status: error.status_code(),
            code: error.error_code(),
            error,
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        Self {
            status: err.status_code(),
            code: err.error_code(),
            error: err.into(),
        }
    }
}

impl From<WebhookError> for ApiError {
    fn from(err: WebhookError) -> Self {
        Self {
            status: err.status_code(),
            code: err.error_code(),
            error: err.into(),
        }
    }
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use tourbook_core::numbering::{DocumentType, NumberingError};
    use tourbook_core::transaction::{TransactionError, TransactionStatus};
    use tourbook_shared::Amount;
    use tourbook_shared::types::InvoiceId;

    async fn render(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_conflict_rendering() {
        let err: ApiError = EngineError::from(TransactionError::InvalidTransition {
            from: TransactionStatus::Cancelled,
            to: TransactionStatus::Confirmed,
        })
        .into();
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "INVALID_TRANSITION");
    }

    #[tokio::test]
    async fn test_validation_errors_keep_their_codes() {
        let err: ApiError = EngineError::from(TransactionError::ExceedsRemaining {
            amount: Amount::from_minor(1),
            remaining: Amount::ZERO,
        })
        .into();
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "EXCEEDS_REMAINING");
        assert_eq!(
            body["message"],
            "Validation error: Amount 0.01 exceeds remaining balance 0.00"
        );

        let (status, body) =
            render(EngineError::from(TransactionError::RefundReasonRequired).into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "REFUND_REASON_REQUIRED");
    }

    #[tokio::test]
    async fn test_allocation_conflict_is_retryable() {
        let err: ApiError = EngineError::from(NumberingError::AllocationConflict {
            doc_type: DocumentType::Receipt,
        })
        .into();
        assert_eq!(err.status_code(), 503);
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "ALLOCATION_CONFLICT");
        assert_eq!(body["message"], "An error occurred");
    }

    #[tokio::test]
    async fn test_tax_invoice_conflict_code() {
        let err: ApiError = EngineError::TaxInvoiceAlreadyIssued(InvoiceId::new()).into();
        assert_eq!(err.error_code(), "TAX_INVOICE_ALREADY_ISSUED");
        assert_eq!(err.status_code(), 409);
    }

    #[tokio::test]
    async fn test_server_errors_hide_details() {
        let err = ApiError::from(AppError::Database("connection reset by peer".into()));
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "An error occurred");
    }

    #[tokio::test]
    async fn test_signature_rendering() {
        let (status, body) = render(WebhookError::InvalidSignature.into()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "INVALID_SIGNATURE");
    }
}
