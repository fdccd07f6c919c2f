//! Gateway events and the commands they map to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tourbook_shared::types::TransactionId;

use crate::webhook::error::WebhookError;

/// Event name for a completed charge.
pub const CHARGE_COMPLETE: &str = "charge.complete";
/// Event name for a failed charge.
pub const CHARGE_FAILED: &str = "charge.failed";
/// Event name for an expired charge.
pub const CHARGE_EXPIRED: &str = "charge.expired";

/// Envelope delivered by the payment gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayEvent {
    /// Event name, e.g. `charge.complete`.
    pub event: String,
    /// Charge payload.
    pub data: ChargeData,
}

/// Charge details carried by an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeData {
    /// Gateway charge id.
    pub id: String,
    /// Gateway-side status string.
    #[serde(default)]
    pub status: Option<String>,
    /// Our references attached when the charge was created.
    #[serde(default)]
    pub metadata: ChargeMetadata,
    /// When the charge was paid.
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
    /// Failure description for failed charges.
    #[serde(default)]
    pub failure_message: Option<String>,
}

/// Metadata echoed back by the gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeMetadata {
    /// Transaction the charge pays for.
    #[serde(default)]
    pub transaction_id: Option<TransactionId>,
}

impl GatewayEvent {
    /// Decodes a raw webhook body.
    pub fn parse(body: &[u8]) -> Result<Self, WebhookError> {
        serde_json::from_slice(body).map_err(|e| WebhookError::MalformedPayload(e.to_string()))
    }
}

/// State-machine command derived from an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileCommand {
    /// Confirm the pending transaction.
    Confirm {
        /// Transaction to confirm.
        transaction_id: TransactionId,
        /// Gateway charge id, stored as the payment reference.
        charge_id: String,
        /// When the gateway says the charge was paid.
        paid_at: Option<DateTime<Utc>>,
    },
    /// Cancel the transaction.
    Cancel {
        /// Transaction to cancel.
        transaction_id: TransactionId,
        /// Cancellation reason recorded on the transaction.
        reason: String,
    },
    /// Event that does not move any transaction.
    Ignore {
        /// Event name, for logging.
        event: String,
    },
}

impl ReconcileCommand {
    /// Maps a gateway event to a command.
    ///
    /// Charge events without a transaction reference are malformed; events
    /// of any other name are ignored.
    pub fn from_event(event: &GatewayEvent) -> Result<Self, WebhookError> {
        let transaction_id = || {
            event.data.metadata.transaction_id.ok_or_else(|| {
                WebhookError::MalformedPayload("metadata.transactionId is missing".into())
            })
        };

        match event.event.as_str() {
            CHARGE_COMPLETE => Ok(Self::Confirm {
                transaction_id: transaction_id()?,
                charge_id: event.data.id.clone(),
                paid_at: event.data.paid_at,
            }),
            CHARGE_FAILED => {
                let message = event
                    .data
                    .failure_message
                    .as_deref()
                    .map(str::trim)
                    .filter(|m| !m.is_empty())
                    .unwrap_or("unknown");
                Ok(Self::Cancel {
                    transaction_id: transaction_id()?,
                    reason: format!("failure: {message}"),
                })
            }
            CHARGE_EXPIRED => Ok(Self::Cancel {
                transaction_id: transaction_id()?,
                reason: "expired".to_string(),
            }),
            other => Ok(Self::Ignore {
                event: other.to_string(),
            }),
        }
    }

    /// Transaction targeted by the command, if any.
    #[must_use]
    pub fn transaction_id(&self) -> Option<TransactionId> {
        match self {
            Self::Confirm { transaction_id, .. } | Self::Cancel { transaction_id, .. } => {
                Some(*transaction_id)
            }
            Self::Ignore { .. } => None,
        }
    }
}

/// Result of applying a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileOutcome {
    /// The transition was applied now.
    Applied,
    /// An earlier delivery already moved the transaction.
    AlreadyApplied,
    /// Nothing to do for this event.
    Ignored,
}

impl ReconcileOutcome {
    /// Returns the string representation of the outcome.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::AlreadyApplied => "already_applied",
            Self::Ignored => "ignored",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(event: &str, extra: &str) -> String {
        format!(
            r#"{{"event":"{event}","data":{{"id":"chrg_1","status":"x","metadata":{{"transactionId":"0190c3c4-5b6a-7c8d-9e0f-112233445566"}}{extra}}}}}"#
        )
    }

    fn parse(event: &str, extra: &str) -> ReconcileCommand {
        let event = GatewayEvent::parse(body(event, extra).as_bytes()).unwrap();
        ReconcileCommand::from_event(&event).unwrap()
    }

    #[test]
    fn test_charge_complete_confirms() {
        let cmd = parse(CHARGE_COMPLETE, r#","paidAt":"2026-01-15T10:00:00Z""#);
        match cmd {
            ReconcileCommand::Confirm {
                charge_id, paid_at, ..
            } => {
                assert_eq!(charge_id, "chrg_1");
                assert!(paid_at.is_some());
            }
            other => panic!("expected confirm, got {other:?}"),
        }
    }

    #[test]
    fn test_charge_failed_cancels_with_message() {
        let cmd = parse(CHARGE_FAILED, r#","failureMessage":"insufficient funds""#);
        assert!(matches!(
            cmd,
            ReconcileCommand::Cancel { ref reason, .. } if reason == "failure: insufficient funds"
        ));
    }

    #[test]
    fn test_charge_expired_cancels() {
        let cmd = parse(CHARGE_EXPIRED, "");
        assert!(matches!(
            cmd,
            ReconcileCommand::Cancel { ref reason, .. } if reason == "expired"
        ));
        assert!(cmd.transaction_id().is_some());
    }

    #[test]
    fn test_unrelated_event_is_ignored() {
        let cmd = parse("refund.created", "");
        assert_eq!(
            cmd,
            ReconcileCommand::Ignore {
                event: "refund.created".into()
            }
        );
        assert_eq!(cmd.transaction_id(), None);
    }

    #[test]
    fn test_missing_transaction_reference_is_malformed() {
        let raw = br#"{"event":"charge.complete","data":{"id":"chrg_1"}}"#;
        let event = GatewayEvent::parse(raw).unwrap();
        assert!(matches!(
            ReconcileCommand::from_event(&event),
            Err(WebhookError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_garbage_body_is_malformed() {
        assert!(matches!(
            GatewayEvent::parse(b"not json"),
            Err(WebhookError::MalformedPayload(_))
        ));
    }
}
