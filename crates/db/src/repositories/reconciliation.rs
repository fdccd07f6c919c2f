//! Payment-gateway reconciliation.
//!
//! Applies commands decoded from verified webhook deliveries. Gateways
//! redeliver, so every command is idempotent: a transaction that has
//! already left `PENDING` is reported as `AlreadyApplied` and nothing is
//! written twice.

use sea_orm::DatabaseConnection;
use tracing::{info, warn};

use tourbook_core::transaction::{Actor, TransactionError};
use tourbook_core::webhook::{ReconcileCommand, ReconcileOutcome};

use super::clock::BusinessClock;
use super::error::EngineError;
use super::transaction::{GatewayConfirmation, TransactionRepository};

/// Applies gateway commands to customer transactions.
#[derive(Debug, Clone)]
pub struct ReconciliationRepository {
    transactions: TransactionRepository,
}

impl ReconciliationRepository {
    /// Creates a new reconciliation repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            transactions: TransactionRepository::new(db),
        }
    }

    /// Dates gateway-issued documents on `clock`.
    #[must_use]
    pub fn with_clock(self, clock: BusinessClock) -> Self {
        Self {
            transactions: self.transactions.with_clock(clock),
        }
    }

    /// Applies one command.
    ///
    /// A failed or expired charge only cancels a pending transaction; a
    /// delivery arriving after the charge already completed is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound` for unknown transactions, or any
    /// ledger or database error raised while applying the transition.
    pub async fn reconcile(
        &self,
        command: ReconcileCommand,
    ) -> Result<ReconcileOutcome, EngineError> {
        let Some(transaction_id) = command.transaction_id() else {
            info!(command = ?command, "Ignoring gateway event");
            return Ok(ReconcileOutcome::Ignored);
        };

        let result = match command {
            ReconcileCommand::Confirm {
                charge_id, paid_at, ..
            } => {
                let gateway = GatewayConfirmation {
                    reference: Some(charge_id),
                    paid_on: paid_at.map(|at| at.date_naive()),
                };
                self.transactions
                    .confirm(transaction_id, Actor::Gateway, gateway)
                    .await
            }
            ReconcileCommand::Cancel { reason, .. } => {
                self.transactions
                    .cancel_pending(transaction_id, Actor::Gateway, Some(reason))
                    .await
            }
            ReconcileCommand::Ignore { .. } => return Ok(ReconcileOutcome::Ignored),
        };

        match result {
            Ok(outcome) => {
                info!(
                    transaction_id = %transaction_id,
                    status = ?outcome.transaction.status,
                    "Gateway event applied"
                );
                Ok(ReconcileOutcome::Applied)
            }
            Err(err) => match err.as_transaction_error() {
                Some(TransactionError::InvalidTransition { from, to }) => {
                    warn!(
                        transaction_id = %transaction_id,
                        from = %from,
                        to = %to,
                        "Gateway event already applied"
                    );
                    Ok(ReconcileOutcome::AlreadyApplied)
                }
                _ => Err(err),
            },
        }
    }
}
