//! Receipts and credit notes.
//!
//! One table per document kind. A confirmed payment owns one live receipt
//! and a confirmed refund one live credit note; cancelling the transaction
//! flips that document to cancelled but keeps its number.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, Set};
use tracing::info;
use uuid::Uuid;

use tourbook_core::numbering::{DocumentNumber, Period};
use tourbook_core::transaction::TransactionKind;

use crate::entities::{
    credit_notes, customer_transactions, receipts, sea_orm_active_enums::DocumentStatus,
};

use super::error::EngineError;
use super::sequence::SequenceRepository;

/// A live receipt or credit note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedDocument {
    /// Document row id.
    pub id: Uuid,
    /// Printed number.
    pub document_number: String,
    /// Amount printed on the document.
    pub amount: Decimal,
}

impl From<receipts::Model> for IssuedDocument {
    fn from(m: receipts::Model) -> Self {
        Self {
            id: m.id,
            document_number: m.document_number,
            amount: m.amount,
        }
    }
}

impl From<credit_notes::Model> for IssuedDocument {
    fn from(m: credit_notes::Model) -> Self {
        Self {
            id: m.id,
            document_number: m.document_number,
            amount: m.amount,
        }
    }
}

/// Issues the document for a transaction being confirmed.
pub(crate) async fn issue(
    txn: &DatabaseTransaction,
    transaction: &customer_transactions::Model,
    period: Period,
) -> Result<DocumentNumber, EngineError> {
    let kind = TransactionKind::from(transaction.transaction_kind);
    let now: DateTimeWithTimeZone = Utc::now().into();

    let number = match kind {
        TransactionKind::Payment => {
            SequenceRepository::insert_with_number(
                txn,
                kind.document_type(),
                period,
                |number: String| {
                    receipts::ActiveModel {
                        id: Set(Uuid::now_v7()),
                        document_number: Set(number),
                        transaction_id: Set(transaction.id),
                        invoice_id: Set(transaction.invoice_id),
                        quotation_id: Set(transaction.quotation_id),
                        amount: Set(transaction.amount),
                        status: Set(DocumentStatus::Issued),
                        issued_at: Set(now),
                        cancelled_at: Set(None),
                        created_at: Set(now),
                        updated_at: Set(now),
                    }
                },
            )
            .await?
            .1
        }
        TransactionKind::Refund => {
            SequenceRepository::insert_with_number(
                txn,
                kind.document_type(),
                period,
                |number: String| {
                    credit_notes::ActiveModel {
                        id: Set(Uuid::now_v7()),
                        document_number: Set(number),
                        transaction_id: Set(transaction.id),
                        invoice_id: Set(transaction.invoice_id),
                        quotation_id: Set(transaction.quotation_id),
                        amount: Set(transaction.amount),
                        status: Set(DocumentStatus::Issued),
                        issued_at: Set(now),
                        cancelled_at: Set(None),
                        created_at: Set(now),
                        updated_at: Set(now),
                    }
                },
            )
            .await?
            .1
        }
    };

    info!(
        transaction_id = %transaction.id,
        invoice_id = %transaction.invoice_id,
        document_number = %number,
        "Issued document"
    );
    Ok(number)
}

/// Cancels the live document of a transaction. Returns how many rows changed.
pub(crate) async fn cancel_issued(
    txn: &DatabaseTransaction,
    kind: TransactionKind,
    transaction_id: Uuid,
) -> Result<u64, EngineError> {
    let now: DateTimeWithTimeZone = Utc::now().into();
    let rows = match kind {
        TransactionKind::Payment => {
            receipts::Entity::update_many()
                .set(receipts::ActiveModel {
                    status: Set(DocumentStatus::Cancelled),
                    cancelled_at: Set(Some(now)),
                    updated_at: Set(now),
                    ..Default::default()
                })
                .filter(receipts::Column::TransactionId.eq(transaction_id))
                .filter(receipts::Column::Status.eq(DocumentStatus::Issued))
                .exec(txn)
                .await?
                .rows_affected
        }
        TransactionKind::Refund => {
            credit_notes::Entity::update_many()
                .set(credit_notes::ActiveModel {
                    status: Set(DocumentStatus::Cancelled),
                    cancelled_at: Set(Some(now)),
                    updated_at: Set(now),
                    ..Default::default()
                })
                .filter(credit_notes::Column::TransactionId.eq(transaction_id))
                .filter(credit_notes::Column::Status.eq(DocumentStatus::Issued))
                .exec(txn)
                .await?
                .rows_affected
        }
    };
    Ok(rows)
}

/// Rewrites the amount of the live document after a confirmed edit.
pub(crate) async fn set_amount(
    txn: &DatabaseTransaction,
    kind: TransactionKind,
    transaction_id: Uuid,
    amount: Decimal,
) -> Result<u64, EngineError> {
    let now: DateTimeWithTimeZone = Utc::now().into();
    let rows = match kind {
        TransactionKind::Payment => {
            receipts::Entity::update_many()
                .set(receipts::ActiveModel {
                    amount: Set(amount),
                    updated_at: Set(now),
                    ..Default::default()
                })
                .filter(receipts::Column::TransactionId.eq(transaction_id))
                .filter(receipts::Column::Status.eq(DocumentStatus::Issued))
                .exec(txn)
                .await?
                .rows_affected
        }
        TransactionKind::Refund => {
            credit_notes::Entity::update_many()
                .set(credit_notes::ActiveModel {
                    amount: Set(amount),
                    updated_at: Set(now),
                    ..Default::default()
                })
                .filter(credit_notes::Column::TransactionId.eq(transaction_id))
                .filter(credit_notes::Column::Status.eq(DocumentStatus::Issued))
                .exec(txn)
                .await?
                .rows_affected
        }
    };
    Ok(rows)
}

/// Loads the live document of a transaction, if any.
pub(crate) async fn find_issued<C: sea_orm::ConnectionTrait>(
    conn: &C,
    kind: TransactionKind,
    transaction_id: Uuid,
) -> Result<Option<IssuedDocument>, EngineError> {
    let doc = match kind {
        TransactionKind::Payment => receipts::Entity::find()
            .filter(receipts::Column::TransactionId.eq(transaction_id))
            .filter(receipts::Column::Status.eq(DocumentStatus::Issued))
            .one(conn)
            .await?
            .map(IssuedDocument::from),
        TransactionKind::Refund => credit_notes::Entity::find()
            .filter(credit_notes::Column::TransactionId.eq(transaction_id))
            .filter(credit_notes::Column::Status.eq(DocumentStatus::Issued))
            .one(conn)
            .await?
            .map(IssuedDocument::from),
    };
    Ok(doc)
}
