//! Postgres enum types and their mapping to engine types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use tourbook_core::ledger::InvoiceStatus as CoreInvoiceStatus;
use tourbook_core::transaction::{
    TransactionKind as CoreTransactionKind, TransactionStatus as CoreTransactionStatus,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "invoice_status")]
pub enum InvoiceStatus {
    #[sea_orm(string_value = "issued")]
    Issued,
    #[sea_orm(string_value = "partial_paid")]
    PartialPaid,
    #[sea_orm(string_value = "paid")]
    Paid,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
    #[sea_orm(string_value = "voided")]
    Voided,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_status")]
pub enum TransactionStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_kind")]
pub enum TransactionKind {
    #[sea_orm(string_value = "payment")]
    Payment,
    #[sea_orm(string_value = "refund")]
    Refund,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "document_status")]
pub enum DocumentStatus {
    #[sea_orm(string_value = "issued")]
    Issued,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl From<InvoiceStatus> for CoreInvoiceStatus {
    fn from(status: InvoiceStatus) -> Self {
        match status {
            InvoiceStatus::Issued => Self::Issued,
            InvoiceStatus::PartialPaid => Self::PartialPaid,
            InvoiceStatus::Paid => Self::Paid,
            InvoiceStatus::Cancelled => Self::Cancelled,
            InvoiceStatus::Voided => Self::Voided,
        }
    }
}

impl From<CoreInvoiceStatus> for InvoiceStatus {
    fn from(status: CoreInvoiceStatus) -> Self {
        match status {
            CoreInvoiceStatus::Issued => Self::Issued,
            CoreInvoiceStatus::PartialPaid => Self::PartialPaid,
            CoreInvoiceStatus::Paid => Self::Paid,
            CoreInvoiceStatus::Cancelled => Self::Cancelled,
            CoreInvoiceStatus::Voided => Self::Voided,
        }
    }
}

impl From<TransactionStatus> for CoreTransactionStatus {
    fn from(status: TransactionStatus) -> Self {
        match status {
            TransactionStatus::Pending => Self::Pending,
            TransactionStatus::Confirmed => Self::Confirmed,
            TransactionStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<CoreTransactionStatus> for TransactionStatus {
    fn from(status: CoreTransactionStatus) -> Self {
        match status {
            CoreTransactionStatus::Pending => Self::Pending,
            CoreTransactionStatus::Confirmed => Self::Confirmed,
            CoreTransactionStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<TransactionKind> for CoreTransactionKind {
    fn from(kind: TransactionKind) -> Self {
        match kind {
            TransactionKind::Payment => Self::Payment,
            TransactionKind::Refund => Self::Refund,
        }
    }
}

impl From<CoreTransactionKind> for TransactionKind {
    fn from(kind: CoreTransactionKind) -> Self {
        match kind {
            CoreTransactionKind::Payment => Self::Payment,
            CoreTransactionKind::Refund => Self::Refund,
        }
    }
}
