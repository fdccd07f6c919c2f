//! Invoice balance ledger.
//!
//! This module owns the monetary aggregate of an invoice:
//! - Invoice status and balance types
//! - The single mutation entry point (`InvoiceLedger::apply`)
//! - Status derivation from aggregates
//! - Error types for ledger operations

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::LedgerError;
pub use service::InvoiceLedger;
pub use types::{EntryKind, InvoiceBalance, InvoiceStatus, LedgerDelta};
