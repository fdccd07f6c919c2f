//! Reconciliation engine logic for Tourbook.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! The db crate executes these rules inside database transactions.
//!
//! # Modules
//!
//! - `ledger` - Invoice balance aggregates and status derivation
//! - `numbering` - Period-scoped document numbers
//! - `transaction` - Payment/refund state machine
//! - `webhook` - Payment-gateway signature checks and event mapping

pub mod ledger;
pub mod numbering;
pub mod transaction;
pub mod webhook;
