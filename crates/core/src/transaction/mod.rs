//! Payment and refund transaction lifecycle.
//!
//! This module implements the transaction state machine shared by customer
//! and wholesale transactions:
//!
//! - `Pending → Confirmed` (confirm)
//! - `Pending → Cancelled` (cancel, no effects)
//! - `Confirmed → Cancelled` (cancel, effects reversed)
//!
//! # Modules
//!
//! - `types` - Transaction domain types (status, kind, actor, actions)
//! - `error` - Transaction-specific error types
//! - `service` - Validation and transition logic

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::TransactionError;
pub use service::TransactionService;
pub use types::{
    Actor, EditPlan, Party, TransactionKind, TransactionStatus, TransitionAction, UpdateAction,
};
