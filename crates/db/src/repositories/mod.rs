//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod clock;
mod document;
pub mod error;
pub mod invoice;
pub mod reconciliation;
pub mod sequence;
pub mod transaction;
pub mod wholesale;

pub use clock::BusinessClock;
pub use document::IssuedDocument;
pub use error::EngineError;
pub use invoice::{CreateInvoiceInput, InvoiceRepository};
pub use reconciliation::ReconciliationRepository;
pub use sequence::SequenceRepository;
pub use transaction::{
    CreateTransactionInput, EditTransactionInput, GatewayConfirmation, TransactionOutcome,
    TransactionRepository,
};
pub use wholesale::{CreateWholesaleInput, EditWholesaleInput, WholesaleTransactionRepository};
