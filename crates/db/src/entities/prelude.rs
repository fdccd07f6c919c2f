//! Entity re-exports.

pub use super::credit_notes::Entity as CreditNotes;
pub use super::customer_transactions::Entity as CustomerTransactions;
pub use super::document_sequences::Entity as DocumentSequences;
pub use super::invoices::Entity as Invoices;
pub use super::quotations::Entity as Quotations;
pub use super::receipts::Entity as Receipts;
pub use super::wholesale_transactions::Entity as WholesaleTransactions;
