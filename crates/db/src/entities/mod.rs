//! `SeaORM` entity definitions.

pub mod prelude;

pub mod credit_notes;
pub mod customer_transactions;
pub mod document_sequences;
pub mod invoices;
pub mod quotations;
pub mod receipts;
pub mod sea_orm_active_enums;
pub mod wholesale_transactions;
