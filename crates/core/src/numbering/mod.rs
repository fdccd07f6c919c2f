//! Document numbering.
//!
//! Numbers look like `IVN2601-0004`: a type prefix, the issue period and a
//! per-period sequence. Allocation of the sequence itself happens in the
//! persistence layer; this module owns the format.

pub mod error;
pub mod types;

#[cfg(test)]
mod props;

pub use error::NumberingError;
pub use types::{DocumentNumber, DocumentType, Period, YearStyle};
