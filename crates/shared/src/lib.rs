//! Shared types, errors, and configuration for Tourbook.
//!
//! This crate provides common types used across all other crates:
//! - Fixed-point amounts with two decimal places
//! - Typed IDs for type-safe entity references
//! - Pagination types for list endpoints
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, Environment};
pub use error::{AppError, AppResult};
pub use types::Amount;
