//! Payment-gateway webhook handling.
//!
//! Verifies the HMAC signature of a delivery and maps the gateway event to a
//! state-machine command. Deliveries are at-least-once; the db crate applies
//! commands with a guarded update so replays are harmless.

pub mod error;
pub mod event;
pub mod signature;

pub use error::WebhookError;
pub use event::{GatewayEvent, ReconcileCommand, ReconcileOutcome};
pub use signature::{SIGNATURE_HEADER, SignatureVerifier};
