//! Foundation types for the Invoice Verification Ledger (IVL).
//!
//! This crate provides the digest and status types shared by every other
//! IVL crate.
//!
//! # Key Types
//!
//! - [`LedgerHash`] — 32-byte content/linkage digest with hex encoding,
//!   an all-zero genesis sentinel, and a proof-of-work prefix test
//! - [`RegistrationStatus`] / [`VerificationResult`] — invoice registry
//!   lifecycle states
//! - [`TypeError`] — parse failures for the above

pub mod error;
pub mod hash;
pub mod status;

pub use error::TypeError;
pub use hash::LedgerHash;
pub use status::{RegistrationStatus, VerificationResult};
