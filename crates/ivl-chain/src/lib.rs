//! Append-only hash-chained ledger for the Invoice Verification Ledger.
//!
//! This crate is the heart of IVL. It provides:
//! - The immutable [`Block`] record with hash-linked integrity,
//!   proof-of-work sealing, and HMAC block signatures
//! - The [`ChainStore`] storage boundary and [`InMemoryChainStore`]
//!   implementation for tests and embedding
//! - The [`Ledger`] append orchestrator (duplicate-content rejection,
//!   Merkle rooting, optional payload encryption, sealing, signing,
//!   persistence; all-or-nothing, single-writer)
//! - The [`ChainValidator`] full-scan read path that recomputes every
//!   invariant and reports findings as structured data
//!
//! Callers never touch the cryptographic primitives directly; they call
//! [`Ledger::append`] and [`Ledger::validate_chain`] and treat blocks as
//! opaque, immutable records.

pub mod block;
pub mod config;
pub mod error;
pub mod ledger;
pub mod store;
pub mod validation;

pub use block::{Block, BlockSummary};
pub use config::LedgerConfig;
pub use error::ChainError;
pub use ledger::Ledger;
pub use store::{ChainStore, InMemoryChainStore};
pub use validation::{ChainReport, ChainValidator};
