//! Invoice registry for the Invoice Verification Ledger.
//!
//! A higher-level service built on the hash-chained ledger: it
//! canonicalizes invoice data into a stable projection, rejects duplicates
//! by identity and by content, anchors each registration in an encrypted
//! ledger block, and re-verifies registered invoices against their current
//! state on demand.
//!
//! # Key Types
//!
//! - [`Invoice`] / [`LineItem`] — the invoice shape the platform hands in,
//!   with its canonical projection
//! - [`RegistryEntry`] — the record binding one invoice to one ledger
//!   anchor point
//! - [`InvoiceRegistry`] — the register / verify / audit-trail service
//! - [`RegistryStore`] / [`InvoiceSource`] — storage boundaries with
//!   in-memory implementations for tests and embedding

pub mod entry;
pub mod error;
pub mod invoice;
pub mod registry;
pub mod store;

pub use entry::RegistryEntry;
pub use error::RegistryError;
pub use invoice::{Invoice, LineItem};
pub use registry::{InvoiceRegistry, RegistryConfig, VerificationReport};
pub use store::{InMemoryInvoiceSource, InMemoryRegistryStore, InvoiceSource, RegistryStore};
