//! Cryptographic primitives for the Invoice Verification Ledger.
//!
//! Provides canonical payload hashing, field-level Merkle roots,
//! proof-of-work sealing, HMAC-SHA256 signatures in independent key
//! domains, and a reversible payload cipher for at-rest obfuscation.
//!
//! Hashing and signing wrap established libraries; no custom cryptography.
//! The payload cipher is the one deliberate exception: it is a plain
//! keystream XOR preserved for compatibility with historical ledger data,
//! and it is *not* authenticated. Integrity of encrypted payloads rides
//! entirely on the outer block hash and signature.

pub mod canonical;
pub mod cipher;
pub mod merkle;
pub mod pow;
pub mod signer;

pub use canonical::{canonical_string, field_leaves, CanonicalHasher};
pub use cipher::{PayloadCipher, DECRYPT_PLACEHOLDER};
pub use merkle::FieldTree;
pub use pow::{BlockHeader, PowSealer, Seal};
pub use signer::{HmacSigner, SigningSecret};
