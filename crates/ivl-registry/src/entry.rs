use chrono::{DateTime, Utc};
use ivl_types::{LedgerHash, RegistrationStatus, VerificationResult};
use serde::{Deserialize, Serialize};

/// The record binding one invoice to one ledger anchor point.
///
/// Hash and signature fields are write-once: after registration only the
/// audit metadata (`tamper_check_count`, `last_verified_at`,
/// `verification_result`, `registration_status`) ever changes, and only as
/// a side effect of verification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    /// Platform invoice identifier. Unique across the registry.
    pub invoice_id: String,
    pub vendor_id: String,
    /// Canonical-projection hash. Also unique across the registry: a
    /// second registration with identical content is a fraud signal even
    /// under a different `invoice_id`.
    pub invoice_hash: LedgerHash,
    /// HMAC over (invoice_hash, vendor identifier) in the registry key
    /// domain.
    pub vendor_signature: String,
    /// One-way digest of the buyer's GSTIN, for privacy-preserving
    /// linkage.
    pub buyer_gstin_hash: LedgerHash,
    /// Index of the ledger block anchoring this registration.
    pub block_index: u64,
    /// That block's hash at registration time.
    pub block_hash: LedgerHash,
    /// Field-level root over the canonical projection.
    pub merkle_root: LedgerHash,
    pub registration_status: RegistrationStatus,
    /// Outcome of the most recent verification; `None` until the first
    /// verification runs.
    pub verification_result: Option<VerificationResult>,
    pub tamper_check_count: u64,
    pub last_verified_at: Option<DateTime<Utc>>,
}
