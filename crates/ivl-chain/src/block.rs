use chrono::{DateTime, SecondsFormat, Utc};
use ivl_crypto::BlockHeader;
use ivl_types::LedgerHash;
use serde::{Deserialize, Serialize};

/// The atomic, immutable ledger record.
///
/// A `Block` is created exactly once by the append orchestrator and never
/// mutated afterward, not even when later found inconsistent.
/// Inconsistency is reported by the validator, never repaired.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Strictly increasing, gapless position, starting at 0.
    pub index: u64,
    /// Capture-time UTC instant.
    pub timestamp: DateTime<Utc>,
    /// Short tag for the business event (invoice, listing, funding, ...).
    /// Opaque to the ledger.
    pub data_type: String,
    /// Canonical hash of the caller's payload. Unique across the chain.
    pub data_hash: LedgerHash,
    /// Serialized payload, cipher-transformed when `is_encrypted` is set.
    pub data_summary: String,
    /// The preceding block's `block_hash`, or the all-zero sentinel for
    /// block 0.
    pub previous_hash: LedgerHash,
    /// Nonce discovered by the proof-of-work sealer.
    pub nonce: u64,
    /// Field-level integrity root over the caller's payload.
    pub merkle_root: LedgerHash,
    /// Hash over (index, timestamp, data_hash, data_summary,
    /// previous_hash, nonce, merkle_root). Carries the difficulty prefix.
    pub block_hash: LedgerHash,
    /// Hex HMAC of `block_hash` under the block-signing key.
    pub digital_signature: String,
    /// Whether `data_summary` is cipher-transformed.
    pub is_encrypted: bool,
}

impl Block {
    /// The single canonical string rendering of the timestamp used in the
    /// hash preimage. Must be identical at append time and at every later
    /// recomputation.
    pub fn canonical_timestamp(&self) -> String {
        render_timestamp(&self.timestamp)
    }

    /// Recompute this block's hash from its own stored fields.
    ///
    /// For an untampered block the result equals `block_hash`.
    pub fn compute_hash(&self) -> LedgerHash {
        let timestamp = self.canonical_timestamp();
        BlockHeader {
            index: self.index,
            timestamp: &timestamp,
            data_hash: &self.data_hash,
            data_summary: &self.data_summary,
            previous_hash: &self.previous_hash,
            merkle_root: &self.merkle_root,
        }
        .hash_with_nonce(self.nonce)
    }

    /// Condensed view for audit listings.
    pub fn summary(&self) -> BlockSummary {
        BlockSummary {
            index: self.index,
            data_type: self.data_type.clone(),
            timestamp: self.timestamp,
            block_hash: self.block_hash,
        }
    }
}

/// Condensed block view exposed on audit surfaces.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSummary {
    pub index: u64,
    pub data_type: String,
    pub timestamp: DateTime<Utc>,
    pub block_hash: LedgerHash,
}

/// Render a UTC instant in the fixed RFC 3339 form used for hashing:
/// microsecond precision with a `Z` suffix.
pub fn render_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn sample_block() -> Block {
        let timestamp = Utc.with_ymd_and_hms(2026, 8, 6, 10, 15, 30).unwrap();
        let data_hash = LedgerHash::digest(b"payload");
        let previous_hash = LedgerHash::zero();
        let merkle_root = LedgerHash::digest(b"merkle");
        let mut block = Block {
            index: 0,
            timestamp,
            data_type: "invoice".into(),
            data_hash,
            data_summary: r#"{"amount":"1200.00"}"#.into(),
            previous_hash,
            nonce: 42,
            merkle_root,
            block_hash: LedgerHash::zero(),
            digital_signature: String::new(),
            is_encrypted: false,
        };
        block.block_hash = block.compute_hash();
        block
    }

    #[test]
    fn canonical_timestamp_is_rfc3339_micros_utc() {
        let block = sample_block();
        assert_eq!(block.canonical_timestamp(), "2026-08-06T10:15:30.000000Z");
    }

    #[test]
    fn compute_hash_matches_stored_hash_for_fresh_block() {
        let block = sample_block();
        assert_eq!(block.compute_hash(), block.block_hash);
    }

    #[test]
    fn compute_hash_survives_serde_roundtrip() {
        let block = sample_block();
        let json = serde_json::to_string(&block).unwrap();
        let parsed: Block = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, block);
        assert_eq!(parsed.compute_hash(), block.block_hash);
    }

    #[test]
    fn tampering_any_field_changes_the_recomputed_hash() {
        let block = sample_block();

        let mut tampered = block.clone();
        tampered.data_summary = r#"{"amount":"9999.00"}"#.into();
        assert_ne!(tampered.compute_hash(), block.block_hash);

        let mut tampered = block.clone();
        tampered.nonce += 1;
        assert_ne!(tampered.compute_hash(), block.block_hash);

        let mut tampered = block.clone();
        tampered.previous_hash = LedgerHash::digest(b"spliced");
        assert_ne!(tampered.compute_hash(), block.block_hash);
    }

    #[test]
    fn summary_carries_the_stored_hash() {
        let block = sample_block();
        let summary = block.summary();
        assert_eq!(summary.index, block.index);
        assert_eq!(summary.block_hash, block.block_hash);
        assert_eq!(summary.data_type, "invoice");
    }
}
