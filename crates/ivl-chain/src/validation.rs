use std::collections::BTreeSet;

use ivl_crypto::HmacSigner;
use tracing::warn;

use crate::error::ChainError;
use crate::store::ChainStore;

/// Result of a full chain scan.
///
/// `valid` is `true` iff no check on any block failed. Findings are data,
/// not errors: severity is the caller's decision.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainReport {
    pub valid: bool,
    pub total_blocks: u64,
    /// One human-readable message per failed check.
    pub errors: Vec<String>,
    /// Distinct indices of blocks implicated by any failed check, in order.
    pub tampered_block_indices: Vec<u64>,
    /// Count of blocks whose signature verified.
    pub signatures_verified: u64,
    /// Count of blocks whose stored hash satisfies the difficulty prefix.
    pub pow_verified: u64,
}

/// Full-scan chain validator.
///
/// Iterates every block in index order with no early exit: later blocks
/// are checked even when earlier ones already failed, so one scan yields
/// the complete damage picture. For each block it independently checks:
///
/// 1. the recomputed hash equals the stored `block_hash` (tamper
///    detection),
/// 2. `previous_hash` equals the prior block's stored `block_hash`, with
///    the all-zero sentinel required at block 0 (reordering and splice
///    detection),
/// 3. the stored `block_hash` carries the proof-of-work prefix
///    (difficulty-tamper detection),
/// 4. the signature verifies against the recomputed hash (forgery
///    detection).
///
/// Purely a read path: nothing is mutated, and findings never travel
/// through an error return.
pub struct ChainValidator;

impl ChainValidator {
    pub fn validate<S: ChainStore>(
        store: &S,
        signer: &HmacSigner,
        difficulty: u32,
    ) -> Result<ChainReport, ChainError> {
        let blocks = store.all()?;
        let mut errors = Vec::new();
        let mut tampered = BTreeSet::new();
        let mut signatures_verified = 0u64;
        let mut pow_verified = 0u64;

        for (position, block) in blocks.iter().enumerate() {
            let recomputed = block.compute_hash();
            if recomputed != block.block_hash {
                errors.push(format!(
                    "block {}: stored hash does not match recomputed hash",
                    block.index
                ));
                tampered.insert(block.index);
            }

            if position == 0 {
                if !block.previous_hash.is_zero() {
                    errors.push(format!(
                        "block {}: genesis previous hash is not the zero sentinel",
                        block.index
                    ));
                    tampered.insert(block.index);
                }
            } else {
                let prior = &blocks[position - 1];
                if block.previous_hash != prior.block_hash {
                    errors.push(format!(
                        "block {}: previous hash does not match block {}",
                        block.index, prior.index
                    ));
                    tampered.insert(block.index);
                }
            }

            if block.block_hash.has_difficulty_prefix(difficulty) {
                pow_verified += 1;
            } else {
                errors.push(format!(
                    "block {}: hash does not satisfy difficulty {}",
                    block.index, difficulty
                ));
                tampered.insert(block.index);
            }

            if signer.verify(&recomputed, &block.digital_signature) {
                signatures_verified += 1;
            } else {
                errors.push(format!("block {}: signature does not verify", block.index));
                tampered.insert(block.index);
            }
        }

        let report = ChainReport {
            valid: errors.is_empty(),
            total_blocks: blocks.len() as u64,
            errors,
            tampered_block_indices: tampered.into_iter().collect(),
            signatures_verified,
            pow_verified,
        };

        if !report.valid {
            warn!(
                total_blocks = report.total_blocks,
                failures = report.errors.len(),
                "chain validation found inconsistencies"
            );
        }
        Ok(report)
    }
}
