use std::sync::Mutex;

use chrono::Utc;
use ivl_crypto::{
    field_leaves, BlockHeader, CanonicalHasher, FieldTree, HmacSigner, PayloadCipher, PowSealer,
};
use ivl_types::LedgerHash;
use serde_json::Value;
use tracing::debug;

use crate::block::{render_timestamp, Block};
use crate::config::LedgerConfig;
use crate::error::ChainError;
use crate::store::ChainStore;
use crate::validation::{ChainReport, ChainValidator};

/// Append orchestrator over a [`ChainStore`].
///
/// Owns the block-signing HMAC domain and the payload cipher for one
/// independently-keyed ledger instance. Appends are single-writer: the tip
/// read through the final persist executes under one exclusive lock, so
/// two concurrent appends can neither collide on an index nor fork the
/// chain. Sealing runs inside that critical section, acceptable at the
/// small fixed difficulty this system uses.
pub struct Ledger<S: ChainStore> {
    store: S,
    signer: HmacSigner,
    cipher: PayloadCipher,
    difficulty: u32,
    append_lock: Mutex<()>,
}

impl<S: ChainStore> Ledger<S> {
    pub fn new(store: S, config: LedgerConfig) -> Self {
        let cipher = PayloadCipher::new(&config.cipher_secret);
        Self {
            store,
            signer: HmacSigner::new(config.signing_secret),
            cipher,
            difficulty: config.difficulty,
            append_lock: Mutex::new(()),
        }
    }

    /// Append a new block anchoring the given payload.
    ///
    /// Rejects payloads whose canonical hash is already anchored anywhere
    /// in the chain. All-or-nothing: any failure before the final persist
    /// leaves no partial block behind.
    pub fn append(
        &self,
        data_type: &str,
        payload: &Value,
        encrypt: bool,
    ) -> Result<Block, ChainError> {
        let _guard = self.append_lock.lock().expect("append lock poisoned");

        let data_hash = CanonicalHasher::PAYLOAD.hash_value(payload);
        if let Some(existing) = self.store.find_by_data_hash(&data_hash)? {
            return Err(ChainError::DuplicateContent {
                hash: data_hash.to_hex(),
                index: existing.index,
            });
        }

        let merkle_root = FieldTree::root(&field_leaves(payload));

        let serialized =
            serde_json::to_string(payload).map_err(|e| ChainError::Serialization(e.to_string()))?;
        let data_summary = if encrypt {
            self.cipher.encrypt(&serialized)
        } else {
            serialized
        };

        let (index, previous_hash) = match self.store.tip()? {
            Some(tip) => (tip.index + 1, tip.block_hash),
            None => (0, LedgerHash::zero()),
        };

        let timestamp = Utc::now();
        let rendered = render_timestamp(&timestamp);
        let header = BlockHeader {
            index,
            timestamp: &rendered,
            data_hash: &data_hash,
            data_summary: &data_summary,
            previous_hash: &previous_hash,
            merkle_root: &merkle_root,
        };
        let seal = PowSealer::seal(&header, self.difficulty);
        let digital_signature = self.signer.sign(&seal.hash);

        let block = Block {
            index,
            timestamp,
            data_type: data_type.to_string(),
            data_hash,
            data_summary,
            previous_hash,
            nonce: seal.nonce,
            merkle_root,
            block_hash: seal.hash,
            digital_signature,
            is_encrypted: encrypt,
        };
        self.store.put(block.clone())?;

        debug!(
            index,
            data_type,
            nonce = block.nonce,
            hash = %block.block_hash.short_hex(),
            "block appended"
        );
        Ok(block)
    }

    /// The current tip, or `None` on an empty chain.
    pub fn latest_block(&self) -> Result<Option<Block>, ChainError> {
        self.store.tip()
    }

    /// Fetch a block by index.
    pub fn block(&self, index: u64) -> Result<Option<Block>, ChainError> {
        self.store.get(index)
    }

    /// Consistent snapshot of the whole chain in index order.
    pub fn blocks(&self) -> Result<Vec<Block>, ChainError> {
        self.store.all()
    }

    /// Recompute and cross-check every chain invariant.
    pub fn validate_chain(&self) -> Result<ChainReport, ChainError> {
        ChainValidator::validate(&self.store, &self.signer, self.difficulty)
    }

    /// A block's payload summary as readable text: decrypted when the
    /// block is encrypted, verbatim otherwise. Malformed ciphertext
    /// degrades to the fixed placeholder, keeping read paths available
    /// over corrupted historical data.
    pub fn readable_summary(&self, block: &Block) -> String {
        if block.is_encrypted {
            self.cipher.decrypt(&block.data_summary)
        } else {
            block.data_summary.clone()
        }
    }

    /// The configured proof-of-work difficulty.
    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: ChainStore> std::fmt::Debug for Ledger<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ledger")
            .field("difficulty", &self.difficulty)
            .finish()
    }
}
