use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use ivl_types::LedgerHash;

use crate::block::Block;
use crate::error::ChainError;

/// Storage boundary for persisted blocks.
///
/// All implementations must satisfy these invariants:
/// - Blocks are immutable once written; there is no update or delete.
/// - Indices are gapless and strictly increasing from 0; `put` rejects
///   anything else.
/// - `block_hash` and `data_hash` are unique across the chain.
/// - `all` returns blocks in index order, as one consistent snapshot.
pub trait ChainStore: Send + Sync {
    /// The block with the highest index, or `None` on an empty chain.
    fn tip(&self) -> Result<Option<Block>, ChainError>;

    /// Fetch a block by index.
    fn get(&self, index: u64) -> Result<Option<Block>, ChainError>;

    /// Snapshot of the whole chain in index order.
    fn all(&self) -> Result<Vec<Block>, ChainError>;

    /// Number of blocks in the chain.
    fn len(&self) -> Result<u64, ChainError>;

    /// Find the block anchoring the given payload hash, if any.
    fn find_by_data_hash(&self, hash: &LedgerHash) -> Result<Option<Block>, ChainError>;

    /// Persist a fully-formed block at the tip.
    fn put(&self, block: Block) -> Result<(), ChainError>;
}

#[derive(Default)]
struct ChainState {
    blocks: Vec<Block>,
    data_index: HashMap<LedgerHash, u64>,
    block_hashes: HashSet<LedgerHash>,
}

/// In-memory chain store for tests, local demos, and embedding.
///
/// Blocks are held behind a `RwLock`; reads take a consistent snapshot so
/// a block appended mid-scan is never mistaken for a structural anomaly.
pub struct InMemoryChainStore {
    inner: RwLock<ChainState>,
}

impl InMemoryChainStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(ChainState::default()),
        }
    }

    /// Restore a previously persisted chain verbatim.
    ///
    /// No integrity checks run here: loading historical data must succeed
    /// even when it is corrupt, so that [`crate::ChainValidator`] can
    /// inspect and report on it.
    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        let mut state = ChainState::default();
        for block in &blocks {
            state.data_index.insert(block.data_hash, block.index);
            state.block_hashes.insert(block.block_hash);
        }
        state.blocks = blocks;
        Self {
            inner: RwLock::new(state),
        }
    }
}

impl Default for InMemoryChainStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ChainStore for InMemoryChainStore {
    fn tip(&self) -> Result<Option<Block>, ChainError> {
        let state = self.inner.read().expect("chain lock poisoned");
        Ok(state.blocks.last().cloned())
    }

    fn get(&self, index: u64) -> Result<Option<Block>, ChainError> {
        let state = self.inner.read().expect("chain lock poisoned");
        Ok(state.blocks.get(index as usize).cloned())
    }

    fn all(&self) -> Result<Vec<Block>, ChainError> {
        let state = self.inner.read().expect("chain lock poisoned");
        Ok(state.blocks.clone())
    }

    fn len(&self) -> Result<u64, ChainError> {
        let state = self.inner.read().expect("chain lock poisoned");
        Ok(state.blocks.len() as u64)
    }

    fn find_by_data_hash(&self, hash: &LedgerHash) -> Result<Option<Block>, ChainError> {
        let state = self.inner.read().expect("chain lock poisoned");
        Ok(state
            .data_index
            .get(hash)
            .and_then(|index| state.blocks.get(*index as usize))
            .cloned())
    }

    fn put(&self, block: Block) -> Result<(), ChainError> {
        let mut state = self.inner.write().expect("chain lock poisoned");

        let expected = state.blocks.len() as u64;
        if block.index != expected {
            return Err(ChainError::NonMonotonicIndex {
                expected,
                actual: block.index,
            });
        }

        let expected_prev = state
            .blocks
            .last()
            .map(|tip| tip.block_hash)
            .unwrap_or_else(LedgerHash::zero);
        if block.previous_hash != expected_prev {
            return Err(ChainError::BrokenLink { index: block.index });
        }

        if let Some(existing) = state.data_index.get(&block.data_hash) {
            return Err(ChainError::DuplicateContent {
                hash: block.data_hash.to_hex(),
                index: *existing,
            });
        }

        if state.block_hashes.contains(&block.block_hash) {
            return Err(ChainError::HashConflict);
        }

        state.data_index.insert(block.data_hash, block.index);
        state.block_hashes.insert(block.block_hash);
        state.blocks.push(block);
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryChainStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.read().expect("chain lock poisoned");
        f.debug_struct("InMemoryChainStore")
            .field("blocks", &state.blocks.len())
            .finish()
    }
}
