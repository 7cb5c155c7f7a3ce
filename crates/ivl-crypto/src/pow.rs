use ivl_types::LedgerHash;

/// Borrowed view of the block fields that enter the block hash, minus the
/// nonce. The timestamp arrives pre-rendered so the preimage is identical
/// whether the header is built at append time or recomputed during
/// validation.
#[derive(Clone, Copy, Debug)]
pub struct BlockHeader<'a> {
    pub index: u64,
    pub timestamp: &'a str,
    pub data_hash: &'a LedgerHash,
    pub data_summary: &'a str,
    pub previous_hash: &'a LedgerHash,
    pub merkle_root: &'a LedgerHash,
}

impl BlockHeader<'_> {
    /// Hash the header fields together with a trial nonce.
    ///
    /// Field order in the preimage is fixed: index, timestamp, data hash,
    /// data summary, previous hash, nonce, merkle root.
    pub fn hash_with_nonce(&self, nonce: u64) -> LedgerHash {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"ivl-block-v1:");
        hasher.update(&self.index.to_le_bytes());
        hasher.update(self.timestamp.as_bytes());
        hasher.update(self.data_hash.as_bytes());
        hasher.update(self.data_summary.as_bytes());
        hasher.update(self.previous_hash.as_bytes());
        hasher.update(&nonce.to_le_bytes());
        hasher.update(self.merkle_root.as_bytes());
        LedgerHash::from_hash(*hasher.finalize().as_bytes())
    }
}

/// A successful proof-of-work result: the discovered nonce and the block
/// hash it produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Seal {
    pub nonce: u64,
    pub hash: LedgerHash,
}

/// Brute-force proof-of-work sealer.
///
/// Starting at nonce 0, recomputes the candidate block hash until its hex
/// form carries `difficulty` leading `'0'` characters and returns the first
/// success. No iteration cap is imposed: difficulty is a small fixed
/// constant in this system. If difficulty ever becomes runtime-configurable
/// upward, this search needs an explicit cap and a sealing-timeout error.
pub struct PowSealer;

impl PowSealer {
    /// Find the first nonce whose block hash satisfies the difficulty
    /// prefix.
    pub fn seal(header: &BlockHeader<'_>, difficulty: u32) -> Seal {
        let mut nonce = 0u64;
        loop {
            let hash = header.hash_with_nonce(nonce);
            if hash.has_difficulty_prefix(difficulty) {
                return Seal { nonce, hash };
            }
            nonce += 1;
        }
    }
}
