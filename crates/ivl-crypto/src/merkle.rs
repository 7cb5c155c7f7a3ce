use ivl_types::LedgerHash;

/// Sentinel literal hashed when a payload has no fields at all.
const EMPTY_FIELDS_SENTINEL: &str = "ivl-empty-fields";

/// Field-level Merkle root builder.
///
/// Each `name:value` field string is leaf-hashed independently; pairs of
/// hashes are combined level by level until a single root remains. When a
/// level holds an odd count, the last hash is duplicated to pair with
/// itself. An empty field set yields a fixed sentinel root rather than an
/// error.
///
/// The builder is order-sensitive by contract: callers must feed fields in
/// a stable, sorted order to get reproducible roots.
pub struct FieldTree;

impl FieldTree {
    /// Compute the Merkle root over an ordered sequence of field strings.
    pub fn root(fields: &[String]) -> LedgerHash {
        if fields.is_empty() {
            return Self::empty_root();
        }

        let mut level: Vec<LedgerHash> = fields.iter().map(|f| leaf_hash(f)).collect();
        while level.len() > 1 {
            let mut next = Vec::with_capacity((level.len() + 1) / 2);
            for pair in level.chunks(2) {
                let combined = if pair.len() == 2 {
                    hash_pair(&pair[0], &pair[1])
                } else {
                    // Odd leaf promotion: pair the last hash with itself
                    hash_pair(&pair[0], &pair[0])
                };
                next.push(combined);
            }
            level = next;
        }
        level[0]
    }

    /// The fixed root for an empty field set.
    pub fn empty_root() -> LedgerHash {
        leaf_hash(EMPTY_FIELDS_SENTINEL)
    }
}

fn leaf_hash(field: &str) -> LedgerHash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(b"ivl-merkle-leaf-v1:");
    hasher.update(field.as_bytes());
    LedgerHash::from_hash(*hasher.finalize().as_bytes())
}

fn hash_pair(left: &LedgerHash, right: &LedgerHash) -> LedgerHash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(b"ivl-merkle-node-v1:");
    hasher.update(left.as_bytes());
    hasher.update(right.as_bytes());
    LedgerHash::from_hash(*hasher.finalize().as_bytes())
}
