/// Errors produced by chain operations.
///
/// Duplicate content is a frequent, expected outcome (the marketplace
/// retries registrations), so it is an error-kind return here rather than
/// anything exceptional. Validation findings never travel through this
/// enum; the validator reports them as structured data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainError {
    #[error("duplicate content: data hash {hash} already anchored at block {index}")]
    DuplicateContent { hash: String, index: u64 },

    #[error("non-monotonic index: expected {expected}, got {actual}")]
    NonMonotonicIndex { expected: u64, actual: u64 },

    #[error("block {index} does not link to the current tip")]
    BrokenLink { index: u64 },

    #[error("block hash already exists in the chain")]
    HashConflict,

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("store error: {0}")]
    Store(String),
}
