use ivl_chain::ChainError;

/// Errors produced by registry operations.
///
/// Already-registered and duplicate-content are frequent, expected
/// outcomes of normal marketplace traffic, modeled as error kinds the
/// caller matches on rather than anything exceptional.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("invoice {invoice_id} is already registered")]
    AlreadyRegistered { invoice_id: String },

    #[error("invoice content duplicates registered invoice {existing_invoice_id}")]
    DuplicateContent { existing_invoice_id: String },

    #[error("invoice {invoice_id} not found")]
    InvoiceNotFound { invoice_id: String },

    #[error("invoice {invoice_id} has no registry entry")]
    NotRegistered { invoice_id: String },

    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error("store error: {0}")]
    Store(String),
}
