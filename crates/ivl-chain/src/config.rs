use ivl_crypto::SigningSecret;

/// Proof-of-work difficulty used when none is configured: the number of
/// leading zero hex digits a block hash must carry.
pub const DEFAULT_DIFFICULTY: u32 = 3;

/// Per-instance ledger configuration.
///
/// Keys and difficulty are instance state, not process-wide constants, so
/// independently-keyed ledgers (production, staging, tests) can coexist in
/// one process.
#[derive(Clone)]
pub struct LedgerConfig {
    /// Secret for the block-signing HMAC domain.
    pub signing_secret: SigningSecret,
    /// Passphrase for the payload confidentiality cipher.
    pub cipher_secret: String,
    /// Required count of leading zero hex digits on every block hash.
    /// A small fixed constant; raising it significantly without adding an
    /// iteration cap to the sealer is unsupported.
    pub difficulty: u32,
}

impl LedgerConfig {
    pub fn new(signing_secret: SigningSecret, cipher_secret: impl Into<String>, difficulty: u32) -> Self {
        Self {
            signing_secret,
            cipher_secret: cipher_secret.into(),
            difficulty,
        }
    }
}

impl Default for LedgerConfig {
    /// Ephemeral configuration: fresh random secrets and the default
    /// difficulty. Suitable for tests and demos; production deployments
    /// supply their own persistent secrets.
    fn default() -> Self {
        Self {
            signing_secret: SigningSecret::generate(),
            cipher_secret: SigningSecret::generate_hex(),
            difficulty: DEFAULT_DIFFICULTY,
        }
    }
}

impl std::fmt::Debug for LedgerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerConfig")
            .field("signing_secret", &"<redacted>")
            .field("cipher_secret", &"<redacted>")
            .field("difficulty", &self.difficulty)
            .finish()
    }
}
