use hmac::{Hmac, Mac};
use ivl_types::LedgerHash;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Secret key material for one HMAC signing domain.
///
/// The ledger and the invoice registry each hold their own secret;
/// compromise of one domain must not let an attacker forge signatures in
/// the other, so the two are never shared or derived from each other.
#[derive(Clone)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    /// Wrap existing secret bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Generate a fresh 32-byte secret from the thread RNG.
    pub fn generate() -> Self {
        use rand::RngCore;
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes.to_vec())
    }

    /// Generate a fresh random secret rendered as hex, for call sites that
    /// need a string passphrase rather than raw bytes.
    pub fn generate_hex() -> String {
        use rand::RngCore;
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        hex::encode(bytes)
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<&str> for SigningSecret {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl std::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SigningSecret(<redacted>)")
    }
}

/// HMAC-SHA256 signer over ledger hashes.
///
/// Signatures are hex strings. Verification goes through the MAC
/// implementation's checked comparison, which is constant-time.
pub struct HmacSigner {
    secret: SigningSecret,
}

impl HmacSigner {
    pub fn new(secret: SigningSecret) -> Self {
        Self { secret }
    }

    /// Sign a hash, returning the hex-encoded HMAC.
    pub fn sign(&self, hash: &LedgerHash) -> String {
        let mut mac = self.mac();
        mac.update(hash.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Verify a hex signature over a hash.
    pub fn verify(&self, hash: &LedgerHash, signature_hex: &str) -> bool {
        let Ok(signature) = hex::decode(signature_hex) else {
            return false;
        };
        let mut mac = self.mac();
        mac.update(hash.as_bytes());
        mac.verify_slice(&signature).is_ok()
    }

    /// Sign a hash bound to a context string (e.g. a vendor identifier),
    /// so the signature cannot be replayed under a different identity.
    pub fn sign_with_context(&self, hash: &LedgerHash, context: &str) -> String {
        let mut mac = self.mac();
        mac.update(hash.as_bytes());
        mac.update(b"|");
        mac.update(context.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Verify a context-bound hex signature.
    pub fn verify_with_context(
        &self,
        hash: &LedgerHash,
        context: &str,
        signature_hex: &str,
    ) -> bool {
        let Ok(signature) = hex::decode(signature_hex) else {
            return false;
        };
        let mut mac = self.mac();
        mac.update(hash.as_bytes());
        mac.update(b"|");
        mac.update(context.as_bytes());
        mac.verify_slice(&signature).is_ok()
    }

    fn mac(&self) -> HmacSha256 {
        // new_from_slice accepts any key length for SHA-256
        HmacSha256::new_from_slice(self.secret.as_bytes()).expect("HMAC accepts any key length")
    }
}

impl std::fmt::Debug for HmacSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HmacSigner(<redacted>)")
    }
}
