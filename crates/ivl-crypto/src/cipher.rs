use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Fixed placeholder returned when an encrypted payload cannot be read.
///
/// Read paths over historical ledger data must stay available even when a
/// stored summary is corrupt or was written under a different key, so
/// decode failures degrade to this marker instead of propagating an error.
pub const DECRYPT_PLACEHOLDER: &str = "[unreadable payload]";

/// Reversible keystream cipher for payload obfuscation at rest.
///
/// The key is derived by a one-way hash of a passphrase; plaintext bytes
/// are XORed against the cyclically repeated key and base64-encoded for
/// safe text storage. XOR is self-inverse, so decryption is the exact
/// reverse transform.
///
/// This construction is **not** authenticated and provides no tamper
/// detection of its own; integrity of an encrypted summary rides entirely
/// on the enclosing block hash and signature. It is preserved in this exact
/// form for compatibility with existing ledger data; whether to move to an
/// authenticated scheme is a product decision tracked outside this crate.
pub struct PayloadCipher {
    key: [u8; 32],
}

impl PayloadCipher {
    /// Derive the keystream key from a passphrase.
    pub fn new(secret: &str) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"ivl-cipher-v1:");
        hasher.update(secret.as_bytes());
        Self {
            key: *hasher.finalize().as_bytes(),
        }
    }

    /// Encrypt a plaintext string into a base64 token.
    pub fn encrypt(&self, plaintext: &str) -> String {
        let transformed = self.xor(plaintext.as_bytes());
        STANDARD.encode(transformed)
    }

    /// Decrypt a base64 token back into the plaintext string.
    ///
    /// Malformed input (bad base64, or bytes that do not decode to UTF-8
    /// under this key) yields [`DECRYPT_PLACEHOLDER`] rather than an error.
    pub fn decrypt(&self, ciphertext: &str) -> String {
        let Ok(bytes) = STANDARD.decode(ciphertext) else {
            return DECRYPT_PLACEHOLDER.to_string();
        };
        match String::from_utf8(self.xor(&bytes)) {
            Ok(plaintext) => plaintext,
            Err(_) => DECRYPT_PLACEHOLDER.to_string(),
        }
    }

    fn xor(&self, data: &[u8]) -> Vec<u8> {
        data.iter()
            .zip(self.key.iter().cycle())
            .map(|(byte, key_byte)| byte ^ key_byte)
            .collect()
    }
}

impl std::fmt::Debug for PayloadCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PayloadCipher(<redacted>)")
    }
}
