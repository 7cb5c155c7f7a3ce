use std::sync::Arc;

use chrono::Utc;
use ivl_chain::{BlockSummary, ChainStore, Ledger};
use ivl_crypto::{field_leaves, CanonicalHasher, FieldTree, HmacSigner, SigningSecret};
use ivl_types::{RegistrationStatus, VerificationResult};
use serde_json::Value;
use tracing::{debug, info};

use crate::entry::RegistryEntry;
use crate::error::RegistryError;
use crate::store::{InvoiceSource, RegistryStore};

/// Data type tag on blocks that anchor invoice registrations.
const REGISTRATION_DATA_TYPE: &str = "invoice_registration";

/// Per-instance registry configuration.
///
/// The registry signing secret is its own HMAC domain, distinct from the
/// ledger's block-signing secret: compromise of either key must not allow
/// forgery in the other domain.
#[derive(Clone)]
pub struct RegistryConfig {
    pub signing_secret: SigningSecret,
}

impl RegistryConfig {
    pub fn new(signing_secret: SigningSecret) -> Self {
        Self { signing_secret }
    }
}

impl Default for RegistryConfig {
    /// Ephemeral configuration with a fresh random secret, for tests and
    /// demos.
    fn default() -> Self {
        Self {
            signing_secret: SigningSecret::generate(),
        }
    }
}

impl std::fmt::Debug for RegistryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryConfig")
            .field("signing_secret", &"<redacted>")
            .finish()
    }
}

/// Outcome of one verification pass over a registered invoice.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerificationReport {
    /// `true` iff every individual check passed.
    pub verified: bool,
    /// Current projection hash equals the registered one.
    pub hash_match: bool,
    /// Stored vendor signature still verifies for this vendor.
    pub signature_valid: bool,
    /// The anchoring block still exists with the recorded hash.
    pub blockchain_anchored: bool,
    pub result: VerificationResult,
}

/// Register / verify / audit-trail service binding invoices to the ledger.
///
/// Built entirely on the ledger's public surface: registration appends an
/// encrypted anchoring block, verification re-derives everything from the
/// invoice's *current* state and diffs against the stored entry. The
/// registry mutates only its own audit metadata; the underlying ledger is
/// never touched outside `append`.
pub struct InvoiceRegistry<C, R, I>
where
    C: ChainStore,
    R: RegistryStore,
    I: InvoiceSource,
{
    ledger: Arc<Ledger<C>>,
    entries: R,
    invoices: I,
    signer: HmacSigner,
}

impl<C, R, I> InvoiceRegistry<C, R, I>
where
    C: ChainStore,
    R: RegistryStore,
    I: InvoiceSource,
{
    pub fn new(ledger: Arc<Ledger<C>>, entries: R, invoices: I, config: RegistryConfig) -> Self {
        Self {
            ledger,
            entries,
            invoices,
            signer: HmacSigner::new(config.signing_secret),
        }
    }

    /// Register an invoice: canonicalize, reject duplicates by identity
    /// and by content, anchor in the ledger, persist the entry.
    pub fn register(&self, invoice_id: &str) -> Result<RegistryEntry, RegistryError> {
        let invoice = self
            .invoices
            .load(invoice_id)?
            .ok_or_else(|| RegistryError::InvoiceNotFound {
                invoice_id: invoice_id.to_string(),
            })?;

        if self.entries.get(invoice_id)?.is_some() {
            return Err(RegistryError::AlreadyRegistered {
                invoice_id: invoice_id.to_string(),
            });
        }

        let projection = invoice.canonical_projection();
        let invoice_hash = CanonicalHasher::PROJECTION.hash_value(&projection);

        // Content-duplicate fraud signal: identical projections under
        // distinct invoice ids are rejected, not silently double-anchored.
        if let Some(existing) = self.entries.find_by_invoice_hash(&invoice_hash)? {
            return Err(RegistryError::DuplicateContent {
                existing_invoice_id: existing.invoice_id,
            });
        }

        let vendor_signature = self
            .signer
            .sign_with_context(&invoice_hash, &invoice.vendor_id);
        let buyer_gstin_hash = CanonicalHasher::IDENTITY.hash_str(&invoice.buyer_gstin);
        let merkle_root = FieldTree::root(&field_leaves(&projection));

        // The anchored payload is the projection plus the platform id, so
        // audit scans can match blocks to invoices after decryption.
        let mut payload = projection;
        if let Value::Object(ref mut map) = payload {
            map.insert(
                "invoice_id".to_string(),
                Value::String(invoice.invoice_id.clone()),
            );
        }
        let block = self
            .ledger
            .append(REGISTRATION_DATA_TYPE, &payload, true)?;

        let entry = RegistryEntry {
            invoice_id: invoice.invoice_id.clone(),
            vendor_id: invoice.vendor_id.clone(),
            invoice_hash,
            vendor_signature,
            buyer_gstin_hash,
            block_index: block.index,
            block_hash: block.block_hash,
            merkle_root,
            registration_status: RegistrationStatus::Registered,
            verification_result: None,
            tamper_check_count: 0,
            last_verified_at: None,
        };
        self.entries.insert(entry.clone())?;

        info!(
            invoice_id,
            vendor_id = %invoice.vendor_id,
            block_index = block.index,
            invoice_hash = %invoice_hash.short_hex(),
            "invoice registered"
        );
        Ok(entry)
    }

    /// Re-verify a registered invoice against its current state.
    ///
    /// Read-only with respect to the ledger; the registry's own audit
    /// metadata is updated as a side effect of every pass.
    pub fn verify(&self, invoice_id: &str) -> Result<VerificationReport, RegistryError> {
        let entry = self
            .entries
            .get(invoice_id)?
            .ok_or_else(|| RegistryError::NotRegistered {
                invoice_id: invoice_id.to_string(),
            })?;
        let invoice = self
            .invoices
            .load(invoice_id)?
            .ok_or_else(|| RegistryError::InvoiceNotFound {
                invoice_id: invoice_id.to_string(),
            })?;

        let projection = invoice.canonical_projection();
        let current_hash = CanonicalHasher::PROJECTION.hash_value(&projection);
        let hash_match = current_hash == entry.invoice_hash;

        // The signature is recomputed over the *stored* hash, so hash
        // tampering and signature tampering are reported independently.
        let signature_valid = self.signer.verify_with_context(
            &entry.invoice_hash,
            &invoice.vendor_id,
            &entry.vendor_signature,
        );

        let blockchain_anchored = match self.ledger.block(entry.block_index)? {
            Some(block) => block.block_hash == entry.block_hash,
            None => false,
        };

        let result = if hash_match && signature_valid && blockchain_anchored {
            VerificationResult::Intact
        } else {
            VerificationResult::Tampered
        };
        self.entries
            .record_verification(invoice_id, result, Utc::now())?;

        debug!(
            invoice_id,
            hash_match, signature_valid, blockchain_anchored, %result,
            "invoice verified"
        );
        Ok(VerificationReport {
            verified: result == VerificationResult::Intact,
            hash_match,
            signature_valid,
            blockchain_anchored,
            result,
        })
    }

    /// Ordered summaries of every ledger block whose payload references
    /// the given invoice.
    ///
    /// Encrypted summaries are decrypted for matching; unreadable ones are
    /// skipped rather than failing the scan.
    pub fn audit_trail(&self, invoice_id: &str) -> Result<Vec<BlockSummary>, RegistryError> {
        let blocks = self.ledger.blocks()?;
        let mut trail = Vec::new();
        for block in &blocks {
            let text = self.ledger.readable_summary(block);
            let Ok(payload) = serde_json::from_str::<Value>(&text) else {
                continue;
            };
            if payload.get("invoice_id").and_then(Value::as_str) == Some(invoice_id) {
                trail.push(block.summary());
            }
        }
        Ok(trail)
    }

    /// Fetch the stored entry for an invoice.
    pub fn entry(&self, invoice_id: &str) -> Result<Option<RegistryEntry>, RegistryError> {
        self.entries.get(invoice_id)
    }

    /// The ledger this registry anchors into.
    pub fn ledger(&self) -> &Ledger<C> {
        &self.ledger
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use ivl_chain::{InMemoryChainStore, LedgerConfig};
    use rust_decimal::Decimal;
    use serde_json::json;

    use crate::invoice::{Invoice, LineItem};
    use crate::store::{InMemoryInvoiceSource, InMemoryRegistryStore};

    use super::*;

    type TestRegistry =
        InvoiceRegistry<InMemoryChainStore, InMemoryRegistryStore, InMemoryInvoiceSource>;

    fn test_ledger() -> Arc<Ledger<InMemoryChainStore>> {
        let config = LedgerConfig::new(SigningSecret::from("block-secret"), "cipher-secret", 2);
        Arc::new(Ledger::new(InMemoryChainStore::new(), config))
    }

    fn test_registry(ledger: Arc<Ledger<InMemoryChainStore>>) -> TestRegistry {
        InvoiceRegistry::new(
            ledger,
            InMemoryRegistryStore::new(),
            InMemoryInvoiceSource::new(),
            RegistryConfig::new(SigningSecret::from("registry-secret")),
        )
    }

    fn invoice(invoice_id: &str, invoice_number: &str, amount_cents: i64) -> Invoice {
        Invoice {
            invoice_id: invoice_id.into(),
            vendor_id: "VEND-042".into(),
            invoice_number: invoice_number.into(),
            buyer_gstin: "29ABCDE1234F1Z5".into(),
            invoice_date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2026, 9, 30).unwrap(),
            amount: Decimal::new(amount_cents, 2),
            line_items: vec![LineItem {
                description: "Steel fasteners".into(),
                quantity: Decimal::new(500, 0),
                rate: Decimal::new(amount_cents, 2) / Decimal::new(500, 0),
                amount: Decimal::new(amount_cents, 2),
            }],
            status: "listed".into(),
            notes: None,
        }
    }

    #[test]
    fn register_creates_an_anchored_entry() {
        let ledger = test_ledger();
        let registry = test_registry(ledger.clone());
        registry.invoices.upsert(invoice("inv-1", "2026/0001", 120000));

        let entry = registry.register("inv-1").unwrap();
        assert_eq!(entry.invoice_id, "inv-1");
        assert_eq!(entry.vendor_id, "VEND-042");
        assert_eq!(entry.registration_status, RegistrationStatus::Registered);
        assert_eq!(entry.verification_result, None);
        assert_eq!(entry.tamper_check_count, 0);

        let block = ledger.block(entry.block_index).unwrap().unwrap();
        assert_eq!(block.block_hash, entry.block_hash);
        assert_eq!(block.data_type, "invoice_registration");
        assert!(block.is_encrypted);

        // The anchored payload decrypts back to the projection + id.
        let payload: Value =
            serde_json::from_str(&ledger.readable_summary(&block)).unwrap();
        assert_eq!(payload["invoice_id"], "inv-1");
        assert_eq!(payload["amount"], "1200.00");
    }

    #[test]
    fn register_rejects_missing_invoice() {
        let registry = test_registry(test_ledger());
        assert_eq!(
            registry.register("inv-404"),
            Err(RegistryError::InvoiceNotFound {
                invoice_id: "inv-404".into()
            })
        );
    }

    #[test]
    fn register_rejects_duplicate_id() {
        let registry = test_registry(test_ledger());
        registry.invoices.upsert(invoice("inv-1", "2026/0001", 120000));
        registry.register("inv-1").unwrap();

        assert_eq!(
            registry.register("inv-1"),
            Err(RegistryError::AlreadyRegistered {
                invoice_id: "inv-1".into()
            })
        );
    }

    #[test]
    fn register_rejects_duplicate_content_under_distinct_ids() {
        let registry = test_registry(test_ledger());
        registry.invoices.upsert(invoice("inv-1", "2026/0001", 120000));
        let mut clone = invoice("inv-2", "2026/0001", 120000);
        clone.status = "draft".into(); // workflow state is not content
        registry.invoices.upsert(clone);

        registry.register("inv-1").unwrap();
        assert_eq!(
            registry.register("inv-2"),
            Err(RegistryError::DuplicateContent {
                existing_invoice_id: "inv-1".into()
            })
        );
    }

    #[test]
    fn distinct_content_registers_cleanly() {
        let registry = test_registry(test_ledger());
        registry.invoices.upsert(invoice("inv-1", "2026/0001", 120000));
        registry.invoices.upsert(invoice("inv-2", "2026/0002", 98000));

        registry.register("inv-1").unwrap();
        let second = registry.register("inv-2").unwrap();
        assert_eq!(second.block_index, 1);
    }

    #[test]
    fn verify_intact_invoice_and_advance_audit_metadata() {
        let registry = test_registry(test_ledger());
        registry.invoices.upsert(invoice("inv-1", "2026/0001", 120000));
        registry.register("inv-1").unwrap();

        let report = registry.verify("inv-1").unwrap();
        assert!(report.verified);
        assert!(report.hash_match);
        assert!(report.signature_valid);
        assert!(report.blockchain_anchored);
        assert_eq!(report.result, VerificationResult::Intact);

        let entry = registry.entry("inv-1").unwrap().unwrap();
        assert_eq!(entry.tamper_check_count, 1);
        assert!(entry.last_verified_at.is_some());
        assert_eq!(entry.verification_result, Some(VerificationResult::Intact));
        assert_eq!(entry.registration_status, RegistrationStatus::Registered);

        registry.verify("inv-1").unwrap();
        let entry = registry.entry("inv-1").unwrap().unwrap();
        assert_eq!(entry.tamper_check_count, 2);
    }

    #[test]
    fn verify_detects_content_tampering() {
        let registry = test_registry(test_ledger());
        registry.invoices.upsert(invoice("inv-1", "2026/0001", 120000));
        registry.register("inv-1").unwrap();

        // Inflate the amount behind the registry's back.
        registry.invoices.upsert(invoice("inv-1", "2026/0001", 990000));

        let report = registry.verify("inv-1").unwrap();
        assert!(!report.verified);
        assert!(!report.hash_match);
        assert!(report.signature_valid);
        assert!(report.blockchain_anchored);
        assert_eq!(report.result, VerificationResult::Tampered);

        let entry = registry.entry("inv-1").unwrap().unwrap();
        assert_eq!(entry.registration_status, RegistrationStatus::Tampered);
    }

    #[test]
    fn verify_detects_vendor_identity_change() {
        let registry = test_registry(test_ledger());
        registry.invoices.upsert(invoice("inv-1", "2026/0001", 120000));
        registry.register("inv-1").unwrap();

        let mut reassigned = invoice("inv-1", "2026/0001", 120000);
        reassigned.vendor_id = "VEND-999".into();
        registry.invoices.upsert(reassigned);

        let report = registry.verify("inv-1").unwrap();
        assert!(!report.verified);
        // vendor_id is in the projection, so the hash moves too; the
        // signature check fails independently of it.
        assert!(!report.signature_valid);
        assert!(!report.hash_match);
    }

    #[test]
    fn tampered_status_survives_a_later_clean_verify() {
        let registry = test_registry(test_ledger());
        let original = invoice("inv-1", "2026/0001", 120000);
        registry.invoices.upsert(original.clone());
        registry.register("inv-1").unwrap();

        registry.invoices.upsert(invoice("inv-1", "2026/0001", 990000));
        registry.verify("inv-1").unwrap();
        registry.invoices.upsert(original);

        let report = registry.verify("inv-1").unwrap();
        assert!(report.verified);
        let entry = registry.entry("inv-1").unwrap().unwrap();
        assert_eq!(entry.verification_result, Some(VerificationResult::Intact));
        // Terminal: a clean pass never resurrects a tampered registration.
        assert_eq!(entry.registration_status, RegistrationStatus::Tampered);
    }

    #[test]
    fn verify_reports_missing_anchor() {
        // A registry pointed at a different (empty) ledger no longer finds
        // its anchoring block.
        let registry = test_registry(test_ledger());
        registry.invoices.upsert(invoice("inv-1", "2026/0001", 120000));
        let entry = registry.register("inv-1").unwrap();

        let detached = InvoiceRegistry::new(
            test_ledger(),
            InMemoryRegistryStore::new(),
            InMemoryInvoiceSource::new(),
            RegistryConfig::new(SigningSecret::from("registry-secret")),
        );
        detached.entries.insert(entry).unwrap();
        detached
            .invoices
            .upsert(invoice("inv-1", "2026/0001", 120000));

        let report = detached.verify("inv-1").unwrap();
        assert!(!report.verified);
        assert!(report.hash_match);
        assert!(report.signature_valid);
        assert!(!report.blockchain_anchored);
    }

    #[test]
    fn verify_unregistered_invoice_errors() {
        let registry = test_registry(test_ledger());
        assert_eq!(
            registry.verify("inv-404"),
            Err(RegistryError::NotRegistered {
                invoice_id: "inv-404".into()
            })
        );
    }

    #[test]
    fn audit_trail_lists_all_referencing_blocks_in_order() {
        let ledger = test_ledger();
        let registry = test_registry(ledger.clone());
        registry.invoices.upsert(invoice("inv-1", "2026/0001", 120000));
        registry.invoices.upsert(invoice("inv-2", "2026/0002", 98000));

        let entry = registry.register("inv-1").unwrap();
        registry.register("inv-2").unwrap();
        ledger
            .append(
                "funding",
                &json!({"invoice_id": "inv-1", "funded_amount": "1100.00"}),
                false,
            )
            .unwrap();

        let trail = registry.audit_trail("inv-1").unwrap();
        assert_eq!(trail.len(), 2);
        assert_eq!(trail[0].index, entry.block_index);
        assert_eq!(trail[0].data_type, "invoice_registration");
        assert_eq!(trail[1].data_type, "funding");

        assert_eq!(registry.audit_trail("inv-2").unwrap().len(), 1);
        assert_eq!(registry.audit_trail("inv-404").unwrap().len(), 0);
    }

    #[test]
    fn registrations_keep_the_chain_valid() {
        let ledger = test_ledger();
        let registry = test_registry(ledger.clone());
        for n in 1..=4 {
            registry.invoices.upsert(invoice(
                &format!("inv-{n}"),
                &format!("2026/{n:04}"),
                100000 + n * 3500,
            ));
            registry.register(&format!("inv-{n}")).unwrap();
        }

        let report = ledger.validate_chain().unwrap();
        assert!(report.valid);
        assert_eq!(report.total_blocks, 4);
    }
}
