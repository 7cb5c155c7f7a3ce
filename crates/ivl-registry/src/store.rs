use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use ivl_types::{LedgerHash, RegistrationStatus, VerificationResult};

use crate::entry::RegistryEntry;
use crate::error::RegistryError;
use crate::invoice::Invoice;

/// Storage boundary for registry entries.
///
/// Implementations must enforce uniqueness on both `invoice_id` and
/// `invoice_hash`, and must expose exactly one mutation path after insert:
/// [`RegistryStore::record_verification`], which touches audit metadata
/// only. Hash and signature fields are write-once.
pub trait RegistryStore: Send + Sync {
    /// Fetch an entry by invoice id.
    fn get(&self, invoice_id: &str) -> Result<Option<RegistryEntry>, RegistryError>;

    /// Find the entry holding the given projection hash, if any.
    fn find_by_invoice_hash(
        &self,
        hash: &LedgerHash,
    ) -> Result<Option<RegistryEntry>, RegistryError>;

    /// Persist a freshly registered entry.
    fn insert(&self, entry: RegistryEntry) -> Result<(), RegistryError>;

    /// Record the outcome of a verification pass: bumps the check counter,
    /// stamps the time, stores the result, and degrades the registration
    /// status to `Tampered` when the result demands it. `Tampered` is
    /// terminal: a later intact result never restores the status.
    fn record_verification(
        &self,
        invoice_id: &str,
        result: VerificationResult,
        at: DateTime<Utc>,
    ) -> Result<RegistryEntry, RegistryError>;

    /// All entries, in no particular order.
    fn all(&self) -> Result<Vec<RegistryEntry>, RegistryError>;
}

/// In-memory registry store for tests, local demos, and embedding.
pub struct InMemoryRegistryStore {
    entries: RwLock<HashMap<String, RegistryEntry>>,
}

impl InMemoryRegistryStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryRegistryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryStore for InMemoryRegistryStore {
    fn get(&self, invoice_id: &str) -> Result<Option<RegistryEntry>, RegistryError> {
        let entries = self.entries.read().expect("registry lock poisoned");
        Ok(entries.get(invoice_id).cloned())
    }

    fn find_by_invoice_hash(
        &self,
        hash: &LedgerHash,
    ) -> Result<Option<RegistryEntry>, RegistryError> {
        let entries = self.entries.read().expect("registry lock poisoned");
        Ok(entries.values().find(|e| e.invoice_hash == *hash).cloned())
    }

    fn insert(&self, entry: RegistryEntry) -> Result<(), RegistryError> {
        let mut entries = self.entries.write().expect("registry lock poisoned");
        if entries.contains_key(&entry.invoice_id) {
            return Err(RegistryError::AlreadyRegistered {
                invoice_id: entry.invoice_id,
            });
        }
        if let Some(existing) = entries.values().find(|e| e.invoice_hash == entry.invoice_hash) {
            return Err(RegistryError::DuplicateContent {
                existing_invoice_id: existing.invoice_id.clone(),
            });
        }
        entries.insert(entry.invoice_id.clone(), entry);
        Ok(())
    }

    fn record_verification(
        &self,
        invoice_id: &str,
        result: VerificationResult,
        at: DateTime<Utc>,
    ) -> Result<RegistryEntry, RegistryError> {
        let mut entries = self.entries.write().expect("registry lock poisoned");
        let entry = entries
            .get_mut(invoice_id)
            .ok_or_else(|| RegistryError::NotRegistered {
                invoice_id: invoice_id.to_string(),
            })?;

        entry.tamper_check_count += 1;
        entry.last_verified_at = Some(at);
        entry.verification_result = Some(result);
        if result == VerificationResult::Tampered {
            entry.registration_status = RegistrationStatus::Tampered;
        }
        Ok(entry.clone())
    }

    fn all(&self) -> Result<Vec<RegistryEntry>, RegistryError> {
        let entries = self.entries.read().expect("registry lock poisoned");
        Ok(entries.values().cloned().collect())
    }
}

impl std::fmt::Debug for InMemoryRegistryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entries = self.entries.read().expect("registry lock poisoned");
        f.debug_struct("InMemoryRegistryStore")
            .field("entries", &entries.len())
            .finish()
    }
}

/// Read boundary to the platform's invoice table.
///
/// The registry never owns invoice records; it loads their current state
/// through this trait, both at registration and at every re-verification.
pub trait InvoiceSource: Send + Sync {
    fn load(&self, invoice_id: &str) -> Result<Option<Invoice>, RegistryError>;
}

/// In-memory invoice source for tests, local demos, and embedding.
pub struct InMemoryInvoiceSource {
    invoices: RwLock<HashMap<String, Invoice>>,
}

impl InMemoryInvoiceSource {
    pub fn new() -> Self {
        Self {
            invoices: RwLock::new(HashMap::new()),
        }
    }

    /// Insert or replace an invoice record.
    pub fn upsert(&self, invoice: Invoice) {
        let mut invoices = self.invoices.write().expect("invoice lock poisoned");
        invoices.insert(invoice.invoice_id.clone(), invoice);
    }

    /// Remove an invoice record. Returns `true` if it existed.
    pub fn remove(&self, invoice_id: &str) -> bool {
        let mut invoices = self.invoices.write().expect("invoice lock poisoned");
        invoices.remove(invoice_id).is_some()
    }
}

impl Default for InMemoryInvoiceSource {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceSource for InMemoryInvoiceSource {
    fn load(&self, invoice_id: &str) -> Result<Option<Invoice>, RegistryError> {
        let invoices = self.invoices.read().expect("invoice lock poisoned");
        Ok(invoices.get(invoice_id).cloned())
    }
}
