//! Audit trail recording
//!
//! After a signing operation persists its result, the recorder fetches
//! both byte sets, hashes them and appends an immutable [`AuditRecord`].
//! A failure here never rolls back the already-persisted signed document;
//! the caller decides what to do with a signed-but-unaudited artifact.

use std::sync::{Arc, Mutex};

use inksign_types::{AuditRecord, SignedLocator};

use crate::error::SignError;
use crate::hash::content_hash;
use crate::store::ByteStore;

/// Append-only audit record storage.
pub trait AuditStore: Send + Sync {
    fn append(&self, record: AuditRecord) -> Result<(), SignError>;

    /// All records for one original document, most recent first.
    fn query(&self, original_document_id: &str) -> Result<Vec<AuditRecord>, SignError>;
}

/// In-memory audit store.
#[derive(Default)]
pub struct MemoryAuditStore {
    records: Mutex<Vec<AuditRecord>>,
}

impl MemoryAuditStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuditStore for MemoryAuditStore {
    fn append(&self, record: AuditRecord) -> Result<(), SignError> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| SignError::Store("audit store mutex poisoned".into()))?;
        records.push(record);
        Ok(())
    }

    fn query(&self, original_document_id: &str) -> Result<Vec<AuditRecord>, SignError> {
        let records = self
            .records
            .lock()
            .map_err(|_| SignError::Store("audit store mutex poisoned".into()))?;
        Ok(records
            .iter()
            .rev()
            .filter(|r| r.original_document_id == original_document_id)
            .cloned()
            .collect())
    }
}

/// Hashes original/result documents around a signing operation and appends
/// the linking record.
pub struct AuditTrailRecorder {
    bytes: Arc<dyn ByteStore>,
    audit: Arc<dyn AuditStore>,
}

impl AuditTrailRecorder {
    pub fn new(bytes: Arc<dyn ByteStore>, audit: Arc<dyn AuditStore>) -> Self {
        Self { bytes, audit }
    }

    /// Hash both document versions and append a timestamped record.
    ///
    /// Both byte sets must be readable; a missing side is an integrity
    /// failure, since a record asserting hashes nobody can recompute would
    /// be worthless.
    pub fn record(
        &self,
        original_document_id: &str,
        locator: &SignedLocator,
    ) -> Result<AuditRecord, SignError> {
        let original = self.bytes.get(original_document_id).map_err(|e| {
            SignError::Integrity(format!(
                "cannot read original document {}: {}",
                original_document_id, e
            ))
        })?;
        let result = self.bytes.get(&locator.document_id).map_err(|e| {
            SignError::Integrity(format!(
                "cannot read signed document {}: {}",
                locator.document_id, e
            ))
        })?;

        let record = AuditRecord::new(
            original_document_id,
            locator.document_id.clone(),
            content_hash(&original),
            content_hash(&result),
            locator.field_type,
            locator.page_number,
        );
        self.audit.append(record.clone())?;
        tracing::info!(
            "recorded audit entry {} for {} -> {}",
            record.record_id,
            original_document_id,
            locator.document_id
        );
        Ok(record)
    }

    /// All audit records for an original document, most recent first.
    pub fn list(&self, original_document_id: &str) -> Result<Vec<AuditRecord>, SignError> {
        self.audit.query(original_document_id)
    }
}
