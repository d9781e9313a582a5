//! Tamper-evident audit records for signing operations
//!
//! Each record asserts the content hashes of a document pair around one
//! signing operation. Records are append-only; nothing ever edits one in
//! place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::placement::FieldKind;

/// An immutable entry linking an original document to a signed result by
/// content hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub record_id: String,
    pub original_document_id: String,
    pub result_document_id: String,
    /// SHA-256 hex digest of the bytes stored under `original_document_id`
    /// at the time this record was created.
    pub original_hash: String,
    /// SHA-256 hex digest of the bytes stored under `result_document_id`.
    pub result_hash: String,
    pub timestamp: DateTime<Utc>,
    pub field_type: FieldKind,
    pub page_number: u32,
}

impl AuditRecord {
    pub fn new(
        original_document_id: impl Into<String>,
        result_document_id: impl Into<String>,
        original_hash: impl Into<String>,
        result_hash: impl Into<String>,
        field_type: FieldKind,
        page_number: u32,
    ) -> Self {
        Self {
            record_id: Uuid::new_v4().to_string(),
            original_document_id: original_document_id.into(),
            result_document_id: result_document_id.into(),
            original_hash: original_hash.into(),
            result_hash: result_hash.into(),
            timestamp: Utc::now(),
            field_type,
            page_number,
        }
    }
}
