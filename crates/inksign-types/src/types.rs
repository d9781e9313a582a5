//! Pipeline result surfaces

use serde::{Deserialize, Serialize};

use crate::placement::FieldKind;

/// Returned by an upload: the id the bytes were stored under plus their
/// content hash at ingestion time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub document_id: String,
    pub content_hash: String,
}

/// Locator for a freshly signed document, with enough placement metadata
/// for the audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedLocator {
    pub document_id: String,
    pub field_type: FieldKind,
    pub page_number: u32,
}
