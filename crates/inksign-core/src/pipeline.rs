//! Document signing pipeline
//!
//! Orchestrates one field placement: load the original bytes, map the
//! viewport rectangle into page space, composite the field, persist the
//! result under a fresh id. Every call loads its own model instance; no
//! document state is shared or cached across invocations.
//!
//! Known contract: signing always starts from the *original* document id.
//! N placements applied through N calls yield N independent single-field
//! documents, never one composite.

use std::sync::Arc;

use inksign_pdf::{coords, PdfModel};
use inksign_types::{FieldPlacement, SignedLocator, UploadReceipt};

use crate::compositor::composite_field;
use crate::error::SignError;
use crate::hash::content_hash;
use crate::store::ByteStore;

pub struct DocumentSigningPipeline {
    store: Arc<dyn ByteStore>,
}

impl DocumentSigningPipeline {
    pub fn new(store: Arc<dyn ByteStore>) -> Self {
        Self { store }
    }

    /// Store original document bytes and return the allocated id together
    /// with the content hash at ingestion time.
    pub fn upload(&self, bytes: Vec<u8>) -> Result<UploadReceipt, SignError> {
        let content_hash = content_hash(&bytes);
        let document_id = self.store.put(bytes)?;
        tracing::info!("uploaded document {}", document_id);
        Ok(UploadReceipt {
            document_id,
            content_hash,
        })
    }

    /// Render one field placement onto the document stored under
    /// `document_id` and persist the result as a new document.
    ///
    /// Nothing is persisted unless mapping, compositing and serialization
    /// all succeed.
    pub fn sign_field(
        &self,
        document_id: &str,
        placement: &FieldPlacement,
    ) -> Result<SignedLocator, SignError> {
        let bytes = self.store.get(document_id)?;
        let mut model = PdfModel::load(&bytes)?;

        let page_count = model.page_count();
        if page_count == 0 {
            return Err(SignError::Document("document has no pages".into()));
        }

        // 1-based page number; out-of-range requests fall back to the
        // first page rather than failing. Kept as a documented contract.
        let requested = placement.page_number.saturating_sub(1) as usize;
        let page_index = if requested < page_count { requested } else { 0 };
        if requested != page_index {
            tracing::warn!(
                "page {} out of range for {}-page document {}, falling back to page 1",
                placement.page_number,
                page_count,
                document_id
            );
        }

        let page_size = model.page_size(page_index)?;
        let bbox = coords::map_box(&placement.rect, &placement.viewport, &page_size)?;
        composite_field(&mut model, page_index, &bbox, placement)?;

        let signed = model.save()?;
        let result_id = self.store.put(signed)?;
        tracing::info!(
            "signed {} field on document {} -> {}",
            placement.field_type,
            document_id,
            result_id
        );

        Ok(SignedLocator {
            document_id: result_id,
            field_type: placement.field_type,
            page_number: placement.page_number,
        })
    }
}
