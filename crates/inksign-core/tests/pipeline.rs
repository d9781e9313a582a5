//! End-to-end pipeline tests: upload, sign, audit.

use std::io::Cursor;
use std::sync::Arc;

use lopdf::{dictionary, Dictionary, Document, Object, Stream};
use pretty_assertions::assert_eq;

use inksign_core::{
    content_hash, AuditStore, AuditTrailRecorder, ByteStore, DocumentSigningPipeline,
    MemoryAuditStore, MemoryByteStore, SignError,
};
use inksign_types::{
    AuditRecord, FieldKind, FieldPayload, FieldPlacement, ViewportRect, ViewportSize,
};

fn multi_page_pdf(pages: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let kids: Vec<Object> = (0..pages)
        .map(|_| {
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            });
            Object::Reference(page_id)
        })
        .collect();

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => pages as i64,
            "Kids" => kids,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

fn signature_png() -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(40, 20, image::Rgba([10, 10, 10, 230]));
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

fn viewport() -> ViewportSize {
    ViewportSize::new(800.0, 1000.0)
}

fn field_rect() -> ViewportRect {
    ViewportRect::new(100.0, 200.0, 200.0, 100.0)
}

/// Text drawn on a page, recovered from its decoded content streams.
fn page_text(bytes: &[u8], page_number: u32) -> String {
    let doc = Document::load_mem(bytes).unwrap();
    let page_id = *doc.get_pages().get(&page_number).unwrap();
    let content = doc.get_page_content(page_id).unwrap_or_default();
    if content.is_empty() {
        return String::new();
    }
    let decoded = Stream::new(Dictionary::new(), content)
        .decode_content()
        .unwrap();

    let mut text = String::new();
    for op in decoded.operations {
        if op.operator == "Tj" {
            if let Some(Object::String(bytes, _)) = op.operands.first() {
                text.push_str(&String::from_utf8_lossy(bytes));
            }
        }
    }
    text
}

#[test]
fn signing_persists_a_new_independent_document() {
    let store: Arc<dyn ByteStore> = Arc::new(MemoryByteStore::new());
    let pipeline = DocumentSigningPipeline::new(store.clone());

    let receipt = pipeline.upload(multi_page_pdf(1)).unwrap();
    let placement =
        FieldPlacement::signature(1, field_rect(), viewport(), signature_png());
    let locator = pipeline.sign_field(&receipt.document_id, &placement).unwrap();

    assert_ne!(locator.document_id, receipt.document_id);
    assert_eq!(locator.field_type, FieldKind::Signature);

    // Original bytes are untouched; the result is a loadable document.
    let original = store.get(&receipt.document_id).unwrap();
    assert_eq!(content_hash(&original), receipt.content_hash);
    let signed = store.get(&locator.document_id).unwrap();
    assert!(signed.starts_with(b"%PDF-"));
    assert_ne!(signed, original);
}

#[test]
fn unknown_document_id_is_not_found() {
    let pipeline = DocumentSigningPipeline::new(Arc::new(MemoryByteStore::new()));
    let placement = FieldPlacement::text(1, field_rect(), viewport(), "x");
    let err = pipeline.sign_field("missing", &placement).unwrap_err();
    assert!(matches!(err, SignError::NotFound(_)));
}

#[test]
fn out_of_range_page_falls_back_to_first_page() {
    // Out-of-range page numbers are clamped to page 1, never rejected.
    let store: Arc<dyn ByteStore> = Arc::new(MemoryByteStore::new());
    let pipeline = DocumentSigningPipeline::new(store.clone());

    let receipt = pipeline.upload(multi_page_pdf(3)).unwrap();
    let placement = FieldPlacement::text(99, field_rect(), viewport(), "fallback");
    let locator = pipeline.sign_field(&receipt.document_id, &placement).unwrap();

    let signed = store.get(&locator.document_id).unwrap();
    assert!(page_text(&signed, 1).contains("fallback"));
    assert!(!page_text(&signed, 2).contains("fallback"));
    assert!(!page_text(&signed, 3).contains("fallback"));
}

#[test]
fn each_sign_call_starts_from_the_original() {
    // Two sequential calls yield two independent single-field documents,
    // never a merged one.
    let store: Arc<dyn ByteStore> = Arc::new(MemoryByteStore::new());
    let pipeline = DocumentSigningPipeline::new(store.clone());

    let receipt = pipeline.upload(multi_page_pdf(1)).unwrap();
    let first = pipeline
        .sign_field(
            &receipt.document_id,
            &FieldPlacement::text(1, field_rect(), viewport(), "alpha"),
        )
        .unwrap();
    let second = pipeline
        .sign_field(
            &receipt.document_id,
            &FieldPlacement::text(1, field_rect(), viewport(), "beta"),
        )
        .unwrap();

    assert_ne!(first.document_id, second.document_id);

    let first_text = page_text(&store.get(&first.document_id).unwrap(), 1);
    let second_text = page_text(&store.get(&second.document_id).unwrap(), 1);
    assert!(first_text.contains("alpha"));
    assert!(!first_text.contains("beta"));
    assert!(second_text.contains("beta"));
    assert!(!second_text.contains("alpha"));
}

#[test]
fn failed_compositing_persists_nothing() {
    struct CountingStore {
        inner: MemoryByteStore,
        puts: std::sync::atomic::AtomicUsize,
    }
    impl ByteStore for CountingStore {
        fn put(&self, bytes: Vec<u8>) -> Result<String, SignError> {
            self.puts.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            self.inner.put(bytes)
        }
        fn get(&self, id: &str) -> Result<Vec<u8>, SignError> {
            self.inner.get(id)
        }
    }

    let store = Arc::new(CountingStore {
        inner: MemoryByteStore::new(),
        puts: std::sync::atomic::AtomicUsize::new(0),
    });
    let pipeline = DocumentSigningPipeline::new(store.clone());

    let receipt = pipeline.upload(multi_page_pdf(1)).unwrap();
    let placement = FieldPlacement::signature(
        1,
        field_rect(),
        viewport(),
        b"not an image at all".to_vec(),
    );
    let err = pipeline.sign_field(&receipt.document_id, &placement).unwrap_err();
    assert!(matches!(err, SignError::Decode(_)));

    // Only the upload ever hit the store.
    assert_eq!(store.puts.load(std::sync::atomic::Ordering::SeqCst), 1);
}

#[test]
fn zero_viewport_surfaces_a_configuration_error() {
    let pipeline = DocumentSigningPipeline::new(Arc::new(MemoryByteStore::new()));
    let receipt = pipeline.upload(multi_page_pdf(1)).unwrap();

    let placement = FieldPlacement::text(
        1,
        field_rect(),
        ViewportSize::new(0.0, 1000.0),
        "never drawn",
    );
    let err = pipeline.sign_field(&receipt.document_id, &placement).unwrap_err();
    assert!(matches!(err, SignError::Configuration(_)));
}

#[test]
fn audit_record_hashes_match_stored_bytes() {
    let store: Arc<dyn ByteStore> = Arc::new(MemoryByteStore::new());
    let audit: Arc<dyn AuditStore> = Arc::new(MemoryAuditStore::new());
    let pipeline = DocumentSigningPipeline::new(store.clone());
    let recorder = AuditTrailRecorder::new(store.clone(), audit);

    let receipt = pipeline.upload(multi_page_pdf(2)).unwrap();
    let placement =
        FieldPlacement::signature(2, field_rect(), viewport(), signature_png());
    let locator = pipeline.sign_field(&receipt.document_id, &placement).unwrap();

    let record = recorder.record(&receipt.document_id, &locator).unwrap();

    assert_eq!(record.original_hash, receipt.content_hash);
    assert_eq!(
        record.result_hash,
        content_hash(&store.get(&locator.document_id).unwrap())
    );
    assert_eq!(record.field_type, FieldKind::Signature);
    assert_eq!(record.page_number, 2);

    let listed = recorder.list(&receipt.document_id).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0], record);
}

#[test]
fn audit_failure_leaves_signed_document_retrievable() {
    struct FailingAuditStore;
    impl AuditStore for FailingAuditStore {
        fn append(&self, _record: AuditRecord) -> Result<(), SignError> {
            Err(SignError::Store("audit backend unavailable".into()))
        }
        fn query(&self, _id: &str) -> Result<Vec<AuditRecord>, SignError> {
            Ok(Vec::new())
        }
    }

    let store: Arc<dyn ByteStore> = Arc::new(MemoryByteStore::new());
    let pipeline = DocumentSigningPipeline::new(store.clone());
    let recorder = AuditTrailRecorder::new(store.clone(), Arc::new(FailingAuditStore));

    let receipt = pipeline.upload(multi_page_pdf(1)).unwrap();
    let placement = FieldPlacement::text(1, field_rect(), viewport(), "kept");
    let locator = pipeline.sign_field(&receipt.document_id, &placement).unwrap();

    assert!(recorder.record(&receipt.document_id, &locator).is_err());

    // The signed artifact survives the audit failure.
    let signed = store.get(&locator.document_id).unwrap();
    assert!(page_text(&signed, 1).contains("kept"));
}

#[test]
fn radio_placement_signs_without_drawing() {
    let store: Arc<dyn ByteStore> = Arc::new(MemoryByteStore::new());
    let pipeline = DocumentSigningPipeline::new(store.clone());

    let receipt = pipeline.upload(multi_page_pdf(1)).unwrap();
    let placement = FieldPlacement {
        field_type: FieldKind::Radio,
        page_number: 1,
        rect: field_rect(),
        viewport: viewport(),
        payload: FieldPayload::default(),
    };
    let locator = pipeline.sign_field(&receipt.document_id, &placement).unwrap();

    // A new document is still produced, with nothing drawn on it.
    assert_ne!(locator.document_id, receipt.document_id);
    assert_eq!(page_text(&store.get(&locator.document_id).unwrap(), 1), "");
}
