//! Sample document generation
//!
//! Builds a one-page A4 document with labeled signature and date areas,
//! handy for exercising the signing pipeline end to end without shipping
//! fixture files.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};

use crate::error::PdfError;

const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;

fn text_op(ops: &mut Vec<Operation>, font: &str, size: f32, x: f32, y: f32, text: &str) {
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new("Tf", vec![font.into(), size.into()]));
    ops.push(Operation::new("Td", vec![x.into(), y.into()]));
    ops.push(Operation::new("Tj", vec![Object::string_literal(text)]));
    ops.push(Operation::new("ET", vec![]));
}

/// Build a sample A4 page with signature and date labels. Returns the
/// serialized document bytes.
pub fn sample_document() -> Result<Vec<u8>, PdfError> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let mut ops = Vec::new();
    text_op(
        &mut ops,
        "F2",
        20.0,
        50.0,
        PAGE_HEIGHT - 50.0,
        "Sample Document for Signature Testing",
    );
    text_op(
        &mut ops,
        "F1",
        12.0,
        50.0,
        PAGE_HEIGHT - 100.0,
        "Drag signature, text, image and date fields anywhere on this page.",
    );
    text_op(
        &mut ops,
        "F1",
        12.0,
        50.0,
        PAGE_HEIGHT - 130.0,
        "Fields keep their on-screen position regardless of viewport size or zoom.",
    );
    text_op(&mut ops, "F2", 14.0, 50.0, PAGE_HEIGHT - 250.0, "Signature Area:");
    text_op(&mut ops, "F2", 14.0, 50.0, PAGE_HEIGHT - 350.0, "Date:");
    text_op(&mut ops, "F1", 10.0, 50.0, 50.0, "Signature Injection Engine");

    let encoded = Content { operations: ops }
        .encode()
        .map_err(|e| PdfError::Operation(format!("failed to encode content stream: {}", e)))?;
    let content_id = doc.add_object(Stream::new(Dictionary::new(), encoded));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        "Contents" => content_id,
        "Resources" => dictionary! {
            "Font" => dictionary! {
                "F1" => dictionary! {
                    "Type" => "Font",
                    "Subtype" => "Type1",
                    "BaseFont" => "Helvetica",
                },
                "F2" => dictionary! {
                    "Type" => "Font",
                    "Subtype" => "Type1",
                    "BaseFont" => "Helvetica-Bold",
                },
            },
        },
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => 1,
            "Kids" => vec![Object::Reference(page_id)],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| PdfError::Operation(format!("failed to serialize sample PDF: {}", e)))?;
    Ok(buffer)
}
