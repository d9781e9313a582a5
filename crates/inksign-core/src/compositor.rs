//! Field compositing
//!
//! Renders one placement onto one page of a loaded model, at coordinates
//! the mapper already converted. Mutates the in-memory model only; persistence
//! stays in the pipeline.

use chrono::Local;

use inksign_pdf::PdfModel;
use inksign_types::{FieldKind, FieldPlacement, MappedBox};

use crate::error::SignError;

const DEFAULT_FONT_SIZE: f64 = 12.0;
/// Text sits this many points above the mapped box's bottom edge.
const TEXT_BASELINE_OFFSET: f64 = 5.0;

/// Fit an image of the given aspect ratio entirely inside `bbox`,
/// preserving the ratio and centering along the slack axis.
///
/// Returns the draw rectangle as `(x, y, width, height)` with `x`/`y` the
/// page-space bottom-left corner.
pub fn fit_image(aspect: f64, bbox: &MappedBox) -> (f64, f64, f64, f64) {
    let box_aspect = bbox.width / bbox.height;

    let (width, height) = if aspect > box_aspect {
        // Image is proportionally wider: clamp to box width.
        (bbox.width, bbox.width / aspect)
    } else {
        // Image is proportionally taller (or equal): clamp to box height.
        (bbox.height * aspect, bbox.height)
    };

    let offset_x = (bbox.width - width) / 2.0;
    let offset_y = (bbox.height - height) / 2.0;
    (bbox.x + offset_x, bbox.bottom() + offset_y, width, height)
}

/// Render `placement` onto `page_index` of the model inside the mapped box.
pub fn composite_field(
    model: &mut PdfModel,
    page_index: usize,
    bbox: &MappedBox,
    placement: &FieldPlacement,
) -> Result<(), SignError> {
    match placement.field_type {
        FieldKind::Signature | FieldKind::Image => {
            let bytes = placement.payload.image.as_deref().ok_or_else(|| {
                SignError::Decode("signature/image field has no image payload".into())
            })?;
            let handle = model.embed_image(bytes)?;
            let (x, y, width, height) = fit_image(handle.aspect(), bbox);
            model.draw_image(page_index, &handle, x, y, width, height)?;
        }
        FieldKind::Text => {
            let text = placement.payload.text.as_deref().unwrap_or("");
            let size = placement.payload.font_size.unwrap_or(DEFAULT_FONT_SIZE);
            model.draw_text(
                page_index,
                text,
                bbox.x,
                bbox.bottom() + TEXT_BASELINE_OFFSET,
                size,
            )?;
        }
        FieldKind::Date => {
            let text = placement
                .payload
                .date
                .clone()
                .unwrap_or_else(|| Local::now().format("%m/%d/%Y").to_string());
            let size = placement.payload.font_size.unwrap_or(DEFAULT_FONT_SIZE);
            model.draw_text(
                page_index,
                &text,
                bbox.x,
                bbox.bottom() + TEXT_BASELINE_OFFSET,
                size,
            )?;
        }
        FieldKind::Radio => {
            // No defined rendering for radio fields; accepted as a no-op
            // until the product question is settled.
            tracing::debug!("radio field on page {} skipped", placement.page_number);
        }
    }
    Ok(())
}
