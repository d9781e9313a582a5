//! Viewport pixel to page point coordinate transformation
//!
//! The viewer reports field positions in CSS pixels with a top-left origin;
//! PDF pages use points with a bottom-left origin. The scale factors are
//! computed independently per axis from the ratio of page size to viewport
//! size, so the transform absorbs any zoom or resize the viewer applied:
//!
//!   scale_x = page_w / viewport_w
//!   scale_y = page_h / viewport_h
//!   page_x  = x * scale_x
//!   page_y  = page_h - y * scale_y      (vertical flip)
//!
//! Everything here is pure math over immutable inputs.

use inksign_types::{MappedBox, PageSize, ViewportRect, ViewportSize};

use crate::error::PdfError;

fn scale_factors(viewport: &ViewportSize, page: &PageSize) -> Result<(f64, f64), PdfError> {
    if !(viewport.width.is_finite() && viewport.height.is_finite())
        || viewport.width <= 0.0
        || viewport.height <= 0.0
    {
        return Err(PdfError::Configuration(format!(
            "viewport dimensions must be positive, got {}x{}",
            viewport.width, viewport.height
        )));
    }
    Ok((page.width / viewport.width, page.height / viewport.height))
}

/// Map a viewport point onto the page. The returned `y` is flipped, so the
/// viewport's top-left origin becomes the page's bottom-left origin.
pub fn viewport_to_page(
    x: f64,
    y: f64,
    viewport: &ViewportSize,
    page: &PageSize,
) -> Result<(f64, f64), PdfError> {
    let (scale_x, scale_y) = scale_factors(viewport, page)?;
    Ok((x * scale_x, page.height - y * scale_y))
}

/// Map a viewport extent onto the page using the same per-axis scales as
/// [`viewport_to_page`]. No flip is involved for sizes.
pub fn map_size(
    width: f64,
    height: f64,
    viewport: &ViewportSize,
    page: &PageSize,
) -> Result<(f64, f64), PdfError> {
    let (scale_x, scale_y) = scale_factors(viewport, page)?;
    Ok((width * scale_x, height * scale_y))
}

/// Map a full viewport rectangle onto the page.
///
/// The resulting box's `y` is the page-space image of the rectangle's
/// top-left corner, i.e. the box's top edge; see [`MappedBox`].
pub fn map_box(
    rect: &ViewportRect,
    viewport: &ViewportSize,
    page: &PageSize,
) -> Result<MappedBox, PdfError> {
    let (x, y) = viewport_to_page(rect.x, rect.y, viewport, page)?;
    let (width, height) = map_size(rect.width, rect.height, viewport, page)?;
    Ok(MappedBox::new(x, y, width, height))
}
