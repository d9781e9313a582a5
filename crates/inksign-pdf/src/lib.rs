//! PDF-backed document model for the signature injection engine
//!
//! Wraps `lopdf` behind the small surface the signing pipeline needs:
//! loading, page inspection, image embedding, content-stream drawing and
//! serialization. Also hosts the viewport-to-page coordinate mapper, since
//! the page's point space is a PDF concern.

pub mod coords;
pub mod error;
pub mod model;
pub mod raster;
pub mod sample;

#[cfg(test)]
pub(crate) mod testutil;

pub use coords::{map_box, map_size, viewport_to_page};
pub use error::PdfError;
pub use model::{ImageHandle, PdfModel};
pub use raster::{sniff_format, RasterFormat};
pub use sample::sample_document;
