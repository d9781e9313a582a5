//! Raster payload sniffing and decoding
//!
//! Signature payloads arrive as opaque bytes. The format is decided from
//! the leading bytes alone: a JPEG SOI marker (0xFF 0xD8) means JPEG,
//! anything else is treated as PNG and must survive a PNG decode. A
//! declared mime type is never consulted.

use image::GenericImageView;

use crate::error::PdfError;

/// Formats accepted for signature/image payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterFormat {
    Jpeg,
    Png,
}

/// Decide the payload format from its leading bytes.
pub fn sniff_format(bytes: &[u8]) -> RasterFormat {
    if bytes.len() >= 2 && bytes[0] == 0xFF && bytes[1] == 0xD8 {
        RasterFormat::Jpeg
    } else {
        RasterFormat::Png
    }
}

/// Pixel data ready for PDF embedding.
#[derive(Debug)]
pub(crate) enum RasterPixels {
    /// Original JPEG bytes, embedded verbatim behind a DCTDecode filter.
    Jpeg(Vec<u8>),
    /// Decoded PNG split into an RGB plane and an alpha plane (the alpha
    /// becomes an SMask so transparent signature backgrounds composite
    /// over page content).
    Rgba { rgb: Vec<u8>, alpha: Vec<u8> },
}

/// A decoded payload with its natural pixel dimensions.
#[derive(Debug)]
pub(crate) struct DecodedRaster {
    pub format: RasterFormat,
    pub width: u32,
    pub height: u32,
    pub pixels: RasterPixels,
}

pub(crate) fn decode(bytes: &[u8]) -> Result<DecodedRaster, PdfError> {
    match sniff_format(bytes) {
        RasterFormat::Jpeg => {
            let img = image::load_from_memory_with_format(bytes, image::ImageFormat::Jpeg)
                .map_err(|e| PdfError::Decode(format!("invalid JPEG data: {}", e)))?;
            let (width, height) = img.dimensions();
            Ok(DecodedRaster {
                format: RasterFormat::Jpeg,
                width,
                height,
                pixels: RasterPixels::Jpeg(bytes.to_vec()),
            })
        }
        RasterFormat::Png => {
            let img = image::load_from_memory_with_format(bytes, image::ImageFormat::Png)
                .map_err(|e| PdfError::Decode(format!("invalid PNG data: {}", e)))?;
            let (width, height) = img.dimensions();
            let rgba = img.to_rgba8();

            let mut rgb = Vec::with_capacity((width * height * 3) as usize);
            let mut alpha = Vec::with_capacity((width * height) as usize);
            for pixel in rgba.pixels() {
                rgb.extend_from_slice(&pixel.0[..3]);
                alpha.push(pixel.0[3]);
            }

            Ok(DecodedRaster {
                format: RasterFormat::Png,
                width,
                height,
                pixels: RasterPixels::Rgba { rgb, alpha },
            })
        }
    }
}
