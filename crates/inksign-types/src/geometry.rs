//! Viewport and page geometry
//!
//! Two coordinate systems meet here: the caller's viewport (CSS pixels,
//! origin top-left) and a PDF page (points, origin bottom-left). The mapper
//! in `inksign-pdf` converts between them; these are just the carriers.

use serde::{Deserialize, Serialize};

/// A field's on-screen rectangle, in viewport pixels with a top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewportRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// The dimensions of the viewport the rectangle was captured in.
///
/// The viewer may be zoomed or resized arbitrarily; only the ratio between
/// these dimensions and the page's point size matters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

impl ViewportSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Intrinsic page dimensions in PDF points.
///
/// Fixed at document creation and independent of any viewport that later
/// references the page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn letter() -> Self {
        Self {
            width: 612.0,
            height: 792.0,
        }
    }

    pub fn a4() -> Self {
        Self {
            width: 595.0,
            height: 842.0,
        }
    }
}

/// A viewport rectangle mapped into page space.
///
/// `x`/`y` are the page-space image of the viewport rectangle's top-left
/// corner after the vertical flip, so `y` is the box's *top* edge; the
/// bottom edge sits at `y - height`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MappedBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl MappedBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Page-space y of the box's bottom edge.
    pub fn bottom(&self) -> f64 {
        self.y - self.height
    }
}
