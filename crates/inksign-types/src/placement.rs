//! Field placement requests
//!
//! A placement is what the capture UI produces: which kind of field goes
//! where on which page, together with its payload.

use serde::{Deserialize, Serialize};

use crate::geometry::{ViewportRect, ViewportSize};

/// The closed set of field kinds the compositor understands.
///
/// `Radio` is accepted on the wire but has no defined rendering; the
/// compositor treats it as a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Signature,
    Image,
    Text,
    Date,
    Radio,
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldKind::Signature => write!(f, "signature"),
            FieldKind::Image => write!(f, "image"),
            FieldKind::Text => write!(f, "text"),
            FieldKind::Date => write!(f, "date"),
            FieldKind::Radio => write!(f, "radio"),
        }
    }
}

/// Payload attached to a placement. Which members are meaningful depends on
/// the field kind; unused members are simply ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldPayload {
    /// Raster bytes for signature/image fields. The format is sniffed from
    /// the leading bytes, never from a declared mime type.
    #[serde(default)]
    pub image: Option<Vec<u8>>,
    /// Text content for text fields.
    #[serde(default)]
    pub text: Option<String>,
    /// Preformatted date string for date fields; defaults to today when
    /// absent.
    #[serde(default)]
    pub date: Option<String>,
    /// Font size in points for text/date fields; defaults to 12.
    #[serde(default)]
    pub font_size: Option<f64>,
}

/// A request to render one field at a viewport location on a given page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldPlacement {
    pub field_type: FieldKind,
    /// 1-based page number as reported by the viewer.
    pub page_number: u32,
    pub rect: ViewportRect,
    pub viewport: ViewportSize,
    #[serde(default)]
    pub payload: FieldPayload,
}

impl FieldPlacement {
    pub fn signature(
        page_number: u32,
        rect: ViewportRect,
        viewport: ViewportSize,
        image: Vec<u8>,
    ) -> Self {
        Self {
            field_type: FieldKind::Signature,
            page_number,
            rect,
            viewport,
            payload: FieldPayload {
                image: Some(image),
                ..Default::default()
            },
        }
    }

    pub fn text(
        page_number: u32,
        rect: ViewportRect,
        viewport: ViewportSize,
        text: impl Into<String>,
    ) -> Self {
        Self {
            field_type: FieldKind::Text,
            page_number,
            rect,
            viewport,
            payload: FieldPayload {
                text: Some(text.into()),
                ..Default::default()
            },
        }
    }

    pub fn date(page_number: u32, rect: ViewportRect, viewport: ViewportSize) -> Self {
        Self {
            field_type: FieldKind::Date,
            page_number,
            rect,
            viewport,
            payload: FieldPayload::default(),
        }
    }
}
