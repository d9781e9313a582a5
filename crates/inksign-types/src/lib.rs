//! Shared data model for the signature injection engine
//!
//! Pure data types exchanged between the coordinate mapper, the field
//! compositor, the signing pipeline and the audit recorder. No I/O lives
//! here.

pub mod audit;
pub mod geometry;
pub mod placement;
pub mod types;

pub use audit::AuditRecord;
pub use geometry::{MappedBox, PageSize, ViewportRect, ViewportSize};
pub use placement::{FieldKind, FieldPayload, FieldPlacement};
pub use types::{SignedLocator, UploadReceipt};
