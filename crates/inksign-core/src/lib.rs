//! Signature injection engine core
//!
//! Composes visual fields (signature images, text, dates) onto fixed-size
//! document pages at viewport-mapped coordinates, and keeps a hash-based
//! audit trail linking each original document to its signed result.
//!
//! The flow: an upload stores the original bytes and returns an id; a sign
//! request runs [`DocumentSigningPipeline::sign_field`] to produce a new
//! document id; [`AuditTrailRecorder::record`] then hashes both versions and
//! appends an immutable record. Transport, capture UI and durable storage
//! are collaborators behind the [`ByteStore`] and [`AuditStore`] traits.

pub mod audit;
pub mod compositor;
pub mod error;
pub mod hash;
pub mod pipeline;
pub mod store;

pub use audit::{AuditStore, AuditTrailRecorder, MemoryAuditStore};
pub use error::SignError;
pub use hash::content_hash;
pub use pipeline::DocumentSigningPipeline;
pub use store::{ByteStore, FsByteStore, MemoryByteStore};
