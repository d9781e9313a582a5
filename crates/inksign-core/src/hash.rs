//! Content hashing
//!
//! SHA-256 over raw bytes, hex-encoded. This is the tamper-evidence
//! primitive the audit trail is built on; it must stay a pure function of
//! its input.

use sha2::{Digest, Sha256};

/// Compute the SHA-256 hex digest of a byte sequence.
pub fn content_hash(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
