//! Checksums for migration SQL
//!
//! A SHA-256 of the batch text is logged whenever a SQL step is applied, so
//! two databases can be compared on exactly which SQL brought them forward.

use sha2::{Digest, Sha256};

/// Compute the hex-encoded SHA-256 of `content`
pub fn compute_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
