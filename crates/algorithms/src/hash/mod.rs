//! Fixed-output hashing

use sha2::{Digest, Sha256};

/// Output length of [`sha256`]
pub const HASH_BYTES: usize = 32;

/// SHA-256 of `data`
pub fn sha256(data: &[u8]) -> [u8; HASH_BYTES] {
    Sha256::digest(data).into()
}
