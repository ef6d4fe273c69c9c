// kem/src/mlkem/serialize.rs

//! Key layouts.
//!
//! Parsing never fails: keys are split at fixed offsets and a short key just
//! yields short parts. Length is public, so the split itself leaks nothing.

use kemscope_algorithms::poly::serialize::pack12;
use kemscope_params::{ParameterSet, SEED_BYTES};

/// Borrowed view of a public key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicKeyParts<'a> {
    /// Matrix seed
    pub rho: &'a [u8],
    /// `t` packed at 12 bits per coefficient
    pub packed_t: &'a [u8],
}

impl<'a> PublicKeyParts<'a> {
    /// Split `pk` after the seed
    pub fn parse(pk: &'a [u8]) -> Self {
        let (rho, packed_t) = pk.split_at(SEED_BYTES.min(pk.len()));
        Self { rho, packed_t }
    }
}

/// Split a secret key into the packed secret vector and the embedded public
/// key
pub fn split_secret_key<'a>(params: &ParameterSet, sk: &'a [u8]) -> (&'a [u8], &'a [u8]) {
    sk.split_at(params.polyvec_bytes().min(sk.len()))
}

/// `rho ‖ pack12(t)`, bounded by the public key size
pub(crate) fn pack_public_key(params: &ParameterSet, rho: &[u8], t: &[u32]) -> Vec<u8> {
    let mut pk = Vec::with_capacity(params.public_key_size());
    pk.extend_from_slice(rho);
    pk.extend_from_slice(&pack12(t));
    pk.truncate(params.public_key_size());
    pk
}

/// `pack12(s) ‖ pk`, bounded by the secret key size
pub(crate) fn pack_secret_key(params: &ParameterSet, s: &[u32], pk: &[u8]) -> Vec<u8> {
    let mut packed = pack12(s);
    packed.truncate(params.polyvec_bytes());
    let mut sk = Vec::with_capacity(params.secret_key_size());
    sk.extend_from_slice(&packed);
    sk.extend_from_slice(pk);
    sk
}
