// kem/src/mlkem/ind_cca.rs

//! Deterministic encapsulation and the message recovery it is checked
//! against.
//!
//! Encapsulation with a fixed message `m` is a pure function of `(pk, m)`,
//! which is what lets decapsulation re-encrypt the recovered message and
//! compare ciphertexts.
//!
//! Message recovery reads only the public key embedded in the secret key.
//! The packed secret vector `s` is never used for decryption: the stand-in
//! ciphertext hides `m` under a pad derived from `H(pk)`, so anyone holding
//! `pk` can recover it. The secret key still carries `s` so its size and
//! layout match the real scheme.

use kemscope_algorithms::hash::{sha256, HASH_BYTES};
use kemscope_algorithms::xof::expand;
use kemscope_api::SharedSecret;
use kemscope_common::SecretBuffer;
use kemscope_params::{SEED_BYTES, SHARED_SECRET_BYTES};

/// Domain tag for the message pad
const PAD_DOMAIN: &[u8] = b"pad";

/// Message size
pub(crate) const MESSAGE_BYTES: usize = SEED_BYTES;

pub(crate) type Message = SecretBuffer<MESSAGE_BYTES>;

// pad(pk) = XOF("pad" ‖ H(pk), 32)
fn message_pad(pk_hash: &[u8; HASH_BYTES]) -> [u8; MESSAGE_BYTES] {
    let mut pad = [0u8; MESSAGE_BYTES];
    pad.copy_from_slice(&expand(&[PAD_DOMAIN, pk_hash], MESSAGE_BYTES));
    pad
}

/// Encapsulate `m` under `pk` into a ciphertext of `ct_len` bytes.
///
/// `K ‖ r = XOF(m ‖ H(pk), 64)`, then
/// `c = (m ⊕ pad(pk)) ‖ XOF(pk ‖ m ‖ r, ct_len − 32)`.
pub(crate) fn encaps_deterministic(
    pk: &[u8],
    m: &Message,
    ct_len: usize,
) -> (Vec<u8>, SharedSecret) {
    let pk_hash = sha256(pk);

    let kr = SecretBuffer::<{ 2 * SHARED_SECRET_BYTES }>::from_prefix(&expand(
        &[m.as_slice(), &pk_hash],
        2 * SHARED_SECRET_BYTES,
    ));
    let (k, r) = kr.as_slice().split_at(SHARED_SECRET_BYTES);

    let pad = message_pad(&pk_hash);
    let mut ct = Vec::with_capacity(ct_len);
    ct.extend(m.as_slice().iter().zip(pad.iter()).map(|(a, b)| a ^ b));
    ct.extend_from_slice(&expand(
        &[pk, m.as_slice(), r],
        ct_len.saturating_sub(MESSAGE_BYTES),
    ));
    ct.truncate(ct_len);

    let mut key = SharedSecret::zeroed();
    key.copy_from_slice(k);
    (ct, key)
}

/// Candidate message `m' = c[..32] ⊕ pad(pk)`. Missing ciphertext bytes
/// count as zero.
pub(crate) fn recover_message(pk: &[u8], ct: &[u8]) -> Message {
    let pad = message_pad(&sha256(pk));
    let mut m = Message::zeroed();
    for (i, out) in m.as_mut_slice().iter_mut().enumerate() {
        *out = ct.get(i).copied().unwrap_or(0) ^ pad[i];
    }
    m
}
