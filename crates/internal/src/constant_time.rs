//! Constant-time operations to prevent timing attacks
//!
//! Every routine here derives its control flow from public values only
//! (lengths, moduli). Secret-dependent decisions are turned into all-ones or
//! all-zeros masks and applied arithmetically.

use core::hint::black_box;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

/// Constant-time comparison of two byte slices backed by `subtle`
///
/// Returns true if the slices are equal, false otherwise.
pub fn ct_eq<A, B>(a: A, b: B) -> bool
where
    A: AsRef<[u8]>,
    B: AsRef<[u8]>,
{
    let a = a.as_ref();
    let b = b.as_ref();

    if a.len() != b.len() {
        return false;
    }

    a.ct_eq(b).into()
}

/// Compare two byte strings without short-circuiting.
///
/// A length mismatch returns false straight away since lengths are public.
/// Otherwise the XOR of every byte pair is OR-ed into one accumulator and
/// only the final accumulator is inspected, so the running time does not
/// depend on where the first difference sits.
pub fn compare_equal(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut acc = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        acc = black_box(acc | (x ^ y));
    }

    acc.ct_eq(&0u8).into()
}

/// Constant-time mask generation for a condition bit
///
/// Returns `0xFFFF_FFFF` if the low bit of `bit` is set, `0` otherwise.
#[inline(always)]
pub fn ct_mask_u32(bit: u32) -> u32 {
    0u32.wrapping_sub(bit & 1)
}

/// Branch-free selection: `a` if the low bit of `bit` is 1, else `b`.
#[inline(always)]
pub fn select(bit: u32, a: u32, b: u32) -> u32 {
    let mask = ct_mask_u32(bit);
    (mask & a) | (!mask & b)
}

/// Constant-time conditional assignment
///
/// Overwrites `dst` with `src` when the low bit of `bit` is set and leaves it
/// unchanged otherwise. Both slices are walked in full either way.
pub fn select_bytes(bit: u32, dst: &mut [u8], src: &[u8]) {
    assert_eq!(dst.len(), src.len());

    let choice = Choice::from((bit & 1) as u8);

    for (d, s) in dst.iter_mut().zip(src.iter()) {
        *d = u8::conditional_select(d, s, choice);
    }
}

/// Branch-free `a < b` returned as 0 or 1.
///
/// Both operands must be below 2^31.
#[inline(always)]
pub fn lt_bit(a: u32, b: u32) -> u32 {
    debug_assert!(a < (1 << 31) && b < (1 << 31));
    a.wrapping_sub(b) >> 31
}

/// Reduce `x` into `[0, q)`.
///
/// Simplification: this uses the hardware remainder instruction, whose
/// latency can depend on the operands. A hardened build would use Barrett or
/// Montgomery reduction here.
#[inline(always)]
pub fn reduce_mod(x: i64, q: u32) -> u32 {
    x.rem_euclid(q as i64) as u32
}
