//! Polynomial-vector primitives
//!
//! Vectors of rank `k` are stored flat, `k · n` coefficients in `[0, q)`.

pub mod ntt;
pub mod sampling;
pub mod serialize;

/// Prelude for easy importing of common polynomial types and functions.
pub mod prelude {
    pub use super::ntt::{ButterflyTransform, TransformMode};
    pub use super::sampling::{sample_centered, sample_uniform, RejectionPolicy};
    pub use super::serialize::{pack12, packed_len, unpack12};
}

/// Branch-free modular addition for inputs in `[0, q)`
#[inline(always)]
pub fn add_mod(a: u32, b: u32, q: u32) -> u32 {
    let t = a.wrapping_add(b);
    t - ((t >= q) as u32) * q
}

/// Branch-free modular subtraction for inputs in `[0, q)`
#[inline(always)]
pub fn sub_mod(a: u32, b: u32, q: u32) -> u32 {
    let t = a.wrapping_sub(b).wrapping_add(q);
    t - ((t >= q) as u32) * q
}

/// Modular product of two reduced coefficients
#[inline(always)]
pub fn mul_mod(a: u32, b: u32, q: u32) -> u32 {
    ((a as u64 * b as u64) % q as u64) as u32
}
