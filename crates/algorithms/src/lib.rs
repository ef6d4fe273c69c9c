//! Arithmetic building blocks for the instrumented KEM
//!
//! This crate provides the pieces the KEM core is assembled from, each in a
//! leaky and a hardened flavour where the harness needs the contrast:
//!
//! - [`xof`]: a deterministic extendable-output stand-in built from SHA-256
//! - [`hash`]: the fixed-output hash used for `H(pk)`
//! - [`masking`]: additive secret sharing of coefficients mod q
//! - [`poly`]: the butterfly transform, the samplers and 12-bit packing
//!
//! None of this is a certified lattice implementation.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod hash;
pub mod masking;
pub mod poly;
pub mod xof;

pub use hash::sha256;
pub use masking::{masked_multiply, unmask, MaskedValue, MaskingScheme};
pub use poly::ntt::{ButterflyTransform, TransformMode};
pub use poly::sampling::{sample_centered, sample_uniform, RejectionPolicy};
pub use xof::{CounterXof, ExtendableOutputFunction};
