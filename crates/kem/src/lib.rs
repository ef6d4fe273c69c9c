//! Instrumented Key Encapsulation Mechanism
//!
//! This crate implements the lattice KEM the timing harness measures. One
//! [`KemCore`] runs one parameter set with countermeasures either enabled or
//! disabled for its whole lifetime, and records what it does in its own
//! [`SideChannelCounters`](kemscope_common::SideChannelCounters).
//!
//! The construction only mirrors the shape of ML-KEM (seed expansion,
//! rejection-sampled matrix, small secrets, transform, re-encryption check).
//! It is not interoperable with FIPS 203 and must not protect real data.

#![forbid(unsafe_code)]

pub mod mlkem;

// Re-exports
pub use mlkem::{Countermeasures, KemCore};
