//! Trait definitions

pub mod kem;

pub use kem::Kem;
