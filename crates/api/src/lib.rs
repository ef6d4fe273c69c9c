//! Public API traits and types for kemscope
//!
//! This crate provides the shared surface of the harness: the error taxonomy,
//! byte containers for keys, ciphertexts and shared secrets, and the [`Kem`]
//! trait implemented by the instrumented KEM core.

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at the crate level for convenience
pub use error::{Error, Result};
pub use traits::Kem;
pub use types::*;
