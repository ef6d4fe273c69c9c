//! Secret-holding types with guaranteed zeroization

pub mod secret;

pub use secret::{SecretBuffer, SecretVec};
