// kem/src/mlkem/mod.rs

//! Lattice KEM core with a countermeasure toggle.
//!
//! Layout of the byte strings produced here (all lengths from the
//! [`ParameterSet`](kemscope_params::ParameterSet)):
//!
//! - public key: `rho ‖ pack12(t)`
//! - secret key: `pack12(s) ‖ public key`
//! - ciphertext: `(m ⊕ pad(pk)) ‖ XOF(pk ‖ m ‖ r)`

mod countermeasures; // Strategy enum and execution randomization
mod ind_cca; // Deterministic encapsulation and the re-encryption check
mod kem; // KemCore and the api::Kem implementation
mod serialize; // Key layouts

pub use self::countermeasures::Countermeasures;
pub use self::kem::KemCore;
pub use self::serialize::{split_secret_key, PublicKeyParts};
