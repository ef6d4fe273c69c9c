//! Parameter sets for kemscope
//!
//! One immutable [`ParameterSet`] per security level, created at startup and
//! never mutated. Identifiers are opaque strings used for selection and
//! reporting only.

pub mod pqc;

pub use pqc::mlkem::{
    ParameterSet, MLKEM1024, MLKEM512, MLKEM768, MLKEM_N, MLKEM_Q, POLY_BYTES, SEED_BYTES,
    SHARED_SECRET_BYTES,
};
