//! Constants and registry for the lattice KEM parameter sets

use kemscope_api::{Error, Result};

/// Ring dimension shared by every set
pub const MLKEM_N: usize = 256;

/// Prime modulus shared by every set
pub const MLKEM_Q: u32 = 3329;

/// Size of seeds (`d`, `rho`, `sigma`, `m`) in bytes
pub const SEED_BYTES: usize = 32;

/// Shared secret size for all sets
pub const SHARED_SECRET_BYTES: usize = kemscope_api::SHARED_SECRET_BYTES;

/// Bytes needed to pack one polynomial at 12 bits per coefficient
pub const POLY_BYTES: usize = MLKEM_N * 12 / 8;

/// Numeric configuration of a KEM instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ParameterSet {
    /// Identifier used for selection and reporting
    pub name: &'static str,

    /// Ring dimension
    pub n: usize,

    /// Module rank
    pub k: usize,

    /// Noise bound for secret and error vectors
    pub eta1: u8,

    /// Noise bound for encapsulation
    pub eta2: u8,

    /// Compression width for u
    pub du: usize,

    /// Compression width for v
    pub dv: usize,

    /// Prime modulus
    pub q: u32,

    /// Size of the ciphertext in bytes
    pub ciphertext_size: usize,
}

/// ML-KEM-512 parameters
pub const MLKEM512: ParameterSet = ParameterSet {
    name: "ML-KEM-512",
    n: MLKEM_N,
    k: 2,
    eta1: 3,
    eta2: 2,
    du: 10,
    dv: 4,
    q: MLKEM_Q,
    ciphertext_size: 768,
};

/// ML-KEM-768 parameters
pub const MLKEM768: ParameterSet = ParameterSet {
    name: "ML-KEM-768",
    n: MLKEM_N,
    k: 3,
    eta1: 2,
    eta2: 2,
    du: 10,
    dv: 4,
    q: MLKEM_Q,
    ciphertext_size: 1088,
};

/// ML-KEM-1024 parameters
pub const MLKEM1024: ParameterSet = ParameterSet {
    name: "ML-KEM-1024",
    n: MLKEM_N,
    k: 4,
    eta1: 2,
    eta2: 2,
    du: 11,
    dv: 5,
    q: MLKEM_Q,
    ciphertext_size: 1568,
};

static REGISTRY: [ParameterSet; 3] = [MLKEM512, MLKEM768, MLKEM1024];

impl ParameterSet {
    /// Every registered set, smallest first
    pub fn all() -> &'static [ParameterSet] {
        &REGISTRY
    }

    /// The smallest registered set
    pub fn smallest() -> &'static ParameterSet {
        &REGISTRY[0]
    }

    /// Look a set up by identifier. Matching ignores ASCII case.
    pub fn by_name(name: &str) -> Result<&'static ParameterSet> {
        REGISTRY
            .iter()
            .find(|set| set.name.eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| Error::UnknownParameterSet {
                name: name.to_string(),
            })
    }

    /// Registered identifiers, for help texts and error messages
    pub fn names() -> impl Iterator<Item = &'static str> {
        REGISTRY.iter().map(|set| set.name)
    }

    /// Number of coefficients the transform runs over: `k · n`
    pub fn transform_len(&self) -> usize {
        self.k * self.n
    }

    /// Packed size of a rank-k vector at 12 bits per coefficient
    pub fn polyvec_bytes(&self) -> usize {
        self.k * self.n * 12 / 8
    }

    /// `rho ‖ packed t`
    pub fn public_key_size(&self) -> usize {
        self.polyvec_bytes() + SEED_BYTES
    }

    /// `packed s ‖ public key`
    pub fn secret_key_size(&self) -> usize {
        self.polyvec_bytes() + self.public_key_size()
    }

    /// Check the invariants every set must satisfy
    pub fn validate(&self) -> Result<()> {
        if self.q != MLKEM_Q {
            return Err(Error::invalid_parameter(
                "ParameterSet",
                format!("q must be {}, got {}", MLKEM_Q, self.q),
            ));
        }
        if self.n == 0 || !self.n.is_power_of_two() {
            return Err(Error::invalid_parameter(
                "ParameterSet",
                format!("n must be a power of two, got {}", self.n),
            ));
        }
        if self.k == 0 {
            return Err(Error::invalid_parameter("ParameterSet", "k must be at least 1"));
        }
        if self.eta1 == 0 || self.eta2 == 0 {
            return Err(Error::invalid_parameter("ParameterSet", "eta bounds must be positive"));
        }
        if self.ciphertext_size <= SEED_BYTES {
            return Err(Error::invalid_parameter(
                "ParameterSet",
                format!("ciphertext must exceed {} bytes", SEED_BYTES),
            ));
        }
        Ok(())
    }
}
