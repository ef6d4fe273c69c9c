//! Trait definition for an instrumented Key Encapsulation Mechanism
//!
//! Unlike a production KEM interface, implementations are stateful: they own
//! their randomness source and their side-channel instrumentation, so every
//! operation takes `&mut self`.

use crate::Result;
use zeroize::Zeroize;

/// Trait for a Key Encapsulation Mechanism driven by the timing harness.
///
/// # Contract
///
/// - `decapsulate` never reports a cryptographic failure. An invalid
///   ciphertext yields a substitute secret of the same length, because a
///   visible failure is itself a side channel.
/// - The `Err` variant is reserved for malformed inputs detected before any
///   secret-dependent work starts.
pub trait Kem {
    /// Public key type.
    type PublicKey: Clone + AsRef<[u8]>;

    /// Secret key type; zeroized when dropped.
    type SecretKey: Zeroize + Clone + AsRef<[u8]>;

    /// Shared secret type; zeroized when dropped.
    type SharedSecret: Zeroize + Clone + AsRef<[u8]>;

    /// Ciphertext type for the encapsulated key.
    type Ciphertext: Clone + AsRef<[u8]>;

    /// Keypair type.
    type KeyPair: Clone;

    /// Returns the name of the parameter set this instance runs.
    fn name(&self) -> &'static str;

    /// Generate a new keypair.
    fn keypair(&mut self) -> Result<Self::KeyPair>;

    /// Extract public key from keypair.
    fn public_key(keypair: &Self::KeyPair) -> Self::PublicKey;

    /// Extract secret key from keypair.
    fn secret_key(keypair: &Self::KeyPair) -> Self::SecretKey;

    /// Encapsulate a shared secret using the recipient's public key.
    fn encapsulate(
        &mut self,
        public_key: &Self::PublicKey,
    ) -> Result<(Self::Ciphertext, Self::SharedSecret)>;

    /// Decapsulate a shared secret using the secret key.
    fn decapsulate(
        &mut self,
        secret_key: &Self::SecretKey,
        ciphertext: &Self::Ciphertext,
    ) -> Result<Self::SharedSecret>;
}
