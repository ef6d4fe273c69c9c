// kem/src/mlkem/kem.rs

//! The instrumented KEM core.

use core::fmt;
use std::time::Instant;

use kemscope_algorithms::masking::MaskingScheme;
use kemscope_algorithms::poly::{add_mod, mul_mod};
use kemscope_algorithms::xof::{CounterXof, ExtendableOutputFunction};
use kemscope_algorithms::{sample_centered, sample_uniform, ButterflyTransform};
use kemscope_api::{
    Ciphertext, Kem as KemTrait, KeyPair, PublicKey, Result as ApiResult, SecretKey, SharedSecret,
};
use kemscope_common::{SecretBuffer, SecretVec, SideChannelCounters};
use kemscope_internal::constant_time::{compare_equal, select_bytes};
use kemscope_params::{ParameterSet, SEED_BYTES};
use rand::{CryptoRng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tracing::trace;

use super::countermeasures::{randomize_execution, Countermeasures};
use super::ind_cca::{encaps_deterministic, recover_message, Message};
use super::serialize::{pack_public_key, pack_secret_key, split_secret_key};

/// Domain separator appended to `sigma` for the error vector
const ERROR_DOMAIN: u8 = 0x01;

/// One KEM instance: parameter set, countermeasure strategy, counters and
/// randomness source.
///
/// Counters are reset on entry to [`keygen`](Self::keygen),
/// [`encapsulate`](Self::encapsulate) and [`decapsulate`](Self::decapsulate)
/// and hold what the last of these did.
pub struct KemCore<R = ChaCha20Rng> {
    params: &'static ParameterSet,
    countermeasures: Countermeasures,
    masking: MaskingScheme,
    counters: SideChannelCounters,
    rng: R,
}

// The PRNG state would reveal every future secret, so it is never printed.
impl<R> fmt::Debug for KemCore<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KemCore")
            .field("params", &self.params.name)
            .field("countermeasures", &self.countermeasures)
            .field("masking_order", &self.masking.order())
            .finish_non_exhaustive()
    }
}

impl KemCore<ChaCha20Rng> {
    /// Instance seeded from the operating system
    pub fn new(params: &'static ParameterSet, countermeasures: Countermeasures) -> Self {
        Self::with_rng(params, countermeasures, ChaCha20Rng::from_entropy())
    }

    /// Reproducible instance for tests and benchmarks
    pub fn with_seed(
        params: &'static ParameterSet,
        countermeasures: Countermeasures,
        seed: u64,
    ) -> Self {
        Self::with_rng(params, countermeasures, ChaCha20Rng::seed_from_u64(seed))
    }

    /// Instance for a registered parameter-set name
    pub fn from_name(name: &str, countermeasures: Countermeasures) -> ApiResult<Self> {
        Ok(Self::new(ParameterSet::by_name(name)?, countermeasures))
    }
}

impl<R: RngCore + CryptoRng> KemCore<R> {
    /// Instance drawing all randomness from `rng`
    pub fn with_rng(
        params: &'static ParameterSet,
        countermeasures: Countermeasures,
        rng: R,
    ) -> Self {
        Self {
            params,
            countermeasures,
            masking: MaskingScheme::first_order(),
            counters: SideChannelCounters::new(),
            rng,
        }
    }

    /// Parameter set of this instance
    pub fn parameters(&self) -> &'static ParameterSet {
        self.params
    }

    /// Countermeasure strategy of this instance
    pub fn countermeasures(&self) -> Countermeasures {
        self.countermeasures
    }

    /// Counters of the most recent public operation
    pub fn counters(&self) -> &SideChannelCounters {
        &self.counters
    }

    fn begin(&mut self) -> Instant {
        self.counters.reset();
        let start = Instant::now();
        if self.countermeasures.is_enabled() {
            randomize_execution(&mut self.rng, self.params.q);
        }
        start
    }

    fn finish(&mut self, start: Instant) {
        self.counters.record_timing(start.elapsed());
    }

    fn transform(&mut self, coeffs: &mut [u32]) {
        let mode = self.countermeasures.transform_mode(self.masking);
        ButterflyTransform::new(self.params.q, mode).forward(
            coeffs,
            &mut self.counters,
            &mut self.rng,
        );
    }

    /// Generate a keypair.
    ///
    /// `rho ‖ sigma = XOF(d, 64)` for a fresh seed `d`; the matrix is
    /// rejection-sampled from `rho`, the secret and error vectors are derived
    /// from `sigma` and transformed, and `t = A∘ŝ + ê`.
    pub fn keygen(&mut self) -> KeyPair {
        let start = self.begin();
        let params = self.params;
        let (n, k, q) = (params.n, params.k, params.q);
        let len = params.transform_len();

        let mut d = SecretBuffer::<SEED_BYTES>::zeroed();
        self.rng.fill_bytes(d.as_mut_slice());

        let mut expanded = CounterXof::new();
        expanded.update(d.as_slice());
        let mut rho = [0u8; SEED_BYTES];
        let mut sigma = SecretBuffer::<SEED_BYTES>::zeroed();
        expanded.squeeze(&mut rho);
        expanded.squeeze(sigma.as_mut_slice());

        let a = sample_uniform(
            &rho,
            len,
            q,
            self.countermeasures.rejection_policy(),
            &mut self.counters,
        );

        let s = SecretVec::new(sample_centered(sigma.as_slice(), len, params.eta1, q));
        let mut error_seed = SecretVec::with_capacity(SEED_BYTES + 1);
        error_seed.extend_from_slice(sigma.as_slice());
        error_seed.push(ERROR_DOMAIN);
        let mut e_hat = SecretVec::new(sample_centered(&error_seed, len, params.eta1, q));

        let mut s_hat = s.clone();
        self.transform(&mut s_hat);
        self.transform(&mut e_hat);

        // t_i = Σ_j A[(i + j) mod k] ∘ ŝ_j + ê_i, absent matrix entries count as 0
        let mut t = vec![0u32; len];
        for i in 0..k {
            for c in 0..n {
                let mut acc = e_hat[i * n + c];
                for j in 0..k {
                    let a_ij = a.get(((i + j) % k) * n + c).copied().unwrap_or(0);
                    acc = add_mod(acc, mul_mod(a_ij, s_hat[j * n + c], q), q);
                }
                t[i * n + c] = acc;
            }
        }

        let pk = pack_public_key(params, &rho, &t);
        let sk = pack_secret_key(params, &s, &pk);

        self.finish(start);
        KeyPair::new(PublicKey::new(pk), SecretKey::new(sk))
    }

    /// Encapsulate a fresh 32-byte message under `pk`
    pub fn encapsulate(&mut self, pk: &PublicKey) -> (Ciphertext, SharedSecret) {
        let start = self.begin();

        let mut m = Message::zeroed();
        self.rng.fill_bytes(m.as_mut_slice());
        let (ct, key) = encaps_deterministic(pk.as_ref(), &m, self.params.ciphertext_size);

        self.finish(start);
        (Ciphertext::new(ct), key)
    }

    /// Recover the shared secret, or a random substitute if `ct` does not
    /// re-encrypt to itself.
    ///
    /// Hardened instances compare with [`compare_equal`], always draw the
    /// substitute and choose with a branch-free select. Unhardened instances
    /// use `==` and branch.
    pub fn decapsulate(&mut self, sk: &SecretKey, ct: &Ciphertext) -> SharedSecret {
        let start = self.begin();

        let (_, pk) = split_secret_key(self.params, sk.as_ref());
        let m_prime = recover_message(pk, ct.as_ref());
        let (ct_prime, key_prime) =
            encaps_deterministic(pk, &m_prime, self.params.ciphertext_size);

        let shared = match self.countermeasures {
            Countermeasures::Enabled => {
                let valid = compare_equal(ct.as_ref(), &ct_prime);
                let mut out = self.random_secret();
                select_bytes(valid as u32, out.as_mut(), key_prime.as_ref());
                out
            }
            Countermeasures::Disabled => {
                if ct.as_ref() == ct_prime.as_slice() {
                    key_prime
                } else {
                    trace!(params = self.params.name, "re-encryption mismatch");
                    self.random_secret()
                }
            }
        };

        self.finish(start);
        shared
    }

    fn random_secret(&mut self) -> SharedSecret {
        let mut out = SharedSecret::zeroed();
        self.rng.fill_bytes(out.as_mut());
        out
    }
}

impl<R: RngCore + CryptoRng> KemTrait for KemCore<R> {
    type PublicKey = PublicKey;
    type SecretKey = SecretKey;
    type SharedSecret = SharedSecret;
    type Ciphertext = Ciphertext;
    type KeyPair = KeyPair;

    fn name(&self) -> &'static str {
        self.params.name
    }

    fn keypair(&mut self) -> ApiResult<Self::KeyPair> {
        Ok(self.keygen())
    }

    fn public_key(keypair: &Self::KeyPair) -> Self::PublicKey {
        keypair.public_key.clone()
    }

    fn secret_key(keypair: &Self::KeyPair) -> Self::SecretKey {
        keypair.secret_key.clone()
    }

    fn encapsulate(
        &mut self,
        public_key: &Self::PublicKey,
    ) -> ApiResult<(Self::Ciphertext, Self::SharedSecret)> {
        Ok(KemCore::encapsulate(self, public_key))
    }

    fn decapsulate(
        &mut self,
        secret_key: &Self::SecretKey,
        ciphertext: &Self::Ciphertext,
    ) -> ApiResult<Self::SharedSecret> {
        Ok(KemCore::decapsulate(self, secret_key, ciphertext))
    }
}
