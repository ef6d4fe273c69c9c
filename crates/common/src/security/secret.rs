//! Secret data types with guaranteed zeroization
//!
//! Seeds, messages and packed secret vectors pass through these wrappers so
//! they are wiped as soon as the operation that produced them returns.

use core::fmt;
use core::ops::{Deref, DerefMut};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Fixed-size secret buffer that guarantees zeroization
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretBuffer<const N: usize> {
    data: [u8; N],
}

impl<const N: usize> SecretBuffer<N> {
    /// Create a new secret buffer with the given data
    pub fn new(data: [u8; N]) -> Self {
        Self { data }
    }

    /// Create a zeroed secret buffer
    pub fn zeroed() -> Self {
        Self { data: [0u8; N] }
    }

    /// Copy the first `N` bytes of `slice`
    ///
    /// # Panics
    /// Panics if `slice` is shorter than `N`.
    pub fn from_prefix(slice: &[u8]) -> Self {
        let mut data = [0u8; N];
        data.copy_from_slice(&slice[..N]);
        Self { data }
    }

    /// Get the length of the buffer
    pub fn len(&self) -> usize {
        N
    }

    /// Check if the buffer is empty (always false for non-zero N)
    pub fn is_empty(&self) -> bool {
        N == 0
    }

    /// Get a reference to the inner data
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Get a mutable reference to the inner data
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

impl<const N: usize> AsRef<[u8]> for SecretBuffer<N> {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl<const N: usize> AsMut<[u8]> for SecretBuffer<N> {
    fn as_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

impl<const N: usize> fmt::Debug for SecretBuffer<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretBuffer<{}>([REDACTED])", N)
    }
}

/// Variable-size secret vector that guarantees zeroization
pub struct SecretVec<T: Zeroize = u8> {
    data: Vec<T>,
}

impl<T: Zeroize> Zeroize for SecretVec<T> {
    fn zeroize(&mut self) {
        self.data.zeroize();
    }
}

impl<T: Zeroize> Drop for SecretVec<T> {
    fn drop(&mut self) {
        self.data.zeroize();
    }
}

impl<T: Zeroize> ZeroizeOnDrop for SecretVec<T> {}

impl<T: Zeroize + Clone> Clone for SecretVec<T> {
    fn clone(&self) -> Self {
        Self::new(self.data.clone())
    }
}

impl<T: Zeroize> Default for SecretVec<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T: Zeroize> SecretVec<T> {
    /// Create a new secret vector with the given data
    pub fn new(data: Vec<T>) -> Self {
        Self { data }
    }

    /// Create a secret vector with the specified capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }
}

impl<T: Zeroize> Deref for SecretVec<T> {
    type Target = Vec<T>;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl<T: Zeroize> DerefMut for SecretVec<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.data
    }
}

impl<T: Zeroize> fmt::Debug for SecretVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretVec(len={}, [REDACTED])", self.data.len())
    }
}
