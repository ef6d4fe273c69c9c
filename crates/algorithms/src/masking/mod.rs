//! Additive masking of coefficients mod q
//!
//! A coefficient `x` is hidden as `x + m_1 + ... + m_d mod q` with the masks
//! `m_i` drawn uniformly from `[0, q)`. Only additive shares are modelled:
//! [`masked_multiply`] drops the cross terms, so a product of two masked
//! values does not unmask to the product of the secrets. The transform only
//! needs masked representatives to perturb its operand values, and that is
//! all this module promises.

use kemscope_api::{Error, Result};

use crate::poly::{add_mod, mul_mod, sub_mod};
use rand::{Rng, RngCore};


/// A coefficient hidden under `masks.len()` additive masks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskedValue {
    /// `value + Σ masks mod q`
    pub masked_value: u32,
    /// Masks in the order they were applied
    pub masks: Vec<u32>,
}

impl MaskedValue {
    /// Masking order of this value
    pub fn order(&self) -> usize {
        self.masks.len()
    }
}

/// Masking scheme of a fixed order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskingScheme {
    order: usize,
}

impl Default for MaskingScheme {
    fn default() -> Self {
        Self::first_order()
    }
}

impl MaskingScheme {
    /// Scheme applying `order` masks per value. Order 0 would leave values
    /// unmasked and is rejected.
    pub fn new(order: usize) -> Result<Self> {
        if order == 0 {
            return Err(Error::config("masking order must be at least 1"));
        }
        Ok(Self { order })
    }

    /// One mask per value
    pub const fn first_order() -> Self {
        Self { order: 1 }
    }

    /// Number of masks applied per value
    pub fn order(&self) -> usize {
        self.order
    }

    /// Mask `value` (assumed reduced mod q). Draws exactly `order` values
    /// from `rng`.
    pub fn mask<R: RngCore>(&self, value: u32, q: u32, rng: &mut R) -> MaskedValue {
        let mut masks = Vec::with_capacity(self.order);
        let mut acc = value % q;
        for _ in 0..self.order {
            let m = rng.gen_range(0..q);
            acc = add_mod(acc, m, q);
            masks.push(m);
        }
        MaskedValue {
            masked_value: acc,
            masks,
        }
    }
}

/// Remove the masks of `mv` in application order
pub fn unmask(mv: &MaskedValue, q: u32) -> u32 {
    mv.masks
        .iter()
        .fold(mv.masked_value % q, |acc, &m| sub_mod(acc, m % q, q))
}

/// Multiply the masked representatives and the masks pairwise.
///
/// Cross terms `a_i · m_j` are ignored, so the result is not a sharing of
/// `a · b` and offers no higher-order protection.
pub fn masked_multiply(a: &MaskedValue, b: &MaskedValue, q: u32) -> MaskedValue {
    MaskedValue {
        masked_value: mul_mod(a.masked_value, b.masked_value, q),
        masks: a
            .masks
            .iter()
            .zip(b.masks.iter())
            .map(|(&x, &y)| mul_mod(x, y, q))
            .collect(),
    }
}
