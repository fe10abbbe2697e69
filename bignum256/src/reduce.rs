//! Reduction modulo primes of the shape `2^256 - 2^224 <= p < 2^256`.
//!
//! Write `d = 2^256 - p < 2^224`. Subtracting `floor(x / 2^256) * p` from `x`
//! leaves `(x mod 2^256) + floor(x / 2^256) * d`, which is close enough to the
//! residue that a single conditional subtraction finishes the job. Both
//! [`FieldElement::fast_mod`] and the double-width reduction behind
//! [`FieldElement::multiply`] rely on this.

use crate::{FieldElement, LIMB_BITS, LIMB_MASK, LIMBS};
use subtle::{Choice, ConditionallySelectable};
use zeroize::Zeroize;

/// Number of limbs in a double-width product.
pub(crate) const WIDE_LIMBS: usize = 2 * LIMBS;

/// Bias keeping the running difference of `fast_mod` non-negative.
/// `coef < 2^14` there, so `coef * prime[j] < 2^44 < 2^60`.
const FAST_MOD_BIAS: u64 = 1 << 60;

/// Bias keeping the running difference of the wide reduction non-negative.
/// `coef < 2^31` there, so `coef * prime[j] < 2^61 < 2^62 - 2^32`.
const WIDE_BIAS: u64 = 1 << 62;

impl FieldElement {
    /// Exact reduction of an input already known to be `< 2p`.
    ///
    /// Subtracts `prime` once if `self >= prime` (an input equal to `prime`
    /// becomes zero). The result is the canonical residue `0 <= x < p`.
    /// This is a single conditional subtraction, not a general reduction:
    /// values that may be `>= 2p` must go through [`FieldElement::fast_mod`]
    /// first.
    pub fn mod_p(&self, prime: &Self) -> Self {
        debug_assert!(self.is_normalized());
        debug_assert!(bool::from(self.is_less(&prime.lshift())));

        let (diff, carry) = self.sub_with_carry(prime);
        Self::conditional_select(self, &diff, Choice::from(carry as u8))
    }

    /// Approximate reduction of any normalized input (`x < 2^270`).
    ///
    /// Estimates `coef = floor(x / 2^256)` from the top limb and subtracts
    /// `coef * prime` in one pass. The result is `< 2p`, not necessarily
    /// `< p`; chain [`FieldElement::mod_p`] for the canonical residue.
    pub fn fast_mod(&self, prime: &Self) -> Self {
        debug_assert!(self.is_normalized());

        let coef = (self.0[8] >> 16) as u64;
        let mut limbs = [0u32; LIMBS];

        // the first iteration is unrolled because its bias differs
        let mut temp = FAST_MOD_BIAS + self.0[0] as u64 - prime.0[0] as u64 * coef;
        limbs[0] = (temp & LIMB_MASK as u64) as u32;
        for j in 1..LIMBS {
            temp >>= LIMB_BITS;
            temp += FAST_MOD_BIAS - (FAST_MOD_BIAS >> LIMB_BITS) + self.0[j] as u64
                - prime.0[j] as u64 * coef;
            limbs[j] = (temp & LIMB_MASK as u64) as u32;
        }

        Self(limbs)
    }
}

/// Reduces a normalized double-width value `res < 2^526` (18 limbs of 30 bits,
/// limb 17 below `2^16`) modulo `prime`. Returns a normalized value `< 2p`.
///
/// Each of the nine rounds clears one excess limb. Let `k = i - 8` be the
/// round index counting down from 8. Before the round:
///
/// ```text
///   res[0..=i+1] = original (mod prime)
///   0 <= res < 2^(30k + 256) * c_k * 2^30,   c_8 = 1,  c_(k-1) = 1 + c_k / 4
/// ```
///
/// so `c_k < 4/3` throughout. The round estimates `coef = floor(res / 2^(30k
/// + 256))`, with `0 <= coef < (4/3) * 2^30`, and subtracts `coef * 2^(30k) *
/// prime`, leaving
///
/// ```text
///   0 <= res < 2^(30k + 256) + coef * 2^(30k) * (2^256 - prime)
///            < 2^(30k + 256) * (1 + c_k / 4)
/// ```
///
/// because `2^256 - prime < 2^224`. After the last round `res < (4/3) 2^256`,
/// which is below `2p` for every supported prime.
pub(crate) fn reduce_wide(res: &mut [u32; WIDE_LIMBS], prime: &FieldElement) {
    for i in (LIMBS - 1..WIDE_LIMBS - 1).rev() {
        // res[i + 1] < 2^17, the shifted sum fits comfortably in 32 bits
        let coef = ((res[i] >> 16) + (res[i + 1] << 14)) as u64;
        debug_assert!(coef < 1 << 31);

        let base = i + 1 - LIMBS;
        let mut temp = WIDE_BIAS + res[base] as u64 - prime.0[0] as u64 * coef;
        res[base] = (temp & LIMB_MASK as u64) as u32;
        for j in 1..LIMBS {
            temp >>= LIMB_BITS;
            temp += WIDE_BIAS - (WIDE_BIAS >> LIMB_BITS) + res[base + j] as u64
                - prime.0[j] as u64 * coef;
            res[base + j] = (temp & LIMB_MASK as u64) as u32;
        }
        // res[i + 1] is stale from here on but never read again
    }
}

/// A 512-bit unsigned integer in 18 limbs of 30 bits (the top limb holds 2
/// bits), used to reduce wide hash outputs into the field.
///
/// The limbs are wiped on drop.
#[derive(Clone, Debug)]
pub struct WideFieldElement([u32; WIDE_LIMBS]);

impl WideFieldElement {
    /// Decodes a 64-byte big-endian integer.
    pub fn from_be_bytes(bytes: &[u8; 64]) -> Self {
        let mut limbs = [0u32; WIDE_LIMBS];
        let mut acc = 0u64;
        let mut bits = 0;
        let mut i = 0;

        for word in bytes.chunks_exact(4).rev() {
            let mut be = [0u8; 4];
            be.copy_from_slice(word);
            acc |= (u32::from_be_bytes(be) as u64) << bits;
            bits += 32;
            while bits >= LIMB_BITS {
                limbs[i] = (acc & LIMB_MASK as u64) as u32;
                acc >>= LIMB_BITS;
                bits -= LIMB_BITS;
                i += 1;
            }
        }
        // 512 = 17 * 30 + 2
        limbs[i] = acc as u32;

        Self(limbs)
    }

    /// Reduces the value modulo `prime`, returning the canonical residue.
    pub fn reduce(&self, prime: &FieldElement) -> FieldElement {
        let mut res = self.0;
        reduce_wide(&mut res, prime);

        let mut limbs = [0u32; LIMBS];
        limbs.copy_from_slice(&res[..LIMBS]);
        res.zeroize();

        FieldElement(limbs).mod_p(prime)
    }
}

impl Zeroize for WideFieldElement {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl Drop for WideFieldElement {
    fn drop(&mut self) {
        self.zeroize();
    }
}
