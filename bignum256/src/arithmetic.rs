//! Multiplication, the additive layer and exponentiation.
//!
//! Bounds are part of each contract. Results documented as `< 2p` are
//! lazily reduced and must pass through [`FieldElement::mod_p`] before
//! they are compared or encoded.

use crate::{
    FieldElement, LIMB_BITS, LIMB_MASK, LIMBS,
    reduce::{WIDE_LIMBS, reduce_wide},
};
use core::num::NonZero;
use subtle::{Choice, ConditionallySelectable};
use zeroize::Zeroize;

/// Largest bit length accepted by [`FieldElement::multiply`]; covers
/// `128p - 1` for every supported prime.
const MULTIPLY_MAX_BITS: u32 = 263;

const BASE58: NonZero<u32> = match NonZero::new(58) {
    Some(d) => d,
    None => unreachable!(),
};

impl FieldElement {
    /// Returns `self * x mod prime`, lazily reduced to `< 2p`.
    ///
    /// Both operands must be normalized and below `2^263` (so anything
    /// `< 128p` is accepted). The double-width product is accumulated in 18
    /// limbs, then folded back by the top-down reduction.
    pub fn multiply(&self, x: &Self, prime: &Self) -> Self {
        debug_assert!(self.is_normalized() && x.is_normalized());
        debug_assert!(self.bitlen() <= MULTIPLY_MAX_BITS && x.bitlen() <= MULTIPLY_MAX_BITS);

        let mut res = self.mul_wide(x);
        reduce_wide(&mut res, prime);

        let mut limbs = [0u32; LIMBS];
        limbs.copy_from_slice(&res[..LIMBS]);
        res.zeroize();
        Self(limbs)
    }

    /// Schoolbook product. Nine 60-bit partial products plus the running
    /// carry stay below `2^64`.
    fn mul_wide(&self, x: &Self) -> [u32; WIDE_LIMBS] {
        let mut res = [0u32; WIDE_LIMBS];
        let mut temp = 0u64;

        for (i, limb) in res.iter_mut().enumerate().take(WIDE_LIMBS - 1) {
            let lo = i.saturating_sub(LIMBS - 1);
            let hi = i.min(LIMBS - 1);
            for j in lo..=hi {
                temp += self.0[j] as u64 * x.0[i - j] as u64;
            }
            *limb = (temp & LIMB_MASK as u64) as u32;
            temp >>= LIMB_BITS;
        }
        res[WIDE_LIMBS - 1] = temp as u32;

        res
    }

    /// Returns `self * k mod prime` for a small scalar, exactly reduced.
    pub fn mul_small(&self, k: u32, prime: &Self) -> Self {
        self.multiply(&Self::from_u32(k), prime).mod_p(prime)
    }

    /// Returns `self + rhs mod prime`, exactly reduced.
    ///
    /// The limb-wise sum is normalized and must stay below `2^270`; two
    /// operands `< 2p` always qualify.
    pub fn add_mod(&self, rhs: &Self, prime: &Self) -> Self {
        let mut sum = [0u32; LIMBS];
        for (s, (a, b)) in sum.iter_mut().zip(self.0.iter().zip(rhs.0.iter())) {
            *s = a + b;
        }
        Self(sum).normalize().fast_mod(prime).mod_p(prime)
    }

    /// Returns `self + k mod prime`, exactly reduced.
    pub fn add_mod_small(&self, k: u32, prime: &Self) -> Self {
        let mut sum = self.0;
        // k may use the full 32 bits; normalize spreads it across limbs 0..2
        let (lo, hi) = (k & LIMB_MASK, k >> LIMB_BITS);
        sum[0] += lo;
        sum[1] += hi;
        Self(sum).normalize().fast_mod(prime).mod_p(prime)
    }

    /// Returns `self + 2p - rhs`, which is congruent to `self - rhs` and
    /// lies in `[0, self + 2p)`; with `self < p` the result is `< 3p`.
    ///
    /// Requires `rhs < 2p`. The output is normalized but not reduced.
    pub fn subtract_mod(&self, rhs: &Self, prime: &Self) -> Self {
        debug_assert!(bool::from(rhs.is_less(&prime.lshift())));

        let mut limbs = [0u32; LIMBS];
        // the bias telescopes to 2^270, dropped with the final carry
        let mut temp = 1u64;
        for (i, limb) in limbs.iter_mut().enumerate() {
            temp += LIMB_MASK as u64 + self.0[i] as u64 + 2 * prime.0[i] as u64
                - rhs.0[i] as u64;
            *limb = (temp & LIMB_MASK as u64) as u32;
            temp >>= LIMB_BITS;
        }
        Self(limbs)
    }

    /// Plain integer difference `self - rhs`. Requires `self >= rhs`; both
    /// operands normalized.
    pub fn subtract(&self, rhs: &Self) -> Self {
        let (diff, carry) = self.sub_with_carry(rhs);
        debug_assert_eq!(carry, 1, "subtract would underflow");
        diff
    }

    /// Returns `prime - self` when `choice` is set and `self` otherwise.
    ///
    /// `self` must be `< p`; zero stays zero.
    pub fn conditional_negate(&self, choice: Choice, prime: &Self) -> Self {
        let neg = prime.subtract(self).mod_p(prime);
        Self::conditional_select(self, &neg, choice)
    }

    /// Returns `prime - self` (`0` for zero). `self` must be `< p`.
    pub fn negate(&self, prime: &Self) -> Self {
        self.conditional_negate(Choice::from(1), prime)
    }

    /// Divides `self` in place by `divisor` and returns the remainder.
    ///
    /// Plain integer division of a normalized element, one limb at a time
    /// from the top; `(rem << 30) + limb` always fits in 64 bits. Variable
    /// time in `divisor` only.
    pub fn divmod_small(&mut self, divisor: NonZero<u32>) -> u32 {
        debug_assert!(self.is_normalized());

        let d = u64::from(divisor.get());
        let mut rem = 0u64;
        for limb in self.0.iter_mut().rev() {
            let tmp = (rem << LIMB_BITS) | u64::from(*limb);
            *limb = (tmp / d) as u32;
            rem = tmp % d;
        }
        rem as u32
    }

    /// Divides `self` in place by 58 and returns the remainder: one digit
    /// of a base58 encoding.
    pub fn divmod58(&mut self) -> u32 {
        self.divmod_small(BASE58)
    }

    /// Returns `self^exp mod prime`, exactly reduced.
    ///
    /// Square-and-multiply over all 30-bit limbs of the exponent, stopping
    /// once the bits left in the top limb are exhausted. The schedule depends
    /// on `exp` only, which must therefore be public (it is always derived
    /// from the prime in this crate).
    pub fn pow(&self, exp: &Self, prime: &Self) -> Self {
        debug_assert!(exp.is_normalized());

        let mut x = *self;
        let mut res = Self::ONE;
        for (i, &limb) in exp.0.iter().enumerate() {
            let mut limb = limb;
            for _ in 0..LIMB_BITS {
                if i == LIMBS - 1 && limb == 0 {
                    break;
                }
                if limb & 1 == 1 {
                    res = x.multiply(&res, prime);
                }
                limb >>= 1;
                x = x.multiply(&x, prime);
            }
        }
        x.zeroize();

        res.mod_p(prime)
    }

    /// Returns `self^((p + 1) / 4) mod prime`.
    ///
    /// This is a square root of `self` only when `self` is a quadratic
    /// residue, and only for `p ≡ 3 (mod 4)`. Nothing is checked here:
    /// verify the result by squaring, or consult [`FieldElement::legendre`].
    pub fn sqrt(&self, prime: &Self) -> Self {
        debug_assert_eq!(prime.0[0] & 3, 3, "sqrt requires p = 3 mod 4");

        // p + 1 must be normalized before shifting: the low limb of some
        // primes (P-256) is all ones
        let mut exp = *prime;
        exp.0[0] += 1;
        let exp = exp.normalize().rshift().rshift();

        self.pow(&exp, prime)
    }

    /// Euler's criterion: returns `Choice(1)` if `self` is a square modulo
    /// `prime`, zero included.
    pub fn legendre(&self, prime: &Self) -> Choice {
        // p is odd, so (p - 1) / 2 == p >> 1
        let res = self.pow(&prime.rshift(), prime);
        res.is_equal(&Self::ONE) | res.is_zero()
    }
}
