//! Almost-inverse binary GCD (Schroeppel, Orman, O'Malley, Spatscheck).
//!
//! Works on plain 32-bit words rather than packed limbs. Two registers pair
//! a GCD candidate with its cofactor: `(u, s)` starts at `(p, 1)` and
//! `(v, r)` at `(x, 0)`. Every iteration keeps
//!
//! ```text
//!   x * (-r) = u * 2^k (mod p)
//!   x * s    = v * 2^k (mod p)
//!   u * s + v * r = p
//! ```
//!
//! until `u == v == 1`, so `s = x^-1 * 2^k`. A Montgomery-style pass then
//! divides `s` by `2^k` modulo `p`.

use super::InversionStrategy;
use crate::{Error, FieldElement, Result};
use core::cmp::Ordering;
use subtle::{Choice, ConditionallySelectable};
use zeroize::{Zeroize, Zeroizing};

/// Words in a 256-bit register half.
const WORDS: usize = 8;

/// Inversion by the almost-inverse binary GCD.
///
/// Runs in variable time: the iteration count and the branches depend on
/// `x`.
#[derive(Clone, Copy, Debug, Default)]
pub struct InverseFast;

impl InversionStrategy for InverseFast {
    fn invert(x: &FieldElement, prime: &FieldElement) -> Result<FieldElement> {
        let x = Zeroizing::new(x.fast_mod(prime).mod_p(prime));
        if bool::from(x.is_zero()) {
            return Err(Error);
        }

        let p = to_words(prime);
        let mut us = Register::new(p, 1);
        let mut vr = Register::new(to_words(&x), 0);
        let mut k = 0u32;

        loop {
            us.strip_twos(&mut k)?;
            vr.strip_twos(&mut k)?;

            let (larger, smaller) = match us.cmp_gcd(&vr) {
                Ordering::Equal => break,
                Ordering::Greater => (&mut us, &mut vr),
                Ordering::Less => (&mut vr, &mut us),
            };
            larger.sub_gcd(smaller);
            smaller.add_cofactor(larger);
        }

        // gcd(x, p) must be 1; anything else means p is not prime
        if us.len != 1 || us.gcd[0] != 1 {
            return Err(Error);
        }

        let mut s = [0u32; WORDS + 1];
        s[..WORDS].copy_from_slice(&us.cofactor);
        let res = divide_by_power_of_two(&mut s, &p, k);
        s.zeroize();

        Ok(res)
    }
}

/// A GCD candidate paired with its cofactor. Wiped on drop.
struct Register {
    gcd: [u32; WORDS],
    cofactor: [u32; WORDS],
    /// Significant words of `gcd`; zero iff `gcd` is zero.
    len: usize,
}

impl Register {
    fn new(gcd: [u32; WORDS], cofactor: u32) -> Self {
        let mut res = Self {
            gcd,
            cofactor: [0; WORDS],
            len: WORDS,
        };
        res.cofactor[0] = cofactor;
        res.trim();
        res
    }

    fn trim(&mut self) {
        while self.len > 0 && self.gcd[self.len - 1] == 0 {
            self.len -= 1;
        }
    }

    /// Divides `gcd` by its largest power of two `2^t` while multiplying
    /// `cofactor` by `2^t`, and adds `t` to `k`.
    ///
    /// A zero `gcd` means the loop has degenerated: bail out before any
    /// shift walks past the significant words.
    fn strip_twos(&mut self, k: &mut u32) -> Result<()> {
        loop {
            if self.len == 0 {
                return Err(Error);
            }
            if self.gcd[0] != 0 {
                break;
            }
            self.gcd.copy_within(1.., 0);
            self.gcd[WORDS - 1] = 0;
            self.len -= 1;
            debug_assert_eq!(self.cofactor[WORDS - 1], 0);
            self.cofactor.copy_within(..WORDS - 1, 1);
            self.cofactor[0] = 0;
            *k += 32;
        }

        let t = self.gcd[0].trailing_zeros();
        if t > 0 {
            for i in 0..WORDS - 1 {
                self.gcd[i] = (self.gcd[i] >> t) | (self.gcd[i + 1] << (32 - t));
            }
            self.gcd[WORDS - 1] >>= t;
            self.trim();

            debug_assert_eq!(self.cofactor[WORDS - 1] >> (32 - t), 0);
            for i in (1..WORDS).rev() {
                self.cofactor[i] = (self.cofactor[i] << t) | (self.cofactor[i - 1] >> (32 - t));
            }
            self.cofactor[0] <<= t;
            *k += t;
        }

        Ok(())
    }

    fn cmp_gcd(&self, other: &Self) -> Ordering {
        self.len
            .cmp(&other.len)
            .then_with(|| self.gcd.iter().rev().cmp(other.gcd.iter().rev()))
    }

    /// `self.gcd -= other.gcd`; requires `self.gcd > other.gcd`.
    fn sub_gcd(&mut self, other: &Self) {
        let mut borrow = 0u64;
        for (a, &b) in self.gcd.iter_mut().zip(other.gcd.iter()) {
            let diff = (*a as u64).wrapping_sub(b as u64).wrapping_sub(borrow);
            *a = diff as u32;
            borrow = diff >> 63;
        }
        debug_assert_eq!(borrow, 0);
        self.trim();
    }

    /// `self.cofactor += other.cofactor`; the sum stays below `p`.
    fn add_cofactor(&mut self, other: &Self) {
        let mut carry = 0u64;
        for (a, &b) in self.cofactor.iter_mut().zip(other.cofactor.iter()) {
            carry += *a as u64 + b as u64;
            *a = carry as u32;
            carry >>= 32;
        }
        debug_assert_eq!(carry, 0);
    }
}

impl Drop for Register {
    fn drop(&mut self) {
        self.gcd.zeroize();
        self.cofactor.zeroize();
        self.len.zeroize();
    }
}

/// Returns `-a^-1 mod 2^32` for odd `a`.
///
/// Hensel lifting: `a^-1 = (2 - a) * prod(1 + (a - 1)^(2^i))`, `i = 1..=4`,
/// since `(a - 1)^32 = 0 mod 2^32`.
fn neg_inv_word(a: u32) -> u32 {
    debug_assert_eq!(a & 1, 1);

    let mut inv = 2u32.wrapping_sub(a);
    let mut t = a.wrapping_sub(1);
    for _ in 0..4 {
        t = t.wrapping_mul(t);
        inv = inv.wrapping_mul(t.wrapping_add(1));
    }
    inv.wrapping_neg()
}

/// Returns `s * 2^-k mod p` for `s < p`, exactly reduced.
fn divide_by_power_of_two(s: &mut [u32; WORDS + 1], p: &[u32; WORDS], k: u32) -> FieldElement {
    let n0 = neg_inv_word(p[0]);

    let mut k = k;
    while k >= 32 {
        montgomery_shift(s, p, n0, 32);
        k -= 32;
    }
    if k > 0 {
        montgomery_shift(s, p, n0, k);
    }

    // s < 2p here; subtract p once if that does not borrow
    let mut diff = [0u32; WORDS + 1];
    let mut borrow = 0u64;
    for (i, d) in diff.iter_mut().enumerate() {
        let pi = p.get(i).copied().unwrap_or(0);
        let t = (s[i] as u64).wrapping_sub(pi as u64).wrapping_sub(borrow);
        *d = t as u32;
        borrow = t >> 63;
    }
    let keep = Choice::from(borrow as u8);
    let mut words = [0u32; WORDS];
    for (i, w) in words.iter_mut().enumerate() {
        *w = u32::conditional_select(&diff[i], &s[i], keep);
    }
    diff.zeroize();

    let res = from_words(&words);
    words.zeroize();
    res
}

/// `s = (s + m * p) / 2^bits` with `m` chosen to clear the low `bits` bits.
fn montgomery_shift(s: &mut [u32; WORDS + 1], p: &[u32; WORDS], n0: u32, bits: u32) {
    debug_assert!((1..=32).contains(&bits));

    let mask = u32::MAX >> (32 - bits);
    let m = s[0].wrapping_mul(n0) & mask;

    let mut acc = [0u32; WORDS + 2];
    let mut carry = 0u64;
    for i in 0..=WORDS {
        let pi = p.get(i).copied().unwrap_or(0);
        carry += s[i] as u64 + m as u64 * pi as u64;
        acc[i] = carry as u32;
        carry >>= 32;
    }
    acc[WORDS + 1] = carry as u32;
    debug_assert_eq!(acc[0] & mask, 0);

    for i in 0..=WORDS {
        s[i] = if bits == 32 {
            acc[i + 1]
        } else {
            (acc[i] >> bits) | (acc[i + 1] << (32 - bits))
        };
    }
    acc.zeroize();
}

/// Little-endian 32-bit words of a normalized element `< 2^256`.
fn to_words(x: &FieldElement) -> [u32; WORDS] {
    let mut bytes = x.write_be();
    let mut words = [0u32; WORDS];
    for (w, chunk) in words.iter_mut().zip(bytes.rchunks_exact(4)) {
        *w = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    bytes.zeroize();
    words
}

fn from_words(words: &[u32; WORDS]) -> FieldElement {
    let mut bytes = [0u8; 32];
    for (chunk, w) in bytes.rchunks_exact_mut(4).zip(words.iter()) {
        chunk.copy_from_slice(&w.to_be_bytes());
    }
    let res = FieldElement::read_be(&bytes);
    bytes.zeroize();
    res
}

#[cfg(test)]
mod tests {
    use super::{InverseFast, from_words, neg_inv_word, to_words};
    use crate::{
        Error, FieldElement, InverseSlow, InversionStrategy,
        primes::{NIST_P256_P, SECP256K1_N, SECP256K1_P},
    };
    use hex_literal::hex;

    #[test]
    fn neg_inv_word_is_inverse() {
        for a in [1u32, 3, 0xfffffc2f, 0xffffffff, 0x12345679] {
            assert_eq!(a.wrapping_mul(neg_inv_word(a)), u32::MAX);
        }
    }

    #[test]
    fn word_conversion() {
        let x = FieldElement::read_be(&hex!(
            "0102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f20"
        ));
        let words = to_words(&x);
        assert_eq!(words[0], 0x1d1e1f20);
        assert_eq!(words[7], 0x01020304);
        assert_eq!(from_words(&words), x);
    }

    #[test]
    fn inverse_of_two() {
        let p = SECP256K1_P;
        let inv = InverseFast::invert(&FieldElement::from_u32(2), &p).unwrap();
        let mut half = p;
        half.0[0] += 1;
        assert_eq!(inv, half.normalize().rshift());
        assert_eq!(inv.mul_small(2, &p), FieldElement::ONE);
    }

    #[test]
    fn inverse_of_one() {
        for p in [SECP256K1_P, NIST_P256_P, SECP256K1_N] {
            assert_eq!(InverseFast::invert(&FieldElement::ONE, &p), Ok(FieldElement::ONE));
        }
    }

    #[test]
    fn inverse_of_minus_one() {
        for p in [SECP256K1_P, NIST_P256_P] {
            let minus_one = p.subtract(&FieldElement::ONE);
            assert_eq!(InverseFast::invert(&minus_one, &p), Ok(minus_one));
        }
    }

    #[test]
    fn unreduced_input() {
        // 2^256 - 1 is reduced first
        let x = FieldElement::read_be(&[0xff; 32]);
        let p = NIST_P256_P;
        assert_eq!(
            InverseFast::invert(&x, &p),
            InverseSlow::invert(&x, &p)
        );
    }

    #[test]
    fn zero_has_no_inverse() {
        for p in [SECP256K1_P, NIST_P256_P] {
            assert_eq!(InverseFast::invert(&FieldElement::ZERO, &p), Err(Error));
            assert_eq!(InverseFast::invert(&p, &p), Err(Error));
        }
    }

    #[test]
    fn input_is_left_intact() {
        let p = NIST_P256_P;
        let x = FieldElement::read_be(&[0xff; 32]);
        let before = x;
        let fast = InverseFast::invert(&x, &p).unwrap();
        let slow = InverseSlow::invert(&x, &p).unwrap();
        assert_eq!(x, before);
        assert_eq!(fast, slow);
        let reduced = x.fast_mod(&p).mod_p(&p);
        assert_eq!(reduced.multiply(&fast, &p).mod_p(&p), FieldElement::ONE);
    }

    #[test]
    fn matches_slow_path() {
        let p = NIST_P256_P;
        let x = FieldElement::read_be(&hex!(
            "6b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c296"
        ));
        assert_eq!(InverseFast::invert(&x, &p), InverseSlow::invert(&x, &p));
    }
}
