//! Packed limb representation, byte codecs, and the normalization and
//! comparison layer.

use crate::{LIMB_BITS, LIMB_MASK, LIMBS};
use core::fmt;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use zeroize::Zeroize;

/// An unsigned integer of up to 270 bits, interpreted modulo a ~256-bit prime.
///
/// Uses 9 32-bit limbs (little-endian). In the normalized form the first 8
/// limbs contain 30 bits of the value each and the last one contains 16 bits,
/// for 256 bits in total. The last limb may grow to 30 bits (270 bits overall)
/// in lazily reduced intermediates, and un-normalized sums may carry bits above
/// the 30-bit boundary of any limb until [`FieldElement::normalize`] is called.
///
/// The modulus is never implicit: every modular operation takes the prime by
/// reference. See the crate documentation for the primes this type supports.
#[derive(Clone, Copy, Debug, Default)]
pub struct FieldElement(pub(crate) [u32; LIMBS]);

impl FieldElement {
    /// Zero element.
    pub const ZERO: Self = Self([0; LIMBS]);

    /// Multiplicative identity.
    pub const ONE: Self = Self([1, 0, 0, 0, 0, 0, 0, 0, 0]);

    /// Creates an element from raw limbs. The limbs are taken as they are,
    /// without normalization.
    pub const fn from_limbs(limbs: [u32; LIMBS]) -> Self {
        Self(limbs)
    }

    /// Returns the raw limbs.
    pub const fn limbs(&self) -> &[u32; LIMBS] {
        &self.0
    }

    /// Creates a normalized element from a `u32`.
    pub const fn from_u32(w: u32) -> Self {
        Self([w & LIMB_MASK, w >> LIMB_BITS, 0, 0, 0, 0, 0, 0, 0])
    }

    /// Creates a normalized element from a `u64`.
    pub const fn from_u64(w: u64) -> Self {
        let mask = LIMB_MASK as u64;
        Self([
            (w & mask) as u32,
            ((w >> LIMB_BITS) & mask) as u32,
            (w >> (2 * LIMB_BITS)) as u32,
            0,
            0,
            0,
            0,
            0,
            0,
        ])
    }

    /// Decodes a big-endian integer into a normalized element.
    pub const fn read_be(bytes: &[u8; 32]) -> Self {
        let mut limbs = [0u32; LIMBS];
        let mut temp = 0u64;
        let mut i = 0;
        while i < 8 {
            let offset = 28 - 4 * i;
            let word = u32::from_be_bytes([
                bytes[offset],
                bytes[offset + 1],
                bytes[offset + 2],
                bytes[offset + 3],
            ]);
            temp += (word as u64) << (2 * i);
            limbs[i] = (temp & LIMB_MASK as u64) as u32;
            temp >>= LIMB_BITS;
            i += 1;
        }
        limbs[8] = temp as u32;
        Self(limbs)
    }

    /// Encodes the element as a big-endian integer.
    ///
    /// The element must be normalized and smaller than `2^256`; other inputs
    /// produce a meaningless (but memory safe) encoding.
    pub fn write_be(&self) -> [u8; 32] {
        debug_assert!(self.is_normalized() && self.0[8] >> 16 == 0);

        let mut out = [0u8; 32];
        let mut temp = self.0[8] as u64;
        for (i, chunk) in out.chunks_exact_mut(4).enumerate() {
            // bits that have already been written are shifted out of the top
            temp = (temp << LIMB_BITS) | self.0[7 - i] as u64;
            let shift = 14 - 2 * i as u32;
            chunk.copy_from_slice(&((temp >> shift) as u32).to_be_bytes());
        }
        out
    }

    /// Decodes a little-endian integer into a normalized element.
    pub fn read_le(bytes: &[u8; 32]) -> Self {
        let mut be = *bytes;
        be.reverse();
        let res = Self::read_be(&be);
        be.zeroize();
        res
    }

    /// Encodes the element as a little-endian integer. Same preconditions as
    /// [`FieldElement::write_be`].
    pub fn write_le(&self) -> [u8; 32] {
        let mut out = self.write_be();
        out.reverse();
        out
    }

    /// Parses a 64-digit big-endian hex string. Intended for constants.
    ///
    /// # Panics
    /// - if the string is not exactly 64 hex digits.
    pub const fn from_be_hex(hex: &str) -> Self {
        let hex = hex.as_bytes();
        assert!(hex.len() == 64, "hex string must be 64 digits");

        let mut bytes = [0u8; 32];
        let mut i = 0;
        while i < 32 {
            bytes[i] = (decode_nibble(hex[2 * i]) << 4) | decode_nibble(hex[2 * i + 1]);
            i += 1;
        }
        Self::read_be(&bytes)
    }

    /// Returns `true` if every limb fits in 30 bits.
    pub fn is_normalized(&self) -> bool {
        self.0.iter().all(|&limb| limb <= LIMB_MASK)
    }

    /// Determine if this element is zero, i.e. every limb is zero.
    ///
    /// No reduction is performed: a multiple of the modulus is not zero.
    pub fn is_zero(&self) -> Choice {
        self.0.iter().fold(0u32, |acc, limb| acc | limb).ct_eq(&0)
    }

    /// Determine if this element is odd.
    pub fn is_odd(&self) -> Choice {
        Choice::from((self.0[0] & 1) as u8)
    }

    /// Determine if this element is even.
    pub fn is_even(&self) -> Choice {
        !self.is_odd()
    }

    /// Limb-wise equality. Both sides must be normalized for the answer to
    /// mean numeric equality.
    pub fn is_equal(&self, other: &Self) -> Choice {
        self.ct_eq(other)
    }

    /// Returns `Choice(1)` if `self < other`. Both sides must be normalized.
    pub fn is_less(&self, other: &Self) -> Choice {
        let (_, carry) = self.sub_with_carry(other);
        Choice::from((carry ^ 1) as u8)
    }

    /// Returns the number of significant bits: 0 for zero, otherwise the
    /// index of the highest set bit plus one. Variable time.
    pub fn bitlen(&self) -> u32 {
        match self.0.iter().rposition(|&limb| limb != 0) {
            None => 0,
            Some(i) => i as u32 * LIMB_BITS + (u32::BITS - self.0[i].leading_zeros()),
        }
    }

    /// Shifts left by one bit. Bit 29 of each limb carries into the next; the
    /// carry out of limb 8 is dropped.
    pub const fn lshift(&self) -> Self {
        let mut limbs = [0u32; LIMBS];
        let mut i = LIMBS - 1;
        while i > 0 {
            limbs[i] = ((self.0[i] << 1) & LIMB_MASK) | ((self.0[i - 1] >> (LIMB_BITS - 1)) & 1);
            i -= 1;
        }
        limbs[0] = (self.0[0] << 1) & LIMB_MASK;
        Self(limbs)
    }

    /// Shifts right by one bit. Expects a normalized element.
    pub const fn rshift(&self) -> Self {
        let mut limbs = [0u32; LIMBS];
        let mut i = 0;
        while i < LIMBS - 1 {
            limbs[i] = (self.0[i] >> 1) | ((self.0[i + 1] & 1) << (LIMB_BITS - 1));
            i += 1;
        }
        limbs[LIMBS - 1] = self.0[LIMBS - 1] >> 1;
        Self(limbs)
    }

    /// Propagates carries so every limb fits in 30 bits. No modular reduction
    /// takes place; the carry out of the top limb must be zero.
    pub const fn normalize(&self) -> Self {
        let mut limbs = [0u32; LIMBS];
        let mut temp = 0u64;
        let mut i = 0;
        while i < LIMBS {
            temp += self.0[i] as u64;
            limbs[i] = (temp & LIMB_MASK as u64) as u32;
            temp >>= LIMB_BITS;
            i += 1;
        }
        Self(limbs)
    }

    /// Computes `self - rhs + 2^270` limb by limb, returning the low 270 bits
    /// and the carry out of the top limb, which is 1 iff `self >= rhs`.
    ///
    /// Both operands must be normalized.
    pub(crate) const fn sub_with_carry(&self, rhs: &Self) -> (Self, u32) {
        let mut limbs = [0u32; LIMBS];
        // bias: 1 + sum((2^30 - 1) * 2^(30i)) == 2^270
        let mut temp = 1u64;
        let mut i = 0;
        while i < LIMBS {
            temp += LIMB_MASK as u64 + self.0[i] as u64 - rhs.0[i] as u64;
            limbs[i] = (temp & LIMB_MASK as u64) as u32;
            temp >>= LIMB_BITS;
            i += 1;
        }
        (Self(limbs), temp as u32)
    }
}

const fn decode_nibble(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        b'A'..=b'F' => c - b'A' + 10,
        _ => panic!("invalid hex digit"),
    }
}

impl ConditionallySelectable for FieldElement {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self(core::array::from_fn(|i| {
            u32::conditional_select(&a.0[i], &b.0[i], choice)
        }))
    }
}

impl ConstantTimeEq for FieldElement {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0
            .iter()
            .zip(other.0.iter())
            .fold(Choice::from(1), |acc, (a, b)| acc & a.ct_eq(b))
    }
}

impl PartialEq for FieldElement {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for FieldElement {}

impl Zeroize for FieldElement {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl fmt::LowerHex for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (top, low) = self.split_for_display();
        if top != 0 {
            write!(f, "{top:x}")?;
        }
        for byte in low.write_be() {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::UpperHex for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (top, low) = self.split_for_display();
        if top != 0 {
            write!(f, "{top:X}")?;
        }
        for byte in low.write_be() {
            write!(f, "{byte:02X}")?;
        }
        Ok(())
    }
}

impl FieldElement {
    /// Splits the normalized value into the bits above 2^256 and the low 256
    /// bits, so lazily reduced values can be printed too.
    fn split_for_display(&self) -> (u32, Self) {
        let mut low = self.normalize();
        let top = low.0[8] >> 16;
        low.0[8] &= 0xFFFF;
        (top, low)
    }
}
