//! Moduli of the curves this crate is used with.
//!
//! All of them lie in `[2^256 - 2^224, 2^256)`.

use crate::FieldElement;

/// secp256k1 base field prime, `2^256 - 2^32 - 977`.
pub const SECP256K1_P: FieldElement =
    FieldElement::from_be_hex("fffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2f");

/// Order of the secp256k1 group.
pub const SECP256K1_N: FieldElement =
    FieldElement::from_be_hex("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141");

/// NIST P-256 base field prime, `2^256 - 2^224 + 2^192 + 2^96 - 1`.
pub const NIST_P256_P: FieldElement =
    FieldElement::from_be_hex("ffffffff00000001000000000000000000000000ffffffffffffffffffffffff");

/// Order of the NIST P-256 group.
pub const NIST_P256_N: FieldElement =
    FieldElement::from_be_hex("ffffffff00000000ffffffffffffffffbce6faada7179e84f3b9cac2fc632551");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primes_are_3_mod_4() {
        // required by sqrt and the SWU map
        assert_eq!(SECP256K1_P.limbs()[0] & 3, 3);
        assert_eq!(NIST_P256_P.limbs()[0] & 3, 3);
    }

    #[test]
    fn moduli_are_normalized_256_bit() {
        for p in [SECP256K1_P, SECP256K1_N, NIST_P256_P, NIST_P256_N] {
            assert!(p.is_normalized());
            assert_eq!(p.bitlen(), 256);
        }
    }
}
