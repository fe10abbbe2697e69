//! Fixed P-256 hash-to-curve used to blind a PIN-derived secret before it is
//! handed to an Optiga secure element for ECDH.

use crate::{ExpandMsgXmd, P256_XMD_SHA256_SSWU_RO, Result, hash_to_curve};
use sha2::Sha256;
use zeroize::Zeroizing;

/// Domain separation tag of [`hash_to_curve_optiga`].
pub const OPTIGA_DST: &[u8] = b"OPTIGA-SECRET-P256_XMD:SHA-256_SSWU_RO_";

/// Hashes a 32-byte secret to P-256 with `P256_XMD:SHA-256_SSWU_RO_` and
/// [`OPTIGA_DST`], returning the SEC1 uncompressed public key
/// `0x04 || x || y`.
pub fn hash_to_curve_optiga(input: &[u8; 32]) -> Result<[u8; 65]> {
    let point = Zeroizing::new(hash_to_curve::<ExpandMsgXmd<Sha256>>(
        &[input],
        &[OPTIGA_DST],
        &P256_XMD_SHA256_SSWU_RO,
    )?);
    point.to_uncompressed()
}

#[cfg(test)]
mod tests {
    use super::hash_to_curve_optiga;
    use crate::curve::{AffinePoint, NIST_P256};
    use hex_literal::hex;

    #[test]
    fn known_answers() {
        assert_eq!(
            hash_to_curve_optiga(&[0u8; 32]).unwrap(),
            hex!(
                "04dee974795d5d785f3e0f4c000210c7f81579b0ebc10d5a53a553f8011bb4286452d46b3a74af266bba352e8cdb53fe6d779370cad30c4192ec25c8eca5a8efb7"
            )
        );
        assert_eq!(
            hash_to_curve_optiga(&hex!(
                "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f"
            ))
            .unwrap(),
            hex!(
                "04676367d4ede754360b2f306a6cfb2e60e77e0e348c20e4276430998a5ea04db87718218314372f5fac8628f06ddc7a254776c6a361eb7381a3cfc8bd0c9bc65b"
            )
        );
    }

    #[test]
    fn output_is_a_valid_public_key() {
        let encoded = hash_to_curve_optiga(&[0x5a; 32]).unwrap();
        assert!(AffinePoint::from_uncompressed(&encoded, &NIST_P256).is_ok());
    }
}
