//! Short Weierstrass curves `y^2 = x^3 + ax + b` in affine coordinates.
//!
//! The group law here branches on the points it is given and inverts with
//! [`FieldElement::invert`]; it is not constant time.

use crate::{Error, Result};
use bignum256::{
    FieldElement,
    primes::{NIST_P256_N, NIST_P256_P, SECP256K1_N, SECP256K1_P},
};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use zeroize::{Zeroize, Zeroizing};

/// Curve parameters.
#[derive(Clone, Copy, Debug)]
pub struct CurveParams {
    /// Base field prime.
    pub prime: FieldElement,
    /// Coefficient `a`, as a small signed integer.
    pub a: i32,
    /// Coefficient `b`, reduced modulo `prime`.
    pub b: FieldElement,
    /// Order of the group generated by `generator`.
    pub order: FieldElement,
    /// Base point.
    pub generator: AffinePoint,
}

/// NIST P-256 (secp256r1).
pub const NIST_P256: CurveParams = CurveParams {
    prime: NIST_P256_P,
    a: -3,
    b: FieldElement::from_be_hex(
        "5ac635d8aa3a93e7b3ebbd55769886bc651d06b0cc53b0f63bce3c3e27d2604b",
    ),
    order: NIST_P256_N,
    generator: AffinePoint {
        x: FieldElement::from_be_hex(
            "6b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c296",
        ),
        y: FieldElement::from_be_hex(
            "4fe342e2fe1a7f9b8ee7eb4a7c0f9e162bce33576b315ececbb6406837bf51f5",
        ),
        infinity: 0,
    },
};

/// secp256k1.
pub const SECP256K1: CurveParams = CurveParams {
    prime: SECP256K1_P,
    a: 0,
    b: FieldElement::from_u32(7),
    order: SECP256K1_N,
    generator: AffinePoint {
        x: FieldElement::from_be_hex(
            "79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798",
        ),
        y: FieldElement::from_be_hex(
            "483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8",
        ),
        infinity: 0,
    },
};

impl CurveParams {
    /// Coefficient `a` as a field element.
    pub fn a(&self) -> FieldElement {
        field_from_i32(self.a, &self.prime)
    }

    /// Right-hand side of the curve equation, `x^3 + ax + b`.
    pub fn rhs(&self, x: &FieldElement) -> FieldElement {
        rhs(x, &self.a(), &self.b, &self.prime)
    }
}

/// Maps a small signed integer into the field, `v < 0` becoming `p - |v|`.
pub fn field_from_i32(v: i32, prime: &FieldElement) -> FieldElement {
    let magnitude = FieldElement::from_u32(v.unsigned_abs());
    if v < 0 {
        prime.subtract(&magnitude)
    } else {
        magnitude
    }
}

/// Point on a short Weierstrass curve in affine coordinates, or the point at
/// infinity.
#[derive(Clone, Copy, Debug)]
pub struct AffinePoint {
    /// x-coordinate
    pub x: FieldElement,
    /// y-coordinate
    pub y: FieldElement,
    /// Is this point the point at infinity? 0 = no, 1 = yes
    infinity: u8,
}

impl AffinePoint {
    /// Additive identity of the group: the point at infinity.
    pub const IDENTITY: Self = Self {
        x: FieldElement::ZERO,
        y: FieldElement::ZERO,
        infinity: 1,
    };

    /// Creates a finite point. The coordinates are not validated; see
    /// [`AffinePoint::is_on_curve`].
    pub const fn new(x: FieldElement, y: FieldElement) -> Self {
        Self { x, y, infinity: 0 }
    }

    /// Is this point the identity point?
    pub fn is_identity(&self) -> Choice {
        Choice::from(self.infinity)
    }

    /// Checks the curve equation. Coordinates must be reduced; the identity
    /// is on every curve.
    pub fn is_on_curve(&self, curve: &CurveParams) -> Choice {
        let p = &curve.prime;
        let reduced = self.x.is_less(p) & self.y.is_less(p);
        let lhs = square(&self.y, p);
        self.is_identity() | (reduced & lhs.ct_eq(&curve.rhs(&self.x)))
    }

    /// Negation, `(x, -y)`.
    pub fn neg(&self, curve: &CurveParams) -> Self {
        Self {
            x: self.x,
            y: self.y.negate(&curve.prime),
            infinity: self.infinity,
        }
    }

    /// SEC1 uncompressed encoding `0x04 || x || y`.
    pub fn to_uncompressed(&self) -> Result<[u8; 65]> {
        if bool::from(self.is_identity()) {
            return Err(Error::Identity);
        }
        let mut out = [0u8; 65];
        out[0] = 0x04;
        out[1..33].copy_from_slice(&self.x.write_be());
        out[33..].copy_from_slice(&self.y.write_be());
        Ok(out)
    }

    /// Decodes a SEC1 uncompressed point and checks it lies on `curve`.
    pub fn from_uncompressed(bytes: &[u8; 65], curve: &CurveParams) -> Result<Self> {
        if bytes[0] != 0x04 {
            return Err(Error::InvalidEncoding);
        }
        let mut coordinate = [0u8; 32];
        coordinate.copy_from_slice(&bytes[1..33]);
        let x = FieldElement::read_be(&coordinate);
        coordinate.copy_from_slice(&bytes[33..]);
        let y = FieldElement::read_be(&coordinate);
        coordinate.zeroize();

        let p = &curve.prime;
        if !bool::from(x.is_less(p) & y.is_less(p)) {
            return Err(Error::InvalidEncoding);
        }

        let point = Self::new(x, y);
        if bool::from(point.is_on_curve(curve)) {
            Ok(point)
        } else {
            Err(Error::NotOnCurve)
        }
    }
}

impl ConditionallySelectable for AffinePoint {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self {
            x: FieldElement::conditional_select(&a.x, &b.x, choice),
            y: FieldElement::conditional_select(&a.y, &b.y, choice),
            infinity: u8::conditional_select(&a.infinity, &b.infinity, choice),
        }
    }
}

impl ConstantTimeEq for AffinePoint {
    fn ct_eq(&self, other: &Self) -> Choice {
        let both_identity = self.is_identity() & other.is_identity();
        let same_finite = !self.is_identity()
            & !other.is_identity()
            & self.x.ct_eq(&other.x)
            & self.y.ct_eq(&other.y);
        both_identity | same_finite
    }
}

impl PartialEq for AffinePoint {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for AffinePoint {}

impl Zeroize for AffinePoint {
    fn zeroize(&mut self) {
        self.x.zeroize();
        self.y.zeroize();
        self.infinity.zeroize();
    }
}

/// Returns `P + Q`.
pub fn point_add(curve: &CurveParams, lhs: &AffinePoint, rhs: &AffinePoint) -> Result<AffinePoint> {
    if bool::from(lhs.is_identity()) {
        return Ok(*rhs);
    }
    if bool::from(rhs.is_identity()) {
        return Ok(*lhs);
    }
    if lhs.x == rhs.x {
        return if lhs.y == rhs.y {
            point_double(curve, lhs)
        } else {
            // Q = -P
            Ok(AffinePoint::IDENTITY)
        };
    }

    let p = &curve.prime;
    // lambda = (y2 - y1) / (x2 - x1)
    let dy = Zeroizing::new(sub(&rhs.y, &lhs.y, p));
    let dx = Zeroizing::new(sub(&rhs.x, &lhs.x, p));
    let dx_inv = Zeroizing::new(dx.invert(p)?);
    let lambda = Zeroizing::new(mul(&dy, &dx_inv, p));
    Ok(chord(curve, &lambda, lhs, &rhs.x))
}

/// Returns `2P`.
pub fn point_double(curve: &CurveParams, point: &AffinePoint) -> Result<AffinePoint> {
    if bool::from(point.is_identity() | point.y.is_zero()) {
        return Ok(AffinePoint::IDENTITY);
    }

    let p = &curve.prime;
    // lambda = (3 x^2 + a) / 2y
    let x2 = Zeroizing::new(square(&point.x, p));
    let numerator = Zeroizing::new(add(&x2.mul_small(3, p), &curve.a(), p));
    let denominator = Zeroizing::new(point.y.mul_small(2, p));
    let denominator_inv = Zeroizing::new(denominator.invert(p)?);
    let lambda = Zeroizing::new(mul(&numerator, &denominator_inv, p));
    Ok(chord(curve, &lambda, point, &point.x))
}

/// Third intersection of the line through `point` with slope `lambda`,
/// negated: `x3 = lambda^2 - x1 - x2`, `y3 = lambda (x1 - x3) - y1`.
fn chord(
    curve: &CurveParams,
    lambda: &FieldElement,
    point: &AffinePoint,
    x2: &FieldElement,
) -> AffinePoint {
    let p = &curve.prime;
    let lambda2 = Zeroizing::new(square(lambda, p));
    let t = Zeroizing::new(sub(&lambda2, &point.x, p));
    let x3 = sub(&t, x2, p);
    let dx = Zeroizing::new(sub(&point.x, &x3, p));
    let slope = Zeroizing::new(mul(lambda, &dx, p));
    let y3 = sub(&slope, &point.y, p);
    AffinePoint::new(x3, y3)
}

/// `x^3 + ax + b` for arbitrary coefficients.
pub(crate) fn rhs(
    x: &FieldElement,
    a: &FieldElement,
    b: &FieldElement,
    p: &FieldElement,
) -> FieldElement {
    add(&mul(&add(&square(x, p), a, p), x, p), b, p)
}

/// Fully reduced product.
pub(crate) fn mul(a: &FieldElement, b: &FieldElement, p: &FieldElement) -> FieldElement {
    a.multiply(b, p).mod_p(p)
}

pub(crate) fn square(a: &FieldElement, p: &FieldElement) -> FieldElement {
    mul(a, a, p)
}

pub(crate) fn add(a: &FieldElement, b: &FieldElement, p: &FieldElement) -> FieldElement {
    a.add_mod(b, p)
}

/// Fully reduced difference; both inputs `< p`.
pub(crate) fn sub(a: &FieldElement, b: &FieldElement, p: &FieldElement) -> FieldElement {
    a.subtract_mod(b, p).fast_mod(p).mod_p(p)
}

#[cfg(test)]
mod tests {
    use super::{AffinePoint, NIST_P256, SECP256K1, field_from_i32, point_add, point_double};
    use crate::Error;
    use bignum256::FieldElement;
    use hex_literal::hex;

    #[test]
    fn generators_are_on_curve() {
        for curve in [NIST_P256, SECP256K1] {
            assert!(bool::from(curve.generator.is_on_curve(&curve)));
            assert!(bool::from(AffinePoint::IDENTITY.is_on_curve(&curve)));
        }
    }

    #[test]
    fn small_integers() {
        let p = NIST_P256.prime;
        assert_eq!(field_from_i32(5, &p), FieldElement::from_u32(5));
        assert_eq!(
            field_from_i32(-10, &p).add_mod(&FieldElement::from_u32(10), &p),
            FieldElement::ZERO
        );
        assert_eq!(NIST_P256.a(), p.subtract(&FieldElement::from_u32(3)));
    }

    #[test]
    fn p256_double_generator() {
        let g = NIST_P256.generator;
        let g2 = point_double(&NIST_P256, &g).unwrap();
        assert_eq!(
            g2.x.write_be(),
            hex!("7cf27b188d034f7e8a52380304b51ac3c08969e277f21b35a60b48fc47669978")
        );
        assert_eq!(
            g2.y.write_be(),
            hex!("07775510db8ed040293d9ac69f7430dbba7dade63ce982299e04b79d227873d1")
        );
        assert_eq!(point_add(&NIST_P256, &g, &g).unwrap(), g2);

        let g3 = point_add(&NIST_P256, &g2, &g).unwrap();
        assert_eq!(
            g3.x.write_be(),
            hex!("5ecbe4d1a6330a44c8f7ef951d4bf165e6c6b721efada985fb41661bc6e7fd6c")
        );
        assert_eq!(
            g3.y.write_be(),
            hex!("8734640c4998ff7e374b06ce1a64a2ecd82ab036384fb83d9a79b127a27d5032")
        );
        assert!(bool::from(g3.is_on_curve(&NIST_P256)));
    }

    #[test]
    fn identity_laws() {
        for curve in [NIST_P256, SECP256K1] {
            let g = curve.generator;
            let id = AffinePoint::IDENTITY;
            assert_eq!(point_add(&curve, &g, &id).unwrap(), g);
            assert_eq!(point_add(&curve, &id, &g).unwrap(), g);
            assert_eq!(point_add(&curve, &g, &g.neg(&curve)).unwrap(), id);
            assert_eq!(point_double(&curve, &id).unwrap(), id);
        }
    }

    #[test]
    fn addition_commutes_and_associates() {
        let curve = SECP256K1;
        let g = curve.generator;
        let g2 = point_double(&curve, &g).unwrap();
        let g3 = point_add(&curve, &g2, &g).unwrap();
        assert_eq!(point_add(&curve, &g, &g2).unwrap(), g3);

        let g4 = point_double(&curve, &g2).unwrap();
        assert_eq!(point_add(&curve, &g3, &g).unwrap(), g4);
        assert_eq!(point_add(&curve, &g, &g3).unwrap(), g4);
    }

    #[test]
    fn operands_are_left_intact() {
        let curve = NIST_P256;
        let g = curve.generator;
        let g2 = point_double(&curve, &g).unwrap();
        let (g_before, g2_before) = (g, g2);
        let g3 = point_add(&curve, &g2, &g).unwrap();
        assert_eq!((g, g2), (g_before, g2_before));
        assert!(bool::from(g3.is_on_curve(&curve)));
        let sum = point_add(&curve, &g3, &g3.neg(&curve)).unwrap();
        assert_eq!(sum, AffinePoint::IDENTITY);
    }

    #[test]
    fn sec1_round_trip() {
        let g = NIST_P256.generator;
        let bytes = g.to_uncompressed().unwrap();
        assert_eq!(bytes[0], 0x04);
        assert_eq!(AffinePoint::from_uncompressed(&bytes, &NIST_P256), Ok(g));
        assert_eq!(AffinePoint::IDENTITY.to_uncompressed(), Err(Error::Identity));
    }

    #[test]
    fn sec1_rejects_invalid_points() {
        let mut bytes = NIST_P256.generator.to_uncompressed().unwrap();
        bytes[64] ^= 1;
        assert_eq!(
            AffinePoint::from_uncompressed(&bytes, &NIST_P256),
            Err(Error::NotOnCurve)
        );

        let mut bytes = NIST_P256.generator.to_uncompressed().unwrap();
        bytes[0] = 0x02;
        assert_eq!(
            AffinePoint::from_uncompressed(&bytes, &NIST_P256),
            Err(Error::InvalidEncoding)
        );

        let mut bytes = [0xffu8; 65];
        bytes[0] = 0x04;
        assert_eq!(
            AffinePoint::from_uncompressed(&bytes, &NIST_P256),
            Err(Error::InvalidEncoding)
        );
    }
}
