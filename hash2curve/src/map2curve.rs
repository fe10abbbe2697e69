//! Mapping field elements to points on the curve.

use crate::{
    Error, Result,
    curve::{AffinePoint, CurveParams, add, field_from_i32, mul, rhs, square},
};
use bignum256::FieldElement;
use subtle::{Choice, ConditionallySelectable};
use zeroize::Zeroize;

/// Sign of a field element, used to pick one of the two square roots.
pub type Sgn0 = fn(&FieldElement) -> Choice;

/// `sgn0` for prime fields (`m = 1`): the parity of the canonical
/// representative.
///
/// <https://www.rfc-editor.org/rfc/rfc9380.html#name-the-sgn0-function>
pub fn sgn0_parity(x: &FieldElement) -> Choice {
    x.is_odd()
}

/// Simplified Shallue-van de Woestijne-Ulas map.
///
/// <https://www.rfc-editor.org/rfc/rfc9380.html#name-simplified-swu-method>
///
/// Maps `u < p` to a point `(x, y)` on `y^2 = x^3 + ax + b`. The curve must
/// have `a != 0`, `b != 0` and `p = 3 (mod 4)`, and `z` must be a non-zero
/// non-square satisfying the conditions of RFC 9380 section 6.6.2. Apart
/// from the up-front parameter checks the map runs in constant time: every
/// decision on `u` goes through conditional selection.
///
/// # Errors
/// - [`Error::UnsupportedCurve`] if `a`, `b` or `z` is zero, or `p != 3 (mod 4)`.
pub fn simple_swu(
    u: &FieldElement,
    a: &FieldElement,
    b: &FieldElement,
    z: &FieldElement,
    prime: &FieldElement,
    sgn0: Sgn0,
) -> Result<(FieldElement, FieldElement)> {
    let p = prime;
    if bool::from(a.is_zero() | b.is_zero() | z.is_zero()) || p.limbs()[0] & 3 != 3 {
        return Err(Error::UnsupportedCurve);
    }

    // public constants
    let neg_b_over_a = mul(&b.negate(p), &inv0(a, p), p);
    let b_over_za = mul(b, &inv0(&mul(z, a, p), p), p);

    let mut u2 = square(u, p);
    let mut zu2 = mul(z, &u2, p);

    // tv1 = inv0(Z^2 u^4 + Z u^2)
    let mut z2u4 = square(&zu2, p);
    let mut tv0 = add(&z2u4, &zu2, p);
    let mut tv1 = inv0(&tv0, p);
    let e1 = tv1.is_zero();

    // x1 = (-B / A) (1 + tv1), or B / (Z A) in the exceptional case
    let mut tv1_plus_one = tv1.add_mod_small(1, p);
    let mut x1 = mul(&neg_b_over_a, &tv1_plus_one, p);
    x1.conditional_assign(&b_over_za, e1);

    let mut gx1 = rhs(&x1, a, b, p);
    let mut x2 = mul(&zu2, &x1, p);
    let mut gx2 = rhs(&x2, a, b, p);

    let e2 = gx1.legendre(p);
    let x = FieldElement::conditional_select(&x2, &x1, e2);
    let mut gx = FieldElement::conditional_select(&gx2, &gx1, e2);
    let mut root = gx.sqrt(p);

    let e3 = !(sgn0(u) ^ sgn0(&root));
    let y = root.conditional_negate(!e3, p);

    for tmp in [
        &mut u2,
        &mut zu2,
        &mut z2u4,
        &mut tv0,
        &mut tv1,
        &mut tv1_plus_one,
        &mut x1,
        &mut gx1,
        &mut x2,
        &mut gx2,
        &mut gx,
        &mut root,
    ] {
        tmp.zeroize();
    }

    Ok((x, y))
}

/// Maps `u` onto `curve` with [`simple_swu`], taking `a` and `b` from the
/// curve and the map constant `z` as a small integer.
pub fn map_to_curve(
    u: &FieldElement,
    curve: &CurveParams,
    z: i32,
    sgn0: Sgn0,
) -> Result<AffinePoint> {
    let p = &curve.prime;
    let (x, y) = simple_swu(u, &curve.a(), &curve.b, &field_from_i32(z, p), p, sgn0)?;
    Ok(AffinePoint::new(x, y))
}

/// `inv0(x) = x^(p - 2)`, so zero maps to zero.
fn inv0(x: &FieldElement, p: &FieldElement) -> FieldElement {
    x.pow(&p.subtract(&FieldElement::from_u32(2)), p)
}
