use crate::{
    curve::{CurveParams, NIST_P256},
    map2curve::{Sgn0, sgn0_parity},
};

/// Hash-to-curve suite parameters, minus the hash function, which is chosen
/// through the [`ExpandMsg`](crate::ExpandMsg) type parameter.
///
/// <https://www.rfc-editor.org/rfc/rfc9380.html#name-suites-for-hashing>
#[derive(Clone, Copy, Debug)]
pub struct Suite {
    /// Target curve.
    pub curve: CurveParams,
    /// Simplified SWU constant `Z`, as a small signed integer.
    pub z: i32,
    /// Cofactor `h_eff`. Only `1` is supported.
    pub cofactor: u32,
    /// The `L` parameter: bytes expanded per field element.
    pub expansion_len: usize,
    /// Sign function.
    pub sgn0: Sgn0,
}

/// `P256_XMD:SHA-256_SSWU_RO_` and `P256_XMD:SHA-256_SSWU_NU_`.
///
/// <https://www.rfc-editor.org/rfc/rfc9380.html#name-suites-for-nist-p-256>
pub const P256_XMD_SHA256_SSWU_RO: Suite = Suite {
    curve: NIST_P256,
    z: -10,
    cofactor: 1,
    expansion_len: 48,
    sgn0: sgn0_parity,
};
