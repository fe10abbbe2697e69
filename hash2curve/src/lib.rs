#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc = include_str!("../README.md")]
#![doc(
    html_logo_url = "https://raw.githubusercontent.com/RustCrypto/meta/master/logo.svg",
    html_favicon_url = "https://raw.githubusercontent.com/RustCrypto/meta/master/logo.svg"
)]
#![forbid(unsafe_code)]
#![warn(
    clippy::unwrap_used,
    clippy::mod_module_files,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused,
    unused_attributes,
    unused_imports,
    unused_mut,
    unused_must_use
)]

#[cfg(test)]
extern crate std;

pub mod curve;
mod error;
mod hash2field;
mod map2curve;
#[cfg(feature = "sha256")]
mod optiga;
mod parameters;

pub use error::{Error, Result};
pub use hash2field::*;
pub use map2curve::*;
#[cfg(feature = "sha256")]
pub use optiga::*;
pub use parameters::*;

pub use bignum256;

use crate::curve::{AffinePoint, point_add};
use bignum256::FieldElement;
use zeroize::Zeroizing;

/// Computes the hash to curve routine.
///
/// From <https://www.rfc-editor.org/rfc/rfc9380.html>:
///
/// > Uniform encoding from byte strings to points in G.
/// > That is, the distribution of its output is statistically close
/// > to uniform in G.
///
/// For the `expand_message` call, `len_in_bytes = suite.expansion_len * 2`.
///
/// # Errors
///
/// - [`Error::UnsupportedCofactor`] if the suite's cofactor is not one
/// - [`Error::UnsupportedCurve`] if the curve does not fit the SWU map
/// - when the chosen [`ExpandMsg`] implementation returns an error; see
///   [`ExpandMsgXmdError`]
pub fn hash_to_curve<X>(msg: &[&[u8]], dst: &[&[u8]], suite: &Suite) -> Result<AffinePoint>
where
    X: ExpandMsg,
    Error: From<X::Error>,
{
    if suite.cofactor != 1 {
        return Err(Error::UnsupportedCofactor);
    }

    let curve = &suite.curve;
    let mut u = Zeroizing::new([FieldElement::ZERO; 2]);
    hash_to_field::<X>(msg, dst, &curve.prime, suite.expansion_len, &mut u[..])?;

    let q0 = Zeroizing::new(map_to_curve(&u[0], curve, suite.z, suite.sgn0)?);
    let q1 = Zeroizing::new(map_to_curve(&u[1], curve, suite.z, suite.sgn0)?);
    point_add(curve, &q0, &q1)
}

/// Computes the encode to curve routine.
///
/// From <https://www.rfc-editor.org/rfc/rfc9380.html>:
///
/// > Nonuniform encoding from byte strings to
/// > points in G. That is, the distribution of its output is not
/// > uniformly random in G.
///
/// For the `expand_message` call, `len_in_bytes = suite.expansion_len`.
///
/// # Errors
///
/// Same as [`hash_to_curve`].
pub fn encode_to_curve<X>(msg: &[&[u8]], dst: &[&[u8]], suite: &Suite) -> Result<AffinePoint>
where
    X: ExpandMsg,
    Error: From<X::Error>,
{
    if suite.cofactor != 1 {
        return Err(Error::UnsupportedCofactor);
    }

    let curve = &suite.curve;
    let mut u = Zeroizing::new([FieldElement::ZERO; 1]);
    hash_to_field::<X>(msg, dst, &curve.prime, suite.expansion_len, &mut u[..])?;

    map_to_curve(&u[0], curve, suite.z, suite.sgn0)
}
