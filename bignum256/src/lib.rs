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
    rust_2018_idioms,
    trivial_casts,
    unused_qualifications
)]

#[cfg(test)]
extern crate std;

mod arithmetic;
mod element;
mod error;
mod inverse;
mod reduce;

pub mod primes;

pub use crate::{
    element::FieldElement,
    error::{Error, Result},
    inverse::{DefaultInverse, InverseFast, InverseSlow, InversionStrategy},
    reduce::WideFieldElement,
};
pub use subtle;
pub use zeroize;

/// Number of limbs in a [`FieldElement`].
pub const LIMBS: usize = 9;

/// Bits carried by each of the lower eight limbs of a normalized element.
pub const LIMB_BITS: u32 = 30;

/// Mask selecting the significant bits of a normalized limb.
pub const LIMB_MASK: u32 = (1 << LIMB_BITS) - 1;
