//! Modular inversion.
//!
//! Two strategies implement [`InversionStrategy`]; the `inverse-fast`
//! feature picks which one backs [`FieldElement::invert`]. Both stay
//! available by name.

mod fast;
mod slow;

pub use self::{fast::InverseFast, slow::InverseSlow};

use crate::{FieldElement, Result};
use cfg_if::cfg_if;

/// A way of computing `x^-1 mod p`.
pub trait InversionStrategy {
    /// Returns the canonical inverse `< p` of `x` modulo `prime`.
    ///
    /// `x` must be normalized; it need not be reduced. Returns an error if
    /// `x ≡ 0 (mod p)`.
    fn invert(x: &FieldElement, prime: &FieldElement) -> Result<FieldElement>;
}

cfg_if! {
    if #[cfg(feature = "inverse-fast")] {
        /// Strategy used by [`FieldElement::invert`].
        pub type DefaultInverse = InverseFast;
    } else {
        /// Strategy used by [`FieldElement::invert`].
        pub type DefaultInverse = InverseSlow;
    }
}

impl FieldElement {
    /// Returns `self^-1 mod prime` using [`DefaultInverse`].
    pub fn invert(&self, prime: &Self) -> Result<Self> {
        DefaultInverse::invert(self, prime)
    }
}
