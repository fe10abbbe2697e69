use super::InversionStrategy;
use crate::{Error, FieldElement, Result};
use zeroize::Zeroizing;

/// Inversion by Fermat's little theorem, `x^(p-2) mod p`.
///
/// Constant time in `x` apart from the zero check.
#[derive(Clone, Copy, Debug, Default)]
pub struct InverseSlow;

impl InversionStrategy for InverseSlow {
    fn invert(x: &FieldElement, prime: &FieldElement) -> Result<FieldElement> {
        let x = Zeroizing::new(x.fast_mod(prime).mod_p(prime));
        if bool::from(x.is_zero()) {
            return Err(Error);
        }

        let exp = prime.subtract(&FieldElement::from_u32(2));
        Ok(x.pow(&exp, prime))
    }
}
