//! Hashing to field elements.
//!
//! <https://www.rfc-editor.org/rfc/rfc9380.html>

mod expand_msg;

pub use expand_msg::{xmd::*, *};

use crate::{Error, Result};
use bignum256::{FieldElement, WideFieldElement};
use zeroize::Zeroizing;

/// Widest expansion reduced per element, in bytes.
const MAX_EXPANSION_LEN: usize = 64;

/// Convert an arbitrary byte sequence into field elements.
///
/// <https://www.rfc-editor.org/rfc/rfc9380.html#name-hash_to_field-implementatio>
///
/// Expands `msg` to `expansion_len * out.len()` bytes and reduces each
/// `expansion_len`-byte chunk modulo `prime`. Every output is fully reduced.
///
/// # Errors
/// - `expansion_len` is zero or larger than 64
/// - see implementors of [`ExpandMsg`] for additional errors:
///   - [`ExpandMsgXmd`]
pub fn hash_to_field<X>(
    msg: &[&[u8]],
    dst: &[&[u8]],
    prime: &FieldElement,
    expansion_len: usize,
    out: &mut [FieldElement],
) -> Result<()>
where
    X: ExpandMsg,
    Error: From<X::Error>,
{
    if expansion_len == 0 || expansion_len > MAX_EXPANSION_LEN {
        return Err(Error::ExpansionLength);
    }
    let len_in_bytes = expansion_len
        .checked_mul(out.len())
        .ok_or(Error::ExpansionLength)?;

    let mut expander = X::expand_message(msg, dst, len_in_bytes)?;
    // chunks are left-padded to 512 bits
    let mut tmp = Zeroizing::new([0u8; MAX_EXPANSION_LEN]);
    for o in out.iter_mut() {
        expander.fill_bytes(&mut tmp[MAX_EXPANSION_LEN - expansion_len..]);
        *o = WideFieldElement::from_be_bytes(&tmp).reduce(prime);
    }
    Ok(())
}
