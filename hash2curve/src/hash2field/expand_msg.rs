//! `expand_message` interface `for hash_to_field`.

pub(super) mod xmd;

use digest::Update;

/// Maximum domain separation tag length
const MAX_DST_LEN: usize = 255;

/// Trait for types implementing expand_message interface for `hash_to_field`.
///
/// # Errors
/// See implementors of [`ExpandMsg`] for errors.
pub trait ExpandMsg {
    /// Type holding data for the [`Expander`].
    type Expander<'dst>: Expander + Sized;
    /// Error returned by [`ExpandMsg::expand_message`].
    type Error: core::error::Error;

    /// Expands `msg` to the required number of bytes.
    ///
    /// Returns an expander that can be used to call `read` until enough
    /// bytes have been consumed
    fn expand_message<'dst>(
        msg: &[&[u8]],
        dst: &'dst [&'dst [u8]],
        len_in_bytes: usize,
    ) -> Result<Self::Expander<'dst>, Self::Error>;
}

/// Expander that, call `read` until enough bytes have been consumed.
pub trait Expander {
    /// Fill the array with the expanded bytes
    fn fill_bytes(&mut self, okm: &mut [u8]);
}

/// The domain separation tag, given as a list of slices.
///
/// Tags longer than 255 bytes are rejected rather than hashed down as
/// [section 5.3.3 of RFC9380][dst] allows.
///
/// [dst]: https://www.rfc-editor.org/rfc/rfc9380.html#name-using-dsts-longer-than-255-
#[derive(Debug)]
pub(crate) struct Domain<'a> {
    parts: &'a [&'a [u8]],
    len: u8,
}

impl<'a> Domain<'a> {
    pub fn xmd(dst: &'a [&'a [u8]]) -> Result<Self, xmd::ExpandMsgXmdError> {
        let len = dst.iter().map(|slice| slice.len()).sum::<usize>();

        // https://www.rfc-editor.org/rfc/rfc9380.html#section-3.1-4.2
        if len == 0 {
            Err(xmd::ExpandMsgXmdError::EmptyDst)
        } else if len > MAX_DST_LEN {
            Err(xmd::ExpandMsgXmdError::DstTooLong)
        } else {
            Ok(Self {
                parts: dst,
                len: len as u8,
            })
        }
    }

    pub fn update_hash<HashT: Update>(&self, hash: &mut HashT) {
        for part in self.parts {
            hash.update(part);
        }
    }

    pub fn len(&self) -> u8 {
        self.len
    }

    #[cfg(test)]
    pub fn assert_dst(&self, bytes: &[u8]) {
        let data: std::vec::Vec<u8> = self.parts.iter().copied().flatten().copied().collect();
        assert_eq!(data, &bytes[..bytes.len() - 1]);
        assert_eq!(self.len(), bytes[bytes.len() - 1]);
    }
}
