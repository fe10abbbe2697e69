//! `expand_message_xmd` based on a hash function.

use core::{fmt, marker::PhantomData};

use super::{Domain, ExpandMsg, Expander};
use digest::{
    FixedOutput, HashMarker, Output, Update,
    core_api::BlockSizeUser,
    generic_array::GenericArray,
    typenum::Unsigned,
};
use zeroize::Zeroize;

/// Implements `expand_message_xmd` via the [`ExpandMsg`] trait:
/// <https://www.rfc-editor.org/rfc/rfc9380.html#name-expand_message_xmd>
///
/// # Errors
/// - `dst` is empty or longer than 255 bytes
/// - `len_in_bytes` is zero or larger than `u16::MAX`
/// - `len_in_bytes > 255 * HashT::OutputSize`
#[derive(Debug)]
pub struct ExpandMsgXmd<HashT>(PhantomData<HashT>)
where
    HashT: BlockSizeUser + Default + FixedOutput + HashMarker + Update;

/// Error type for [`ExpandMsgXmd`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExpandMsgXmdError {
    /// The domain separation tag is empty.
    EmptyDst,
    /// The domain separation tag is longer than 255 bytes.
    DstTooLong,
    /// `len_in_bytes` is zero, larger than `u16::MAX`, or needs more than
    /// 255 hash blocks.
    InvalidLength,
}

impl fmt::Display for ExpandMsgXmdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDst => write!(f, "the domain separation tag must not be empty"),
            Self::DstTooLong => write!(f, "the domain separation tag exceeds 255 bytes"),
            Self::InvalidLength => write!(f, "the requested output length is not supported"),
        }
    }
}

impl core::error::Error for ExpandMsgXmdError {}

impl<HashT> ExpandMsg for ExpandMsgXmd<HashT>
where
    HashT: BlockSizeUser + Default + FixedOutput + HashMarker + Update,
{
    type Expander<'dst> = ExpanderXmd<'dst, HashT>;
    type Error = ExpandMsgXmdError;

    fn expand_message<'dst>(
        msg: &[&[u8]],
        dst: &'dst [&'dst [u8]],
        len_in_bytes: usize,
    ) -> Result<Self::Expander<'dst>, Self::Error> {
        let len_in_bytes = u16::try_from(len_in_bytes)
            .ok()
            .filter(|len| *len != 0)
            .ok_or(ExpandMsgXmdError::InvalidLength)?;

        let b_in_bytes = HashT::OutputSize::USIZE;
        let ell = u8::try_from(usize::from(len_in_bytes).div_ceil(b_in_bytes))
            .map_err(|_| ExpandMsgXmdError::InvalidLength)?;

        let domain = Domain::xmd(dst)?;
        let mut b_0 = HashT::default();
        b_0.update(&GenericArray::<u8, HashT::BlockSize>::default());

        for msg in msg {
            b_0.update(msg);
        }

        b_0.update(&len_in_bytes.to_be_bytes());
        b_0.update(&[0]);
        domain.update_hash(&mut b_0);
        b_0.update(&[domain.len()]);
        let b_0 = b_0.finalize_fixed();

        let mut b_vals = HashT::default();
        b_vals.update(&b_0[..]);
        b_vals.update(&[1u8]);
        domain.update_hash(&mut b_vals);
        b_vals.update(&[domain.len()]);
        let b_vals = b_vals.finalize_fixed();

        Ok(ExpanderXmd {
            b_0,
            b_vals,
            domain,
            index: 1,
            offset: 0,
            ell,
        })
    }
}

/// [`Expander`] type for [`ExpandMsgXmd`].
#[derive(Debug)]
pub struct ExpanderXmd<'a, HashT>
where
    HashT: BlockSizeUser + Default + FixedOutput + HashMarker + Update,
{
    b_0: Output<HashT>,
    b_vals: Output<HashT>,
    domain: Domain<'a>,
    index: u8,
    offset: usize,
    ell: u8,
}

impl<HashT> ExpanderXmd<'_, HashT>
where
    HashT: BlockSizeUser + Default + FixedOutput + HashMarker + Update,
{
    fn next(&mut self) -> bool {
        if self.index < self.ell {
            self.index += 1;
            self.offset = 0;
            // b_0 XOR b_(idx - 1)
            let mut tmp = Output::<HashT>::default();
            self.b_0
                .iter()
                .zip(&self.b_vals[..])
                .enumerate()
                .for_each(|(j, (b0val, bi1val))| tmp[j] = b0val ^ bi1val);
            let mut b_vals = HashT::default();
            b_vals.update(&tmp);
            b_vals.update(&[self.index]);
            self.domain.update_hash(&mut b_vals);
            b_vals.update(&[self.domain.len()]);
            tmp.as_mut_slice().zeroize();
            self.b_vals.as_mut_slice().zeroize();
            self.b_vals = b_vals.finalize_fixed();
            true
        } else {
            false
        }
    }
}

impl<HashT> Expander for ExpanderXmd<'_, HashT>
where
    HashT: BlockSizeUser + Default + FixedOutput + HashMarker + Update,
{
    fn fill_bytes(&mut self, okm: &mut [u8]) {
        for b in okm {
            if self.offset == self.b_vals.len() && !self.next() {
                return;
            }
            *b = self.b_vals[self.offset];
            self.offset += 1;
        }
    }
}

impl<HashT> Drop for ExpanderXmd<'_, HashT>
where
    HashT: BlockSizeUser + Default + FixedOutput + HashMarker + Update,
{
    fn drop(&mut self) {
        self.b_0.as_mut_slice().zeroize();
        self.b_vals.as_mut_slice().zeroize();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use hex_literal::hex;
    use sha2::Sha256;

    struct TestVector {
        msg: &'static [u8],
        uniform_bytes: &'static [u8],
    }

    impl TestVector {
        fn assert<HashT>(&self, dst: &'static [u8]) -> Result<(), ExpandMsgXmdError>
        where
            HashT: BlockSizeUser + Default + FixedOutput + HashMarker + Update,
        {
            let dst = [dst];
            let mut expander =
                ExpandMsgXmd::<HashT>::expand_message(&[self.msg], &dst, self.uniform_bytes.len())?;

            let mut uniform_bytes = [0u8; 128];
            let uniform_bytes = &mut uniform_bytes[..self.uniform_bytes.len()];
            expander.fill_bytes(uniform_bytes);

            assert_eq!(uniform_bytes, self.uniform_bytes);
            Ok(())
        }
    }

    const DST: &[u8] = b"QUUX-V01-CS02-with-expander-SHA256-128";

    #[test]
    fn expand_message_xmd_sha_256() -> Result<(), ExpandMsgXmdError> {
        const DST_PRIME: &[u8] =
            &hex!("515555582d5630312d435330322d776974682d657870616e6465722d5348413235362d31323826");

        let dst_prime = Domain::xmd(&[DST])?;
        dst_prime.assert_dst(DST_PRIME);

        const TEST_VECTORS_32: &[TestVector] = &[
            TestVector {
                msg: b"",
                uniform_bytes: &hex!(
                    "68a985b87eb6b46952128911f2a4412bbc302a9d759667f87f7a21d803f07235"
                ),
            },
            TestVector {
                msg: b"abc",
                uniform_bytes: &hex!(
                    "d8ccab23b5985ccea865c6c97b6e5b8350e794e603b4b97902f53a8a0d605615"
                ),
            },
            TestVector {
                msg: b"abcdef0123456789",
                uniform_bytes: &hex!(
                    "eff31487c770a893cfb36f912fbfcbff40d5661771ca4b2cb4eafe524333f5c1"
                ),
            },
        ];

        for test_vector in TEST_VECTORS_32 {
            test_vector.assert::<Sha256>(DST)?;
        }

        const TEST_VECTORS_128: &[TestVector] = &[TestVector {
            msg: b"",
            uniform_bytes: &hex!(
                "af84c27ccfd45d41914fdff5df25293e221afc53d8ad2ac06d5e3e29485dadbee0d121587713a3e0dd4d5e69e93eb7cd4f5df4cd103e188cf60cb02edc3edf18eda8576c412b18ffb658e3dd6ec849469b979d444cf7b26911a08e63cf31f9dcc541708d3491184472c2c29bb749d4286b004ceb5ee6b9a7fa5b646c993f0ced"
            ),
        }];

        for test_vector in TEST_VECTORS_128 {
            test_vector.assert::<Sha256>(DST)?;
        }

        Ok(())
    }

    #[test]
    fn dst_split_across_slices() -> Result<(), ExpandMsgXmdError> {
        let (head, tail) = DST.split_at(10);
        let dst = [head, tail];
        let msg = [b"a".as_slice(), b"bc".as_slice()];
        let mut split = ExpandMsgXmd::<Sha256>::expand_message(&msg, &dst, 32)?;
        let mut out = [0u8; 32];
        split.fill_bytes(&mut out);
        assert_eq!(
            out,
            hex!("d8ccab23b5985ccea865c6c97b6e5b8350e794e603b4b97902f53a8a0d605615")
        );
        Ok(())
    }

    fn expand<'a>(
        dst: &'a [&'a [u8]],
        len_in_bytes: usize,
    ) -> Result<ExpanderXmd<'a, Sha256>, ExpandMsgXmdError> {
        ExpandMsgXmd::<Sha256>::expand_message(&[b"msg".as_slice()], dst, len_in_bytes)
    }

    #[test]
    fn rejects_bad_dst() {
        assert_eq!(expand(&[], 32).err(), Some(ExpandMsgXmdError::EmptyDst));
        assert_eq!(
            expand(&[b"".as_slice()], 32).err(),
            Some(ExpandMsgXmdError::EmptyDst)
        );
        let long = [0x41u8; 256];
        assert_eq!(
            expand(&[long.as_slice()], 32).err(),
            Some(ExpandMsgXmdError::DstTooLong)
        );
        assert!(expand(&[&long[..255]], 32).is_ok());
    }

    #[test]
    fn rejects_bad_length() {
        for len in [0, 255 * 32 + 1, 65536] {
            assert_eq!(
                expand(&[DST], len).err(),
                Some(ExpandMsgXmdError::InvalidLength)
            );
        }
        assert!(expand(&[DST], 255 * 32).is_ok());
    }
}
