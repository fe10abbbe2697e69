//! Error types.

use crate::ExpandMsgXmdError;
use core::fmt;

/// Result type with the `hash2curve` crate's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

/// Hash-to-curve errors.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    /// `expand_message` rejected its inputs.
    ExpandMsg(ExpandMsgXmdError),
    /// Per-element expansion length is zero or wider than 64 bytes.
    ExpansionLength,
    /// Suite with a cofactor other than one.
    UnsupportedCofactor,
    /// Curve or map constants the simplified SWU map cannot work with.
    UnsupportedCurve,
    /// Coordinates do not satisfy the curve equation.
    NotOnCurve,
    /// Malformed point encoding.
    InvalidEncoding,
    /// The point at infinity has no affine encoding.
    Identity,
    /// Field arithmetic failure.
    Field(bignum256::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ExpandMsg(err) => write!(f, "expand_message failed: {err}"),
            Error::ExpansionLength => write!(f, "expansion length must be between 1 and 64 bytes"),
            Error::UnsupportedCofactor => write!(f, "cofactor clearing is not supported"),
            Error::UnsupportedCurve => write!(f, "curve parameters not supported by the SWU map"),
            Error::NotOnCurve => write!(f, "point is not on the curve"),
            Error::InvalidEncoding => write!(f, "invalid point encoding"),
            Error::Identity => write!(f, "point at infinity"),
            Error::Field(err) => write!(f, "{err}"),
        }
    }
}

impl core::error::Error for Error {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Error::ExpandMsg(err) => Some(err),
            Error::Field(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ExpandMsgXmdError> for Error {
    fn from(err: ExpandMsgXmdError) -> Self {
        Error::ExpandMsg(err)
    }
}

impl From<bignum256::Error> for Error {
    fn from(err: bignum256::Error) -> Self {
        Error::Field(err)
    }
}
