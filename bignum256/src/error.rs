//! Error types.

use core::fmt;

/// Error type.
///
/// Returned when an operation has no well-defined result for its input, e.g.
/// inverting an element congruent to zero.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Error;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field error")
    }
}

impl core::error::Error for Error {}

/// Result type.
pub type Result<T> = core::result::Result<T, Error>;
