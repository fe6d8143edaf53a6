//! Error kinds returned by the core. None carry secret-dependent information.

use core::fmt;

/// If the condition is not met, return the given error. Borrowed in spirit from `anyhow`.
macro_rules! ensure {
    ($cond:expr, $err:expr $(,)?) => {
        if !($cond) {
            return Err($err);
        }
    };
}

pub(crate) use ensure;

/// Error conditions the core can report across its external interface.
///
/// Every variant is opaque with respect to key material: none of them encode
/// *why* in a way that depends on secret data, only on public structure
/// (buffer lengths, encoded field ranges, call ordering).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A caller-supplied buffer does not match the length required by the key's variant.
    InvalidLength,
    /// A decoded 12-bit coefficient was `>= q`, or an embedded `pkhash` did not match.
    InvalidEncoding,
    /// An install was attempted on a `Key` that already carries public or private material.
    ImmutableKey,
    /// Scratch or storage could not be obtained.
    AllocationFailure,
    /// A symmetric primitive supplied via `Oracles` reported failure.
    OracleFailure,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Error::InvalidLength => "buffer length does not match the key's parameter set",
            Error::InvalidEncoding => "encoded value failed range or hash validation",
            Error::ImmutableKey => "key already carries installed material",
            Error::AllocationFailure => "scratch or storage could not be obtained",
            Error::OracleFailure => "a symmetric primitive oracle reported failure",
        };
        f.write_str(msg)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
