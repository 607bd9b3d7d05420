//! svwire error types

use thiserror::Error;

/// Serialization errors
///
/// Every variant is fatal to the call that produced it. Nothing is retried and
/// no partially decoded value is handed back.
#[derive(Error, Debug)]
pub enum Error {
    /// Source ran out of bytes before the requested amount was available
    #[error("source underrun: requested {requested} bytes")]
    Underrun {
        /// Number of bytes the read asked for
        requested: usize,
    },

    /// CompactSize used a wider form than its value needs
    #[error("non-canonical compact size: marker {marker:#x} carried {value}")]
    NonCanonicalCompactSize {
        /// Marker byte (0xfd, 0xfe or 0xff)
        marker: u8,
        /// Payload that should have used a shorter form
        value: u64,
    },

    /// Declared or requested size is above the fixed ceiling
    #[error("size too large: {size} (max {max})")]
    SizeTooLarge {
        /// Offending size
        size: u64,
        /// Ceiling that was exceeded
        max: u64,
    },

    /// VarInt value does not fit in the target integer
    #[error("varint overflows a {bits}-bit integer")]
    VarIntOverflow {
        /// Width of the target integer type
        bits: u32,
    },

    /// VarInt did not terminate within the group bound
    #[error("malformed varint: no terminator within {groups} groups")]
    VarIntMalformed {
        /// Maximum number of groups for the target width
        groups: u32,
    },

    /// Length-limited field declared more bytes than its bound
    #[error("length limit exceeded: {size} bytes (limit {limit})")]
    LengthLimitExceeded {
        /// Declared length
        size: u64,
        /// Bound for this field
        limit: usize,
    },

    /// Invalid UTF-8
    #[error("invalid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the error means the input simply ended early.
    ///
    /// Callers reading from a growing buffer can use this to wait for more
    /// bytes instead of rejecting the input.
    #[must_use]
    pub const fn is_underrun(&self) -> bool {
        matches!(self, Self::Underrun { .. })
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
