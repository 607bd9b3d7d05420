//! svwire - Bitcoin SV binary wire-format serialization
//!
//! Deterministic encoding of protocol values (transactions, blocks, network
//! messages) into the byte layout the network and on-disk formats use, and the
//! hardened decoding back out of it.
//!
//! # Quick Start
//!
//! ```rust
//! use svwire::{VarInt, deserialize, impl_serializable, serialize, serialized_size};
//!
//! #[derive(Debug, PartialEq)]
//! struct TxOut {
//!     value: i64,
//!     script: Vec<u8>,
//! }
//!
//! impl_serializable!(TxOut { value, script });
//!
//! let out = TxOut { value: 50_000, script: vec![0x51] };
//! let bytes = serialize(&out)?;
//! assert_eq!(bytes.len(), serialized_size(&out)?);
//! assert_eq!(deserialize::<TxOut>(&bytes)?, out);
//!
//! assert_eq!(serialize(&VarInt(&300u32))?, [0x81, 0x2c]);
//! # Ok::<(), svwire::Error>(())
//! ```
//!
//! # Features
//!
//! - **Canonical length prefixes** - non-minimal CompactSize forms are rejected
//! - **Bounded decoding** - declared lengths never drive allocation up front
//! - **Size computation** - exact encoded size without producing bytes
//! - **Stream tags** - serialization type and version travel with every stream
//!
//! # Layout
//!
//! - [`encoding`] holds the codecs and the [`Serializable`] / [`Deserializable`]
//!   traits types implement.
//! - [`stream`] holds the sinks and sources they run against.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::cast_possible_truncation)]

pub mod encoding;
pub mod stream;

pub use encoding::{
    CHUNK_GROWTH_RATE, ChunkPolicy, CompactSize, Deserializable, Error, Flat, FlatData, Limited,
    MAX_SIZE, Result, STARTING_CHUNK_SIZE, Serializable, VarInt,
};
pub use stream::{
    DataStream, ReadStream, SER_DISK, SER_GETHASH, SER_NETWORK, SizeComputer, WriteStream,
    serialized_size, serialized_size_with,
};

/// svwire crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Encode `value` into a fresh byte vector.
pub fn serialize<T: Serializable + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(serialized_size(value)?);
    value.serialize(&mut out)?;
    Ok(out)
}

/// Decode a `T` from the front of `bytes`.
///
/// Bytes after the decoded value are ignored; use [`deserialize_partial`] to
/// learn how many were consumed.
pub fn deserialize<T: Deserializable>(bytes: &[u8]) -> Result<T> {
    deserialize_partial(bytes).map(|(value, _)| value)
}

/// Decode a `T` from the front of `bytes`, returning it with the number of
/// bytes it occupied.
pub fn deserialize_partial<T: Deserializable>(bytes: &[u8]) -> Result<(T, usize)> {
    let mut source = bytes;
    let value = T::deserialize(&mut source)?;
    Ok((value, bytes.len() - source.len()))
}
