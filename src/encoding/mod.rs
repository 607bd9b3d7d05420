//! svwire encoding core
//!
//! Wire formats for primitives, length prefixes, sequences and containers,
//! plus the views that let a single field opt into a different encoding.

mod collections;
mod compact_size;
mod error;
mod macros;
mod primitive;
mod sequence;
mod traits;
mod varint;
mod wrappers;

pub use compact_size::{compact_size_len, read_compact_size, write_compact_size};
pub use error::{Error, Result};
pub use primitive::{read_u8, read_u16, read_u32, read_u64, write_u8, write_u16, write_u32, write_u64};
pub use sequence::{ChunkPolicy, read_chunked, read_sequence_into, write_sequence};
pub use traits::{Deserializable, FlatData, Serializable};
pub use varint::{VarIntInteger, read_varint, varint_len, write_varint};
pub use wrappers::{CompactSize, Flat, Limited, LimitedBytes, VarInt};

/// Largest length a CompactSize may carry, on either side of the wire
pub const MAX_SIZE: u64 = 0xffff_ffff;

/// Byte budget of the first allocation when decoding a sequence (16 MB)
pub const STARTING_CHUNK_SIZE: usize = 16_000_000;

/// Factor applied to the byte budget after each completed chunk
pub const CHUNK_GROWTH_RATE: usize = 3;
