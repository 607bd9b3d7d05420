//! Views that pick an encoding for a single field.
//!
//! Each view borrows the caller's value for one call: construct it over `&T`
//! to serialize, or over `&mut T` and call `read_from` to deserialize in
//! place. The value itself is never copied into the view.
//!
//! ```
//! use svwire::{CompactSize, VarInt};
//!
//! let mut out = Vec::new();
//! svwire::Serializable::serialize(&VarInt(&300u32), &mut out).unwrap();
//! svwire::Serializable::serialize(&CompactSize(&300u64), &mut out).unwrap();
//! assert_eq!(out, [0x81, 0x2c, 0xfd, 0x2c, 0x01]);
//!
//! let mut source: &[u8] = &out;
//! let (mut a, mut b) = (0u32, 0u64);
//! VarInt(&mut a).read_from(&mut source).unwrap();
//! CompactSize(&mut b).read_from(&mut source).unwrap();
//! assert_eq!((a, b), (300, 300));
//! ```

use super::compact_size::{read_compact_size, write_compact_len, write_compact_size};
use super::varint::{VarIntInteger, read_varint, write_varint};
use super::FlatData;
use super::Serializable;
use crate::stream::{ReadStream, WriteStream};
use crate::{Error, Result};

/// Carry an integer as a [VarInt](super::varint).
#[derive(Debug)]
pub struct VarInt<T>(pub T);

impl<I: VarIntInteger> Serializable for VarInt<&I> {
    fn serialize<S: WriteStream + ?Sized>(&self, s: &mut S) -> Result<()> {
        write_varint(s, *self.0)
    }
}

impl<I: VarIntInteger> Serializable for VarInt<&mut I> {
    fn serialize<S: WriteStream + ?Sized>(&self, s: &mut S) -> Result<()> {
        write_varint(s, *self.0)
    }
}

impl<I: VarIntInteger> VarInt<&mut I> {
    /// Decode into the borrowed integer.
    pub fn read_from<R: ReadStream + ?Sized>(self, s: &mut R) -> Result<()> {
        *self.0 = read_varint(s)?;
        Ok(())
    }
}

/// Carry a `u64` as a [CompactSize](super::compact_size).
#[derive(Debug)]
pub struct CompactSize<T>(pub T);

impl Serializable for CompactSize<&u64> {
    fn serialize<S: WriteStream + ?Sized>(&self, s: &mut S) -> Result<()> {
        write_compact_size(s, *self.0)
    }
}

impl Serializable for CompactSize<&mut u64> {
    fn serialize<S: WriteStream + ?Sized>(&self, s: &mut S) -> Result<()> {
        write_compact_size(s, *self.0)
    }
}

impl CompactSize<&mut u64> {
    /// Decode into the borrowed integer.
    pub fn read_from<R: ReadStream + ?Sized>(self, s: &mut R) -> Result<()> {
        *self.0 = read_compact_size(s)?;
        Ok(())
    }
}

/// Carry a contiguous range of flat values as raw bytes with no prefix.
///
/// The length is implied by the range itself; decoding fills the borrowed
/// range exactly.
#[derive(Debug)]
pub struct Flat<T>(pub T);

impl<E: FlatData> Serializable for Flat<&[E]> {
    fn serialize<S: WriteStream + ?Sized>(&self, s: &mut S) -> Result<()> {
        s.write(E::as_wire_bytes(self.0))
    }
}

impl<E: FlatData> Serializable for Flat<&mut [E]> {
    fn serialize<S: WriteStream + ?Sized>(&self, s: &mut S) -> Result<()> {
        s.write(E::as_wire_bytes(self.0))
    }
}

impl<E: FlatData> Flat<&mut [E]> {
    /// Fill the borrowed range from `s`.
    pub fn read_from<R: ReadStream + ?Sized>(self, s: &mut R) -> Result<()> {
        E::read_into(s, self.0)
    }
}

/// Byte containers usable behind a [`Limited`] view.
pub trait LimitedBytes {
    /// Current contents.
    fn bytes(&self) -> &[u8];

    /// Replace the contents with freshly decoded bytes.
    fn replace(&mut self, bytes: Vec<u8>) -> Result<()>;
}

impl LimitedBytes for Vec<u8> {
    fn bytes(&self) -> &[u8] {
        self
    }

    fn replace(&mut self, bytes: Vec<u8>) -> Result<()> {
        *self = bytes;
        Ok(())
    }
}

impl LimitedBytes for String {
    fn bytes(&self) -> &[u8] {
        self.as_bytes()
    }

    fn replace(&mut self, bytes: Vec<u8>) -> Result<()> {
        *self = String::from_utf8(bytes)?;
        Ok(())
    }
}

/// Length-prefixed bytes whose decoded length may not exceed `N`.
///
/// The wire form is identical to a plain byte vector or string. Decoding checks
/// the declared length against `N` before reading or allocating anything for
/// the payload.
#[derive(Debug)]
pub struct Limited<const N: usize, T>(pub T);

impl<const N: usize, B: LimitedBytes + ?Sized> Serializable for Limited<N, &B> {
    fn serialize<S: WriteStream + ?Sized>(&self, s: &mut S) -> Result<()> {
        write_limited(s, self.0.bytes())
    }
}

impl<const N: usize, B: LimitedBytes + ?Sized> Serializable for Limited<N, &mut B> {
    fn serialize<S: WriteStream + ?Sized>(&self, s: &mut S) -> Result<()> {
        write_limited(s, self.0.bytes())
    }
}

impl<const N: usize, B: LimitedBytes + ?Sized> Limited<N, &mut B> {
    /// Decode into the borrowed container.
    ///
    /// # Errors
    ///
    /// [`Error::LengthLimitExceeded`] if the declared length is above `N`; the
    /// payload is left unread.
    pub fn read_from<R: ReadStream + ?Sized>(self, s: &mut R) -> Result<()> {
        let size = read_compact_size(s)?;
        if size > N as u64 {
            return Err(Error::LengthLimitExceeded { size, limit: N });
        }

        let mut bytes = vec![0u8; size as usize];
        s.read(&mut bytes)?;
        self.0.replace(bytes)
    }
}

fn write_limited<S: WriteStream + ?Sized>(s: &mut S, bytes: &[u8]) -> Result<()> {
    write_compact_len(s, bytes.len())?;
    s.write(bytes)
}
