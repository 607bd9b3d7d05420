//! Fixed-width little-endian integers, floats and booleans.

use super::{Deserializable, FlatData, Serializable};
use crate::stream::{ReadStream, WriteStream};
use crate::Result;

/// Write one byte.
#[inline]
pub fn write_u8<S: WriteStream + ?Sized>(s: &mut S, value: u8) -> Result<()> {
    s.write(&[value])
}

/// Write a little-endian `u16`.
#[inline]
pub fn write_u16<S: WriteStream + ?Sized>(s: &mut S, value: u16) -> Result<()> {
    s.write(&value.to_le_bytes())
}

/// Write a little-endian `u32`.
#[inline]
pub fn write_u32<S: WriteStream + ?Sized>(s: &mut S, value: u32) -> Result<()> {
    s.write(&value.to_le_bytes())
}

/// Write a little-endian `u64`.
#[inline]
pub fn write_u64<S: WriteStream + ?Sized>(s: &mut S, value: u64) -> Result<()> {
    s.write(&value.to_le_bytes())
}

/// Read one byte.
#[inline]
pub fn read_u8<R: ReadStream + ?Sized>(s: &mut R) -> Result<u8> {
    let mut buf = [0u8; 1];
    s.read(&mut buf)?;
    Ok(buf[0])
}

/// Read a little-endian `u16`.
#[inline]
pub fn read_u16<R: ReadStream + ?Sized>(s: &mut R) -> Result<u16> {
    let mut buf = [0u8; 2];
    s.read(&mut buf)?;
    Ok(u16::from_le_bytes(buf))
}

/// Read a little-endian `u32`.
#[inline]
pub fn read_u32<R: ReadStream + ?Sized>(s: &mut R) -> Result<u32> {
    let mut buf = [0u8; 4];
    s.read(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

/// Read a little-endian `u64`.
#[inline]
pub fn read_u64<R: ReadStream + ?Sized>(s: &mut R) -> Result<u64> {
    let mut buf = [0u8; 8];
    s.read(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

macro_rules! impl_fixed_width {
    ($($ty:ty),* $(,)?) => {$(
        impl Serializable for $ty {
            #[inline]
            fn serialize<S: WriteStream + ?Sized>(&self, s: &mut S) -> Result<()> {
                s.write(&self.to_le_bytes())
            }
        }

        impl Deserializable for $ty {
            #[inline]
            fn deserialize<R: ReadStream + ?Sized>(s: &mut R) -> Result<Self> {
                let mut buf = [0u8; std::mem::size_of::<$ty>()];
                s.read(&mut buf)?;
                Ok(<$ty>::from_le_bytes(buf))
            }
        }
    )*};
}

impl_fixed_width!(i8, u16, i16, u32, i32, u64, i64);

// Bytes are the one flat primitive: sequences of them move as a single blob.
impl Serializable for u8 {
    #[inline]
    fn serialize<S: WriteStream + ?Sized>(&self, s: &mut S) -> Result<()> {
        write_u8(s, *self)
    }

    fn serialize_slice<S: WriteStream + ?Sized>(items: &[Self], s: &mut S) -> Result<()> {
        s.write(<u8 as FlatData>::as_wire_bytes(items))
    }
}

impl Deserializable for u8 {
    #[inline]
    fn deserialize<R: ReadStream + ?Sized>(s: &mut R) -> Result<Self> {
        read_u8(s)
    }

    fn deserialize_run<R: ReadStream + ?Sized>(
        s: &mut R,
        dest: &mut Vec<Self>,
        count: usize,
    ) -> Result<()> {
        <u8 as FlatData>::read_flat(s, dest, count)
    }
}

// Floats travel as their IEEE-754 bit patterns, so NaN payloads survive.
impl Serializable for f32 {
    #[inline]
    fn serialize<S: WriteStream + ?Sized>(&self, s: &mut S) -> Result<()> {
        write_u32(s, self.to_bits())
    }
}

impl Deserializable for f32 {
    #[inline]
    fn deserialize<R: ReadStream + ?Sized>(s: &mut R) -> Result<Self> {
        Ok(f32::from_bits(read_u32(s)?))
    }
}

impl Serializable for f64 {
    #[inline]
    fn serialize<S: WriteStream + ?Sized>(&self, s: &mut S) -> Result<()> {
        write_u64(s, self.to_bits())
    }
}

impl Deserializable for f64 {
    #[inline]
    fn deserialize<R: ReadStream + ?Sized>(s: &mut R) -> Result<Self> {
        Ok(f64::from_bits(read_u64(s)?))
    }
}

impl Serializable for bool {
    #[inline]
    fn serialize<S: WriteStream + ?Sized>(&self, s: &mut S) -> Result<()> {
        write_u8(s, u8::from(*self))
    }
}

impl Deserializable for bool {
    /// Any non-zero byte reads as `true`.
    #[inline]
    fn deserialize<R: ReadStream + ?Sized>(s: &mut R) -> Result<Self> {
        Ok(read_u8(s)? != 0)
    }
}
