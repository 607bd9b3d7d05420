//! The serialization capability every wire type implements.

use crate::stream::{ReadStream, WriteStream};
use crate::Result;

/// Writes `self` in its canonical wire format.
///
/// Container impls in this crate recurse through this trait, so a type only
/// has to describe its own fields.
pub trait Serializable {
    /// Write `self` into `s`.
    fn serialize<S: WriteStream + ?Sized>(&self, s: &mut S) -> Result<()>;

    /// Write `items` back to back with no length prefix.
    ///
    /// [`FlatData`] types override this with a single blob write.
    fn serialize_slice<S: WriteStream + ?Sized>(items: &[Self], s: &mut S) -> Result<()>
    where
        Self: Sized,
    {
        for item in items {
            item.serialize(s)?;
        }
        Ok(())
    }
}

/// Reconstructs a value from its canonical wire format.
pub trait Deserializable: Sized {
    /// Read one value from `s`.
    fn deserialize<R: ReadStream + ?Sized>(s: &mut R) -> Result<Self>;

    /// Append `count` values read from `s` to `dest`.
    ///
    /// On error `dest` may hold some of the new values; the chunked sequence
    /// reader truncates them away. [`FlatData`] types override this with a
    /// single blob read.
    fn deserialize_run<R: ReadStream + ?Sized>(
        s: &mut R,
        dest: &mut Vec<Self>,
        count: usize,
    ) -> Result<()> {
        for _ in 0..count {
            dest.push(Self::deserialize(s)?);
        }
        Ok(())
    }
}

/// Types whose wire encoding is byte-for-byte their in-memory representation.
///
/// Sequences of flat values are copied as one blob instead of element by
/// element, and the [`Flat`](crate::Flat) view can move them with no length
/// prefix.
pub trait FlatData: Copy {
    /// All-zero value used to size a destination before it is filled.
    const ZEROED: Self;

    /// View `items` as their wire bytes.
    fn as_wire_bytes(items: &[Self]) -> &[u8];

    /// Fill `dest` completely from `s`.
    fn read_into<R: ReadStream + ?Sized>(s: &mut R, dest: &mut [Self]) -> Result<()>;

    /// Append `count` values read from `s` to `dest`, leaving `dest`
    /// unchanged on error.
    fn read_flat<R: ReadStream + ?Sized>(
        s: &mut R,
        dest: &mut Vec<Self>,
        count: usize,
    ) -> Result<()> {
        let start = dest.len();
        dest.resize(start + count, Self::ZEROED);
        if let Err(err) = Self::read_into(s, &mut dest[start..]) {
            dest.truncate(start);
            return Err(err);
        }
        Ok(())
    }
}

impl FlatData for u8 {
    const ZEROED: Self = 0;

    #[inline]
    fn as_wire_bytes(items: &[Self]) -> &[u8] {
        items
    }

    #[inline]
    fn read_into<R: ReadStream + ?Sized>(s: &mut R, dest: &mut [Self]) -> Result<()> {
        s.read(dest)
    }
}

impl<const N: usize> FlatData for [u8; N] {
    const ZEROED: Self = [0; N];

    #[inline]
    fn as_wire_bytes(items: &[Self]) -> &[u8] {
        items.as_flattened()
    }

    #[inline]
    fn read_into<R: ReadStream + ?Sized>(s: &mut R, dest: &mut [Self]) -> Result<()> {
        s.read(dest.as_flattened_mut())
    }
}
