//! CompactSize length prefixes
//!
//! ```text
//! value <  253          1 byte
//! value <= 0xffff       0xfd + u16 (3 bytes)
//! value <= 0xffff_ffff  0xfe + u32 (5 bytes)
//! otherwise             0xff + u64 (9 bytes)
//! ```
//!
//! Decoding only accepts the shortest form of each value, and no value above
//! [`MAX_SIZE`] is ever written or accepted.

use super::MAX_SIZE;
use super::primitive::{read_u8, read_u16, read_u32, read_u64};
use crate::stream::{ReadStream, WriteStream};
use crate::{Error, Result};

const MARKER_U16: u8 = 0xfd;
const MARKER_U32: u8 = 0xfe;
const MARKER_U64: u8 = 0xff;

/// Number of bytes the CompactSize form of `size` occupies.
#[must_use]
pub const fn compact_size_len(size: u64) -> usize {
    if size < MARKER_U16 as u64 {
        1
    } else if size <= u16::MAX as u64 {
        3
    } else if size <= u32::MAX as u64 {
        5
    } else {
        9
    }
}

/// Write `size` as a CompactSize.
///
/// # Errors
///
/// [`Error::SizeTooLarge`] if `size` exceeds [`MAX_SIZE`]; nothing is written.
pub fn write_compact_size<S: WriteStream + ?Sized>(s: &mut S, size: u64) -> Result<()> {
    if size > MAX_SIZE {
        return Err(Error::SizeTooLarge {
            size,
            max: MAX_SIZE,
        });
    }

    let mut buf = [0u8; 9];
    let len = compact_size_len(size);
    match len {
        1 => buf[0] = size as u8,
        3 => {
            buf[0] = MARKER_U16;
            buf[1..3].copy_from_slice(&(size as u16).to_le_bytes());
        }
        5 => {
            buf[0] = MARKER_U32;
            buf[1..5].copy_from_slice(&(size as u32).to_le_bytes());
        }
        _ => {
            buf[0] = MARKER_U64;
            buf[1..9].copy_from_slice(&size.to_le_bytes());
        }
    }

    debug_assert_eq!(len, compact_size_len(size));
    s.write(&buf[..len])
}

/// Read a CompactSize.
///
/// # Errors
///
/// - [`Error::Underrun`] if the source ends inside the prefix
/// - [`Error::NonCanonicalCompactSize`] if a wider form than necessary was used
/// - [`Error::SizeTooLarge`] if the value exceeds [`MAX_SIZE`]
pub fn read_compact_size<R: ReadStream + ?Sized>(s: &mut R) -> Result<u64> {
    let marker = read_u8(s)?;
    let (size, minimum) = match marker {
        MARKER_U16 => (u64::from(read_u16(s)?), u64::from(MARKER_U16)),
        MARKER_U32 => (u64::from(read_u32(s)?), 0x1_0000),
        MARKER_U64 => (read_u64(s)?, 0x1_0000_0000),
        small => return Ok(u64::from(small)),
    };

    if size < minimum {
        return Err(Error::NonCanonicalCompactSize {
            marker,
            value: size,
        });
    }
    if size > MAX_SIZE {
        return Err(Error::SizeTooLarge {
            size,
            max: MAX_SIZE,
        });
    }

    Ok(size)
}

/// Read a CompactSize as an in-memory length.
pub(crate) fn read_compact_len<R: ReadStream + ?Sized>(s: &mut R) -> Result<usize> {
    let size = read_compact_size(s)?;
    usize::try_from(size).map_err(|_| Error::SizeTooLarge {
        size,
        max: usize::MAX as u64,
    })
}

/// Write an in-memory length as a CompactSize.
pub(crate) fn write_compact_len<S: WriteStream + ?Sized>(s: &mut S, len: usize) -> Result<()> {
    write_compact_size(s, len as u64)
}
