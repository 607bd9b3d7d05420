//! Size computation without materializing the encoding.

use super::WriteStream;
use crate::{Result, Serializable};

/// Sink that only counts the bytes written to it.
///
/// Running a value's normal serialize logic against a `SizeComputer` yields
/// exactly the length the real encoding would have.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SizeComputer {
    size: usize,
    ser_type: i32,
    version: i32,
}

impl SizeComputer {
    /// Create a counter at zero.
    #[must_use]
    pub const fn new(ser_type: i32, version: i32) -> Self {
        Self {
            size: 0,
            ser_type,
            version,
        }
    }

    /// Pretend `n` bytes were written without supplying them.
    pub fn seek(&mut self, n: usize) {
        self.size = self.size.saturating_add(n);
    }

    /// Bytes counted so far.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }
}

impl WriteStream for SizeComputer {
    #[inline]
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.size = self.size.saturating_add(bytes.len());
        Ok(())
    }

    fn ser_type(&self) -> i32 {
        self.ser_type
    }

    fn version(&self) -> i32 {
        self.version
    }
}

/// Length of `value`'s serialization.
///
/// Fails exactly when serializing `value` would fail.
pub fn serialized_size<T: Serializable + ?Sized>(value: &T) -> Result<usize> {
    serialized_size_with(value, 0, 0)
}

/// Length of `value`'s serialization under a given type and version.
pub fn serialized_size_with<T: Serializable + ?Sized>(
    value: &T,
    ser_type: i32,
    version: i32,
) -> Result<usize> {
    let mut computer = SizeComputer::new(ser_type, version);
    value.serialize(&mut computer)?;
    Ok(computer.size())
}
