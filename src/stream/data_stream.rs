//! In-memory serialization buffer with a read cursor.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use super::{ReadStream, WriteStream};
use crate::{Deserializable, Error, Result, Serializable};

/// Growable byte buffer that can be written at the back and read from the
/// front, tagged with a serialization type and version.
///
/// Reads consume bytes from the front; a read that would run past the end
/// fails with [`Error::Underrun`] and leaves the buffer untouched.
#[derive(Debug, Clone, Default)]
pub struct DataStream {
    buf: BytesMut,
    ser_type: i32,
    version: i32,
}

impl DataStream {
    /// Create an empty stream.
    #[must_use]
    pub fn new(ser_type: i32, version: i32) -> Self {
        Self {
            buf: BytesMut::new(),
            ser_type,
            version,
        }
    }

    /// Create a stream whose unread contents are `data`.
    #[must_use]
    pub fn from_bytes(data: &[u8], ser_type: i32, version: i32) -> Self {
        Self {
            buf: BytesMut::from(data),
            ser_type,
            version,
        }
    }

    /// Serialize `value` onto the back of the stream.
    pub fn put<T: Serializable + ?Sized>(&mut self, value: &T) -> Result<&mut Self> {
        value.serialize(&mut *self)?;
        Ok(self)
    }

    /// Deserialize a value from the front of the stream.
    pub fn get<T: Deserializable>(&mut self) -> Result<T> {
        T::deserialize(self)
    }

    /// Number of unread bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether every byte has been read.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Unread bytes.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Drop all unread bytes.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Skip `n` unread bytes.
    pub fn ignore(&mut self, n: usize) -> Result<()> {
        if self.buf.len() < n {
            return Err(Error::Underrun { requested: n });
        }
        self.buf.advance(n);
        Ok(())
    }

    /// Freeze the unread bytes into an immutable buffer.
    #[must_use]
    pub fn freeze(self) -> Bytes {
        self.buf.freeze()
    }

    /// Change the version tag for subsequent reads and writes.
    pub fn set_version(&mut self, version: i32) {
        self.version = version;
    }

    /// Change the serialization type for subsequent reads and writes.
    pub fn set_ser_type(&mut self, ser_type: i32) {
        self.ser_type = ser_type;
    }
}

impl WriteStream for DataStream {
    #[inline]
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.buf.put_slice(bytes);
        Ok(())
    }

    fn ser_type(&self) -> i32 {
        self.ser_type
    }

    fn version(&self) -> i32 {
        self.version
    }
}

impl ReadStream for DataStream {
    #[inline]
    fn read(&mut self, out: &mut [u8]) -> Result<()> {
        if self.buf.len() < out.len() {
            return Err(Error::Underrun {
                requested: out.len(),
            });
        }
        self.buf.copy_to_slice(out);
        Ok(())
    }

    fn ser_type(&self) -> i32 {
        self.ser_type
    }

    fn version(&self) -> i32 {
        self.version
    }
}

impl AsRef<[u8]> for DataStream {
    fn as_ref(&self) -> &[u8] {
        &self.buf
    }
}
