//! Byte sinks and sources
//!
//! The codec never owns storage. Every serialize call writes into a
//! [`WriteStream`] and every deserialize call pulls from a [`ReadStream`], both
//! supplied by the caller.
//!
//! Streams also carry an opaque serialization type and version. The engine
//! passes them through untouched so that collaborator types can vary their
//! own layout (for example, skipping fields when hashing).

mod data_stream;
mod io;
mod size;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::{Error, Result};

pub use data_stream::DataStream;
pub use io::{IoSink, IoSource};
pub use size::{SizeComputer, serialized_size, serialized_size_with};

/// Serialization for network transmission
pub const SER_NETWORK: i32 = 1 << 0;
/// Serialization for disk storage
pub const SER_DISK: i32 = 1 << 1;
/// Serialization for hashing
pub const SER_GETHASH: i32 = 1 << 2;

/// Destination for serialized bytes.
pub trait WriteStream {
    /// Absorb all of `bytes`.
    fn write(&mut self, bytes: &[u8]) -> Result<()>;

    /// Serialization type flags (`SER_*`) this sink was opened with.
    fn ser_type(&self) -> i32 {
        0
    }

    /// Opaque version tag this sink was opened with.
    fn version(&self) -> i32 {
        0
    }
}

/// Source of serialized bytes.
pub trait ReadStream {
    /// Fill `buf` completely or fail with [`Error::Underrun`].
    fn read(&mut self, buf: &mut [u8]) -> Result<()>;

    /// Serialization type flags (`SER_*`) this source was opened with.
    fn ser_type(&self) -> i32 {
        0
    }

    /// Opaque version tag this source was opened with.
    fn version(&self) -> i32 {
        0
    }
}

impl<W: WriteStream + ?Sized> WriteStream for &mut W {
    #[inline]
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).write(bytes)
    }

    fn ser_type(&self) -> i32 {
        (**self).ser_type()
    }

    fn version(&self) -> i32 {
        (**self).version()
    }
}

impl<R: ReadStream + ?Sized> ReadStream for &mut R {
    #[inline]
    fn read(&mut self, buf: &mut [u8]) -> Result<()> {
        (**self).read(buf)
    }

    fn ser_type(&self) -> i32 {
        (**self).ser_type()
    }

    fn version(&self) -> i32 {
        (**self).version()
    }
}

impl WriteStream for Vec<u8> {
    #[inline]
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.extend_from_slice(bytes);
        Ok(())
    }
}

impl WriteStream for BytesMut {
    #[inline]
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.put_slice(bytes);
        Ok(())
    }
}

/// Reading advances the slice past the consumed bytes.
impl ReadStream for &[u8] {
    #[inline]
    fn read(&mut self, buf: &mut [u8]) -> Result<()> {
        if self.len() < buf.len() {
            return Err(Error::Underrun {
                requested: buf.len(),
            });
        }
        let (head, tail) = self.split_at(buf.len());
        buf.copy_from_slice(head);
        *self = tail;
        Ok(())
    }
}

impl ReadStream for Bytes {
    #[inline]
    fn read(&mut self, buf: &mut [u8]) -> Result<()> {
        if self.remaining() < buf.len() {
            return Err(Error::Underrun {
                requested: buf.len(),
            });
        }
        self.copy_to_slice(buf);
        Ok(())
    }
}
