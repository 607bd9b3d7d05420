//! Adapters over `std::io` readers and writers.

use std::io::{self, Read, Write};

use super::{ReadStream, WriteStream};
use crate::{Error, Result};

/// [`ReadStream`] over any [`io::Read`].
///
/// An `UnexpectedEof` from the reader surfaces as [`Error::Underrun`]; every
/// other I/O failure is passed through as [`Error::Io`].
#[derive(Debug)]
pub struct IoSource<R> {
    inner: R,
    ser_type: i32,
    version: i32,
}

impl<R: Read> IoSource<R> {
    /// Wrap a reader.
    pub fn new(inner: R, ser_type: i32, version: i32) -> Self {
        Self {
            inner,
            ser_type,
            version,
        }
    }

    /// Borrow the wrapped reader.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Unwrap the reader.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> ReadStream for IoSource<R> {
    fn read(&mut self, buf: &mut [u8]) -> Result<()> {
        let requested = buf.len();
        self.inner.read_exact(buf).map_err(|err| {
            if err.kind() == io::ErrorKind::UnexpectedEof {
                Error::Underrun { requested }
            } else {
                Error::Io(err)
            }
        })
    }

    fn ser_type(&self) -> i32 {
        self.ser_type
    }

    fn version(&self) -> i32 {
        self.version
    }
}

/// [`WriteStream`] over any [`io::Write`].
#[derive(Debug)]
pub struct IoSink<W> {
    inner: W,
    ser_type: i32,
    version: i32,
}

impl<W: Write> IoSink<W> {
    /// Wrap a writer.
    pub fn new(inner: W, ser_type: i32, version: i32) -> Self {
        Self {
            inner,
            ser_type,
            version,
        }
    }

    /// Flush the wrapped writer.
    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }

    /// Borrow the wrapped writer.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Unwrap the writer.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> WriteStream for IoSink<W> {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.inner.write_all(bytes)?;
        Ok(())
    }

    fn ser_type(&self) -> i32 {
        self.ser_type
    }

    fn version(&self) -> i32 {
        self.version
    }
}
