//! Fixed-width primitives shared by the reader and the writer.
//!
//! Every integer in a record is a 4-byte signed int and every real a
//! 8-byte IEEE-754 double, with no padding between fields.

use std::io::{ErrorKind, Read, Write};

use byteorder::{BigEndian, ByteOrder, LittleEndian, WriteBytesExt};
use num_complex::Complex;

use crate::error::{SvbinError, SvbinResult};
use crate::types::{Endian, element_count};

pub const INT_BYTES: usize = 4;
pub const DOUBLE_BYTES: usize = 8;
pub const COMPLEX_BYTES: usize = 2 * DOUBLE_BYTES;

/// Encoded size of a record with `shape`, or `None` on overflow.
pub fn encoded_len(shape: &[usize]) -> Option<usize> {
    let header = (1 + 2 * shape.len()) * INT_BYTES;
    let payload = element_count(shape)?.checked_mul(COMPLEX_BYTES)?;
    header.checked_add(payload)?.checked_add(2 * DOUBLE_BYTES)
}

/// Upper bound on elements preallocated when the source length is unknown.
const STREAM_PREALLOC: usize = 1 << 16;

// ---------------------------------------------------------------------------
// FrameReader
// ---------------------------------------------------------------------------

/// Reads framed primitives while tracking how many bytes were consumed.
pub struct FrameReader<R> {
    inner: R,
    endian: Endian,
    consumed: usize,
    limit: Option<usize>,
}

impl<'a> FrameReader<&'a [u8]> {
    /// Reader over an in-memory buffer; its length is known up front.
    pub fn from_slice(data: &'a [u8], endian: Endian) -> Self {
        Self {
            inner: data,
            endian: endian.resolve(),
            consumed: 0,
            limit: Some(data.len()),
        }
    }
}

impl<R: Read> FrameReader<R> {
    pub fn new(inner: R, endian: Endian) -> Self {
        Self {
            inner,
            endian: endian.resolve(),
            consumed: 0,
            limit: None,
        }
    }

    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Bytes left in the source, when that is known.
    pub fn remaining(&self) -> Option<usize> {
        self.limit.map(|l| l - self.consumed)
    }

    /// Fail early if the source is known to hold fewer than `needed` bytes.
    pub fn ensure_available(&self, needed: usize, field: &'static str) -> SvbinResult<()> {
        match self.remaining() {
            Some(available) if available < needed => Err(SvbinError::TruncatedStream {
                field,
                needed,
                available,
            }),
            _ => Ok(()),
        }
    }

    /// Fill `buf` completely, returning the number of bytes obtained before EOF.
    fn fill(&mut self, buf: &mut [u8]) -> SvbinResult<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(SvbinError::Io(e)),
            }
        }
        self.consumed += filled;
        Ok(filled)
    }

    fn read_exact_field(&mut self, buf: &mut [u8], field: &'static str) -> SvbinResult<()> {
        let got = self.fill(buf)?;
        if got < buf.len() {
            return Err(SvbinError::TruncatedStream {
                field,
                needed: buf.len(),
                available: got,
            });
        }
        Ok(())
    }

    fn decode_i32(&self, buf: &[u8]) -> i32 {
        match self.endian {
            Endian::Big => BigEndian::read_i32(buf),
            _ => LittleEndian::read_i32(buf),
        }
    }

    fn decode_f64(&self, buf: &[u8]) -> f64 {
        match self.endian {
            Endian::Big => BigEndian::read_f64(buf),
            _ => LittleEndian::read_f64(buf),
        }
    }

    pub fn read_i32(&mut self, field: &'static str) -> SvbinResult<i32> {
        let mut buf = [0u8; INT_BYTES];
        self.read_exact_field(&mut buf, field)?;
        Ok(self.decode_i32(&buf))
    }

    /// Like [`read_i32`](Self::read_i32), but a source that is already
    /// exhausted yields `Ok(None)`. A partially present int is still an error.
    pub fn read_i32_or_eof(&mut self, field: &'static str) -> SvbinResult<Option<i32>> {
        let mut buf = [0u8; INT_BYTES];
        match self.fill(&mut buf)? {
            0 => Ok(None),
            INT_BYTES => Ok(Some(self.decode_i32(&buf))),
            got => Err(SvbinError::TruncatedStream {
                field,
                needed: INT_BYTES,
                available: got,
            }),
        }
    }

    pub fn read_f64(&mut self, field: &'static str) -> SvbinResult<f64> {
        let mut buf = [0u8; DOUBLE_BYTES];
        self.read_exact_field(&mut buf, field)?;
        Ok(self.decode_f64(&buf))
    }

    /// Read `count` (re, im) pairs.
    pub fn read_complex_vec(
        &mut self,
        count: usize,
        field: &'static str,
    ) -> SvbinResult<Vec<Complex<f64>>> {
        let needed = count
            .checked_mul(COMPLEX_BYTES)
            .ok_or(SvbinError::TruncatedStream {
                field,
                needed: usize::MAX,
                available: self.remaining().unwrap_or(0),
            })?;
        self.ensure_available(needed, field)?;

        let capacity = if self.limit.is_some() {
            count
        } else {
            count.min(STREAM_PREALLOC)
        };
        let mut out = Vec::with_capacity(capacity);
        let mut buf = [0u8; COMPLEX_BYTES];
        for _ in 0..count {
            self.read_exact_field(&mut buf, field)?;
            let re = self.decode_f64(&buf[..DOUBLE_BYTES]);
            let im = self.decode_f64(&buf[DOUBLE_BYTES..]);
            out.push(Complex::new(re, im));
        }
        Ok(out)
    }
}

// ---------------------------------------------------------------------------
// FrameWriter
// ---------------------------------------------------------------------------

/// Writes framed primitives to any sink.
pub struct FrameWriter<W> {
    inner: W,
    endian: Endian,
    written: usize,
}

impl<W: Write> FrameWriter<W> {
    pub fn new(inner: W, endian: Endian) -> Self {
        Self {
            inner,
            endian: endian.resolve(),
            written: 0,
        }
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    pub fn write_i32(&mut self, v: i32) -> SvbinResult<()> {
        match self.endian {
            Endian::Big => self.inner.write_i32::<BigEndian>(v)?,
            _ => self.inner.write_i32::<LittleEndian>(v)?,
        }
        self.written += INT_BYTES;
        Ok(())
    }

    pub fn write_f64(&mut self, v: f64) -> SvbinResult<()> {
        match self.endian {
            Endian::Big => self.inner.write_f64::<BigEndian>(v)?,
            _ => self.inner.write_f64::<LittleEndian>(v)?,
        }
        self.written += DOUBLE_BYTES;
        Ok(())
    }

    pub fn write_complex(&mut self, v: Complex<f64>) -> SvbinResult<()> {
        self.write_f64(v.re)?;
        self.write_f64(v.im)
    }
}
