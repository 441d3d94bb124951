//! Encoding of archive records, usable as initial-condition files.

use std::io::Write;

use log::debug;
use num_complex::Complex;

use crate::error::{SvbinError, SvbinResult};
use crate::framing::{FrameWriter, encoded_len};
use crate::options::CodecOptions;
use crate::types::{ArchiveRecord, DEFAULT_STEP_HINT, check_rank, element_count};

/// Stateless record encoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchiveWriter {
    options: CodecOptions,
}

impl ArchiveWriter {
    pub fn new(options: CodecOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    /// Encode `elements` with `shape` and `time` into a fresh buffer.
    pub fn encode(
        &self,
        shape: &[usize],
        elements: &[Complex<f64>],
        time: f64,
    ) -> SvbinResult<Vec<u8>> {
        let dims = self.validate(shape, elements)?;
        let mut buf = Vec::with_capacity(encoded_len(shape).unwrap_or(0));
        self.emit(&mut buf, &dims, elements, time)?;
        Ok(buf)
    }

    /// Re-encode a record. Its step hint is replaced by the placeholder.
    pub fn encode_record(&self, record: &ArchiveRecord) -> SvbinResult<Vec<u8>> {
        self.encode(record.shape(), record.elements(), record.time())
    }

    /// Encode straight into `sink`, returning the number of bytes written.
    ///
    /// Input is validated before anything is written, so a rejected array
    /// leaves the sink untouched.
    pub fn write_to<W: Write>(
        &self,
        sink: &mut W,
        shape: &[usize],
        elements: &[Complex<f64>],
        time: f64,
    ) -> SvbinResult<usize> {
        let dims = self.validate(shape, elements)?;
        self.emit(sink, &dims, elements, time)
    }

    fn validate(&self, shape: &[usize], elements: &[Complex<f64>]) -> SvbinResult<Vec<i32>> {
        check_rank(shape.len() as i64, self.options.max_rank())?;
        let dims = shape
            .iter()
            .enumerate()
            .map(|(axis, &value)| {
                i32::try_from(value).map_err(|_| SvbinError::DimensionOverflow { axis, value })
            })
            .collect::<SvbinResult<Vec<_>>>()?;
        match element_count(shape) {
            Some(expected) if expected == elements.len() => Ok(dims),
            expected => Err(SvbinError::ElementCountMismatch {
                expected: expected.unwrap_or(usize::MAX),
                found: elements.len(),
            }),
        }
    }

    fn emit<W: Write>(
        &self,
        sink: W,
        dims: &[i32],
        elements: &[Complex<f64>],
        time: f64,
    ) -> SvbinResult<usize> {
        let mut frames = FrameWriter::new(sink, self.options.endian);
        frames.write_i32(dims.len() as i32)?;
        for &d in dims {
            frames.write_i32(d)?;
        }
        // Shape again, as the array's own encoding carries it.
        for &d in dims {
            frames.write_i32(d)?;
        }
        for &z in elements {
            frames.write_complex(z)?;
        }
        frames.write_f64(time)?;
        frames.write_f64(DEFAULT_STEP_HINT)?;

        debug!(
            "encoded rank-{} record {dims:?} at t={time} ({} bytes)",
            dims.len(),
            frames.written()
        );
        Ok(frames.written())
    }
}

/// Encode one record with default options.
pub fn encode(shape: &[usize], elements: &[Complex<f64>], time: f64) -> SvbinResult<Vec<u8>> {
    ArchiveWriter::default().encode(shape, elements, time)
}
