//! Decoding of archive records.
//!
//! A record is laid out as
//!
//! ```text
//! rank | shape[rank] | shape[rank] (restated by the array) | (re, im)[product(shape)] | time | step_hint
//! ```
//!
//! with every int 4 bytes and every double 8 bytes in the configured byte
//! order. The rank is read first and bounds everything that follows, so the
//! decoder never backtracks.

use std::io::Read;

use log::{debug, trace};

use crate::error::{SvbinError, SvbinResult};
use crate::framing::{FrameReader, INT_BYTES};
use crate::options::CodecOptions;
use crate::types::{ArchiveRecord, check_rank, element_count};

/// Stateless record decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchiveReader {
    options: CodecOptions,
}

impl ArchiveReader {
    pub fn new(options: CodecOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    /// Decode a buffer holding exactly one record.
    pub fn decode(&self, data: &[u8]) -> SvbinResult<ArchiveRecord> {
        let mut frames = FrameReader::from_slice(data, self.options.endian);
        let rank = self.read_rank(&mut frames)?;
        let record = self.read_body(&mut frames, rank)?;
        match frames.remaining() {
            Some(0) | None => Ok(record),
            Some(remaining) => Err(SvbinError::TrailingBytes { remaining }),
        }
    }

    /// Decode one record from a stream, leaving the stream positioned after it.
    pub fn read_from<R: Read>(&self, source: &mut R) -> SvbinResult<ArchiveRecord> {
        let mut frames = FrameReader::new(source, self.options.endian);
        let rank = self.read_rank(&mut frames)?;
        self.read_body(&mut frames, rank)
    }

    /// Iterate over records stored back to back in `source`.
    ///
    /// Iteration ends when the source is exhausted exactly at a record
    /// boundary. Any error ends the iteration after it is yielded.
    pub fn records<R: Read>(&self, source: R) -> Records<R> {
        Records {
            reader: *self,
            frames: FrameReader::new(source, self.options.endian),
            done: false,
        }
    }

    fn read_rank<R: Read>(&self, frames: &mut FrameReader<R>) -> SvbinResult<usize> {
        let raw = frames.read_i32("rank")?;
        check_rank(raw.into(), self.options.max_rank())
    }

    fn read_body<R: Read>(
        &self,
        frames: &mut FrameReader<R>,
        rank: usize,
    ) -> SvbinResult<ArchiveRecord> {
        let start = frames.consumed() - INT_BYTES;

        frames.ensure_available(rank * INT_BYTES, "shape")?;
        let mut shape = Vec::with_capacity(rank);
        for axis in 0..rank {
            let value = frames.read_i32("shape")?;
            let dim = usize::try_from(value)
                .map_err(|_| SvbinError::InvalidDimension { axis, value })?;
            shape.push(dim);
        }

        // The array's own encoding restates its extents.
        let mut inner = Vec::with_capacity(rank);
        for _ in 0..rank {
            inner.push(frames.read_i32("payload shape")?);
        }
        let consistent = inner
            .iter()
            .zip(&shape)
            .all(|(&i, &d)| usize::try_from(i).is_ok_and(|i| i == d));
        if !consistent {
            return Err(SvbinError::ShapeMismatch {
                outer: shape,
                inner,
            });
        }

        let count = element_count(&shape).ok_or(SvbinError::TruncatedStream {
            field: "elements",
            needed: usize::MAX,
            available: frames.remaining().unwrap_or(0),
        })?;
        trace!("record rank {rank} shape {shape:?}: reading {count} elements");
        let elements = frames.read_complex_vec(count, "elements")?;

        let time = frames.read_f64("time")?;
        let step_hint = frames.read_f64("step hint")?;

        debug!(
            "decoded rank-{rank} record {shape:?} at t={time} ({} bytes)",
            frames.consumed() - start
        );
        Ok(ArchiveRecord::from_parts(shape, elements, time, step_hint))
    }
}

/// Decode one record with default options.
pub fn decode(data: &[u8]) -> SvbinResult<ArchiveRecord> {
    ArchiveReader::default().decode(data)
}

// ---------------------------------------------------------------------------
// Records iterator
// ---------------------------------------------------------------------------

/// Iterator returned by [`ArchiveReader::records`].
pub struct Records<R> {
    reader: ArchiveReader,
    frames: FrameReader<R>,
    done: bool,
}

impl<R: Read> Records<R> {
    fn next_record(&mut self) -> SvbinResult<Option<ArchiveRecord>> {
        let Some(raw) = self.frames.read_i32_or_eof("rank")? else {
            return Ok(None);
        };
        let rank = check_rank(raw.into(), self.reader.options.max_rank())?;
        self.reader.read_body(&mut self.frames, rank).map(Some)
    }

    /// Bytes consumed from the source so far.
    pub fn position(&self) -> usize {
        self.frames.consumed()
    }
}

impl<R: Read> Iterator for Records<R> {
    type Item = SvbinResult<ArchiveRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
