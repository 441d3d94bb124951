use num_complex::Complex;
use serde::{Deserialize, Serialize};

use crate::error::{SvbinError, SvbinResult};

/// Highest rank the simulation engine archives.
pub const MAX_RANK: usize = 11;

/// Step hint written into every record produced by the writer.
pub const DEFAULT_STEP_HINT: f64 = 1.0;

// ---------------------------------------------------------------------------
// Endian
// ---------------------------------------------------------------------------

/// Byte order of every framed int and double in a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Endian {
    Little,
    Big,
    /// Byte order of the host, which is what the engine writes.
    #[default]
    Native,
}

impl Endian {
    /// Collapse `Native` into the concrete byte order of this target.
    pub fn resolve(self) -> Endian {
        match self {
            Endian::Native if cfg!(target_endian = "big") => Endian::Big,
            Endian::Native => Endian::Little,
            other => other,
        }
    }
}

impl Serialize for Endian {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Endian::Little => serializer.serialize_str("little"),
            Endian::Big => serializer.serialize_str("big"),
            Endian::Native => serializer.serialize_str("native"),
        }
    }
}

impl<'de> Deserialize<'de> for Endian {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        match s.to_lowercase().as_str() {
            "little" | "le" => Ok(Endian::Little),
            "big" | "be" => Ok(Endian::Big),
            "native" | "" => Ok(Endian::Native),
            other => Err(serde::de::Error::custom(format!("Unknown endian: {other}"))),
        }
    }
}

// ---------------------------------------------------------------------------
// Shape helpers
// ---------------------------------------------------------------------------

/// Number of elements described by `shape`, or `None` on overflow.
pub fn element_count(shape: &[usize]) -> Option<usize> {
    shape.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d))
}

/// Row-major strides: the last dimension varies fastest.
pub fn strides(shape: &[usize]) -> Vec<usize> {
    let mut s: Vec<usize> = shape
        .iter()
        .rev()
        .scan(1usize, |state, &dim| {
            let stride = *state;
            *state *= dim;
            Some(stride)
        })
        .collect();
    s.reverse();
    s
}

/// Flat position of `index` inside `shape`, or `None` if any axis is out of bounds.
pub fn linear_index(shape: &[usize], index: &[usize]) -> Option<usize> {
    if index.len() != shape.len() || index.iter().zip(shape).any(|(i, d)| i >= d) {
        return None;
    }
    Some(index.iter().zip(strides(shape)).map(|(i, s)| i * s).sum())
}

/// Accept `rank` if it lies in `1..=max_rank`; `max_rank` is capped at [`MAX_RANK`].
pub(crate) fn check_rank(rank: i64, max_rank: usize) -> SvbinResult<usize> {
    let max = max_rank.min(MAX_RANK);
    match usize::try_from(rank) {
        Ok(r) if (1..=max).contains(&r) => Ok(r),
        _ => Err(SvbinError::UnsupportedRank { found: rank, max }),
    }
}

// ---------------------------------------------------------------------------
// ArchiveRecord
// ---------------------------------------------------------------------------

/// One decoded archive: a dense complex array plus time and step hint.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveRecord {
    shape: Vec<usize>,
    elements: Vec<Complex<f64>>,
    time: f64,
    step_hint: f64,
}

impl ArchiveRecord {
    /// Build a record for writing. The step hint is set to the writer's placeholder.
    pub fn new(shape: Vec<usize>, elements: Vec<Complex<f64>>, time: f64) -> SvbinResult<Self> {
        check_rank(shape.len() as i64, MAX_RANK)?;
        let expected = element_count(&shape).ok_or(SvbinError::ElementCountMismatch {
            expected: usize::MAX,
            found: elements.len(),
        })?;
        if expected != elements.len() {
            return Err(SvbinError::ElementCountMismatch {
                expected,
                found: elements.len(),
            });
        }
        Ok(Self {
            shape,
            elements,
            time,
            step_hint: DEFAULT_STEP_HINT,
        })
    }

    /// Assemble a record from already-validated parts.
    pub(crate) fn from_parts(
        shape: Vec<usize>,
        elements: Vec<Complex<f64>>,
        time: f64,
        step_hint: f64,
    ) -> Self {
        debug_assert_eq!(element_count(&shape), Some(elements.len()));
        Self {
            shape,
            elements,
            time,
            step_hint,
        }
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn elements(&self) -> &[Complex<f64>] {
        &self.elements
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn step_hint(&self) -> f64 {
        self.step_hint
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Element at a multi-index, interpreting the buffer row-major.
    pub fn get(&self, index: &[usize]) -> Option<Complex<f64>> {
        linear_index(&self.shape, index).map(|i| self.elements[i])
    }

    /// Hand the shape, element buffer and time to the caller.
    pub fn into_parts(self) -> (Vec<usize>, Vec<Complex<f64>>, f64) {
        (self.shape, self.elements, self.time)
    }

    pub fn info(&self) -> RecordInfo {
        RecordInfo {
            rank: self.rank(),
            shape: self.shape.clone(),
            element_count: self.elements.len(),
            time: self.time,
            step_hint: self.step_hint,
        }
    }
}

// ---------------------------------------------------------------------------
// RecordInfo
// ---------------------------------------------------------------------------

/// Serializable summary of a record, without the element data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordInfo {
    pub rank: usize,
    pub shape: Vec<usize>,
    pub element_count: usize,
    pub time: f64,
    pub step_hint: f64,
}
