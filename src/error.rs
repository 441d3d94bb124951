use thiserror::Error;

pub type SvbinResult<T> = Result<T, SvbinError>;

#[derive(Error, Debug)]
pub enum SvbinError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported rank {found}: expected 1..={max}")]
    UnsupportedRank { found: i64, max: usize },

    #[error("Truncated stream while reading {field}: needed {needed} bytes, {available} available")]
    TruncatedStream {
        field: &'static str,
        needed: usize,
        available: usize,
    },

    #[error("Shape mismatch: record declares {outer:?}, payload restates {inner:?}")]
    ShapeMismatch { outer: Vec<usize>, inner: Vec<i32> },

    #[error("Invalid dimension on axis {axis}: {value}")]
    InvalidDimension { axis: usize, value: i32 },

    #[error("{remaining} trailing bytes after record")]
    TrailingBytes { remaining: usize },

    #[error("Element count mismatch: shape requires {expected}, got {found}")]
    ElementCountMismatch { expected: usize, found: usize },

    #[error("Dimension on axis {axis} does not fit a 4-byte int: {value}")]
    DimensionOverflow { axis: usize, value: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Codec error: {0}")]
    Codec(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Not found: {0}")]
    NotFound(String),
}
