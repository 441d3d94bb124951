//! Reader and writer for binary state-vector archives.
//!
//! An archive record is a dense complex array of rank 1 to 11 followed by
//! the simulation time and a step-size hint. [`ArchiveReader`] turns bytes
//! into an [`ArchiveRecord`]; [`ArchiveWriter`] produces bytes the simulation
//! engine accepts as an initial condition.
//!
//! ```
//! use num_complex::Complex;
//!
//! let elements = [Complex::new(1.0, 0.0), Complex::new(0.0, 1.0)];
//! let bytes = svbin::encode(&[2], &elements, 0.5).unwrap();
//! let record = svbin::decode(&bytes).unwrap();
//! assert_eq!(record.shape(), &[2]);
//! assert_eq!(record.time(), 0.5);
//! ```

pub mod codecs;
pub mod error;
pub mod file;
pub mod framing;
pub mod options;
pub mod reader;
pub mod store;
pub mod types;
pub mod writer;

// Re-export key types at crate root for convenience.
pub use error::{SvbinError, SvbinResult};
pub use file::{load_record, read_record, save_record, write_record};
pub use options::{CodecOptions, FileOptions};
pub use reader::{ArchiveReader, Records, decode};
pub use store::{LocalBackend, ObjectStoreBackend, StorageBackend};
pub use types::{ArchiveRecord, DEFAULT_STEP_HINT, Endian, MAX_RANK, RecordInfo};
pub use writer::{ArchiveWriter, encode};
