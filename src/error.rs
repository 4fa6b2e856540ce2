//! Error types for bddtool

use std::path::PathBuf;

use thiserror::Error;

use crate::bdd::BddEntry;

/// Main error type for archive operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "Truncated directory entry at offset {offset}: {available} of {} bytes available",
        BddEntry::SIZE
    )]
    TruncatedRecord { offset: usize, available: usize },

    #[error(
        "Entry '{name}' points outside the archive: offset {offset}, length {length}, archive size {archive_len}"
    )]
    OutOfBounds {
        name: String,
        offset: i32,
        length: i32,
        archive_len: usize,
    },

    #[error("Entry name '{name}' is not a plain file name")]
    InvalidName { name: String },

    #[error("{} changed size while packing: expected {expected} bytes, read {actual}", path.display())]
    SizeChanged {
        path: PathBuf,
        expected: usize,
        actual: usize,
    },

    #[error("Archive too large: {0} bytes does not fit in 32-bit offsets")]
    ArchiveTooLarge(u64),

    #[error("Invalid file time: {0}")]
    InvalidFileTime(i64),

    #[error("Timestamp outside the FILETIME range")]
    TimestampOutOfRange,
}

/// Result type alias for archive operations
pub type Result<T> = std::result::Result<T, Error>;

/// Attach the offending path to an I/O error.
pub(crate) trait PathContext<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> PathContext<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|source| Error::File {
            path: path.into(),
            source,
        })
    }
}
