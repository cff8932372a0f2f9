//! Error types for the patch pipeline

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::header::{HeaderType, MAX_MAGIC_LEN};

/// Result type alias for patch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for patch operations
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Leading bytes match no supported container format
    #[error("unsupported format: magic bytes {}", hex::encode(.magic))]
    UnsupportedFormat {
        /// The bytes read from the head of the stream
        magic: [u8; MAX_MAGIC_LEN],
    },

    /// Payload inside a cpio envelope is not a supported compressed stream
    #[error("invalid payload type inside cpio envelope: {found}")]
    InvalidPayload {
        /// The type detected after cutting the envelope
        found: HeaderType,
    },

    /// Malformed cpio record
    #[error("invalid cpio record: {0}")]
    InvalidRecord(String),

    /// Decompressed output reached the configured ceiling
    #[error("decompression limit reached: wrote {written} of allowed {limit} bytes")]
    DecompressLimit {
        /// Bytes written before the copy stopped
        written: u64,
        /// The configured output ceiling
        limit: u64,
    },

    /// Compression or decompression codec failure
    #[error("compression error: {0}")]
    Compression(String),

    /// A declared pattern produced no matches
    #[error("{}: pattern {index} ({description}) not found", .path.display())]
    PatternNotFound {
        /// Target file being patched
        path: PathBuf,
        /// Index of the pattern in the caller-supplied list
        index: usize,
        /// The pattern's description
        description: String,
    },

    /// Match count differs from the pattern's declared count
    #[error(
        "{}: pattern {index} ({description}) matched {actual} offsets, expected {expected}",
        .path.display()
    )]
    OffsetCountMismatch {
        /// Target file being patched
        path: PathBuf,
        /// Index of the pattern in the caller-supplied list
        index: usize,
        /// The pattern's description
        description: String,
        /// The pattern's declared match count
        expected: usize,
        /// The number of offsets actually found
        actual: usize,
    },
}

impl Error {
    /// Create a new Compression error
    pub fn compression<S: Into<String>>(msg: S) -> Self {
        Error::Compression(msg.into())
    }

    /// Create a new InvalidRecord error
    pub fn invalid_record<S: Into<String>>(msg: S) -> Self {
        Error::InvalidRecord(msg.into())
    }

    /// Check if this error was caused by the patterns rather than the file
    pub fn is_pattern_error(&self) -> bool {
        matches!(
            self,
            Error::PatternNotFound { .. } | Error::OffsetCountMismatch { .. }
        )
    }
}
