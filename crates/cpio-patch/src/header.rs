//! Container format detection by magic bytes

use std::fmt;
use std::io::Read;

use crate::{Error, Result};

/// Length of the longest recognized magic sequence
pub const MAX_MAGIC_LEN: usize = 6;

/// cpio newc ASCII magic ("070701")
const CPIO_MAGIC: [u8; MAX_MAGIC_LEN] = [0x30, 0x37, 0x30, 0x37, 0x30, 0x31];

/// xz stream magic
const XZ_MAGIC: [u8; MAX_MAGIC_LEN] = [0xFD, 0x37, 0x7A, 0x58, 0x5A, 0x00];

/// gzip magic, only two bytes wide
const GZ_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// Container format classified from a stream's leading bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderType {
    /// No recognized magic
    Unknown,
    /// cpio newc ASCII archive
    Cpio,
    /// xz stream
    Xz,
    /// gzip stream
    Gz,
}

impl HeaderType {
    /// Classify a stream by reading exactly [`MAX_MAGIC_LEN`] bytes from
    /// the current cursor.
    ///
    /// The magic bytes are consumed; a caller that needs to decode from
    /// the start of the stream must seek back itself.
    pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self> {
        let mut magic = [0u8; MAX_MAGIC_LEN];
        reader.read_exact(&mut magic)?;

        if magic == CPIO_MAGIC {
            return Ok(HeaderType::Cpio);
        }

        if magic == XZ_MAGIC {
            return Ok(HeaderType::Xz);
        }

        if magic[..GZ_MAGIC.len()] == GZ_MAGIC {
            return Ok(HeaderType::Gz);
        }

        Err(Error::UnsupportedFormat { magic })
    }
}

impl fmt::Display for HeaderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HeaderType::Unknown => "unknown",
            HeaderType::Cpio => "cpio",
            HeaderType::Xz => "xz",
            HeaderType::Gz => "gz",
        };
        f.write_str(name)
    }
}
