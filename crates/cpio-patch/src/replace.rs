//! Random-access replacement writes

use std::fs::File;
use std::io::{Seek, SeekFrom, Write};

use crate::Result;

/// Write `replace` at each offset of `file`, returning the total number
/// of bytes written.
///
/// The file is synced once after the whole loop. Offsets written before
/// a failing write are not undone, so the scratch file may be left with
/// a subset of replacements applied.
pub fn replace_bytes(file: &mut File, offsets: &[u64], replace: &[u8]) -> Result<u64> {
    let mut total: u64 = 0;

    for &offset in offsets {
        log::trace!("replace {} bytes at offset {offset}", replace.len());

        file.seek(SeekFrom::Start(offset))?;
        file.write_all(replace)?;

        total += replace.len() as u64;
    }

    file.sync_all()?;

    Ok(total)
}
