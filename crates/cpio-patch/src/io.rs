//! Plain stream I/O helpers

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::Result;

/// Copy the remainder of `reader` verbatim into a new file at `dst` and
/// sync it to durable storage.
pub fn clone_to_path<R: Read>(reader: &mut R, dst: &Path) -> Result<()> {
    let mut dst_file = File::create(dst)?;

    io::copy(reader, &mut dst_file)?;
    dst_file.sync_all()?;

    Ok(())
}
