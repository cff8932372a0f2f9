//! gzip recompression of the patched payload

use std::io::{self, Read, Write};

use flate2::Compression;
use flate2::write::GzEncoder;

use crate::Result;

/// gzip-compress the remainder of `src` onto `dst`.
///
/// Output is always gzip regardless of what the payload was originally
/// compressed with.
pub fn pack_gz<W: Write, R: Read>(dst: &mut W, src: &mut R) -> Result<()> {
    let mut encoder = GzEncoder::new(dst, Compression::default());

    io::copy(src, &mut encoder)?;
    encoder.finish()?;

    Ok(())
}
