//! Bounded streaming decompression into a scratch file
//!
//! Both decoders stream: the payload is never held in memory, only a
//! read buffer's worth at a time. The gzip path additionally enforces a
//! hard output ceiling so a small compressed input cannot expand into an
//! unbounded amount of scratch space (decompression bomb).

use std::io::{self, BufReader, BufWriter, Read, Write};

use flate2::read::GzDecoder;

use crate::{Error, Result};

/// Decompress an xz stream from `src` into `dst`.
///
/// The xz frame carries its own end-of-stream marker, which terminates
/// the copy; no output ceiling is applied.
pub fn unpack_xz<W: Write, R: Read>(dst: &mut W, src: R) -> Result<()> {
    let mut reader = BufReader::new(src);
    let mut writer = BufWriter::new(dst);

    lzma_rs::xz_decompress(&mut reader, &mut writer)
        .map_err(|err| Error::compression(format!("xz decompress failed: {err:?}")))?;

    writer.flush()?;

    Ok(())
}

/// Decompress a gzip stream from `src` into `dst`, refusing to produce
/// `limit` or more bytes of output.
pub fn unpack_gz<W: Write, R: Read>(dst: &mut W, src: R, limit: u64) -> Result<()> {
    let decoder = GzDecoder::new(src);

    let written = io::copy(&mut decoder.take(limit), dst)?;
    if written >= limit {
        return Err(Error::DecompressLimit { written, limit });
    }

    Ok(())
}
