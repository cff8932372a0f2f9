//! cpio envelope handling
//!
//! Initramfs-style images often wrap their compressed payload in a small
//! cpio archive: a few uncompressed records, the `TRAILER!!!` end marker,
//! zero padding up to a block boundary, then the gzip or xz stream. This
//! module locates the end of that envelope so it can be copied off
//! verbatim, measures the zero padding between envelope and payload, and
//! writes both back in front of a repacked payload so the rewritten file
//! keeps the exact byte layout of the original.

use std::io::{self, Read, Seek, SeekFrom, Write};

use crate::header::HeaderType;
use crate::{Error, Result};

/// Entry name marking end-of-archive
const TRAILER_NAME: &[u8] = b"TRAILER!!!";

/// On-disk size of a newc ASCII record header
const RECORD_HEADER_LEN: usize = 110;

/// Record magic for the newc format
const MAGIC_NEWC: &[u8] = b"070701";

/// Record magic for the newc variant with checksums
const MAGIC_CRC: &[u8] = b"070702";

/// Parse one 8-character ASCII hex field of a newc header
fn parse_hex_field(raw: &[u8]) -> Result<u64> {
    let text = std::str::from_utf8(raw)
        .map_err(|err| Error::invalid_record(format!("non-ascii header field: {err}")))?;
    u64::from_str_radix(text, 16)
        .map_err(|err| Error::invalid_record(format!("non-hex header field {text:?}: {err}")))
}

/// Distance from `position` to the next 4-byte boundary
fn pad4(position: u64) -> u64 {
    (4 - (position % 4)) % 4
}

/// Walk newc records from the start of `src` until the trailer entry.
///
/// Returns the byte offset immediately past the trailer's full on-disk
/// representation (header, name and name padding). File data of regular
/// records is skipped by seeking, never read.
fn find_trailer<R: Read + Seek>(src: &mut R) -> Result<u64> {
    let mut header = [0u8; RECORD_HEADER_LEN];
    let mut position: u64 = 0;

    loop {
        src.read_exact(&mut header)?;
        position += RECORD_HEADER_LEN as u64;

        let magic = &header[..6];
        if magic != MAGIC_NEWC && magic != MAGIC_CRC {
            return Err(Error::invalid_record(format!(
                "bad record magic {} at offset {}",
                hex::encode(magic),
                position - RECORD_HEADER_LEN as u64,
            )));
        }

        let file_size = parse_hex_field(&header[54..62])?;
        let name_size = parse_hex_field(&header[94..102])?;

        let mut name = vec![0u8; name_size as usize];
        src.read_exact(&mut name)?;
        position += name_size;

        let name_pad = pad4(RECORD_HEADER_LEN as u64 + name_size);
        src.seek(SeekFrom::Current(name_pad as i64))?;
        position += name_pad;

        // The stored name includes a trailing NUL
        let name = match name.iter().position(|&b| b == 0) {
            Some(nul) => &name[..nul],
            None => &name[..],
        };

        if name == TRAILER_NAME {
            return Ok(position);
        }

        let data_span = file_size + pad4(file_size);
        src.seek(SeekFrom::Current(data_span as i64))?;
        position += data_span;
    }
}

/// Copy the cpio envelope of `src` verbatim into `dst`, leaving the
/// source cursor right after the trailer record.
fn cut<W: Write, R: Read + Seek>(dst: &mut W, src: &mut R) -> Result<()> {
    src.seek(SeekFrom::Start(0))?;

    let envelope_len = find_trailer(src)?;

    src.seek(SeekFrom::Start(0))?;

    let copied = io::copy(&mut src.by_ref().take(envelope_len), dst)?;
    if copied != envelope_len {
        return Err(Error::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("envelope copy ended early: {copied} of {envelope_len} bytes"),
        )));
    }

    Ok(())
}

/// Count consecutive zero bytes from the current cursor of `src`.
///
/// On the first non-zero byte the source is seeked back so its cursor
/// sits exactly on that byte. Reaching EOF while still scanning zeros
/// means the file holds no payload at all and is an error.
fn find_zero_footer<R: Read + Seek>(src: &mut R, buffer_size: usize) -> Result<u64> {
    let mut buffer = vec![0u8; buffer_size];
    let mut zeros: u64 = 0;
    let mut total_read: u64 = 0;

    loop {
        let read = match src.read(&mut buffer) {
            Ok(0) => {
                return Err(Error::Io(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "zero padding runs to end of file",
                )));
            }
            Ok(read) => read,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        };
        total_read += read as u64;

        for &byte in &buffer[..read] {
            if byte != 0x00 {
                src.seek(SeekFrom::Current(zeros as i64 - total_read as i64))?;
                return Ok(zeros);
            }

            zeros += 1;
        }
    }
}

/// Split a cpio-wrapped file into its envelope and compressed payload.
///
/// The envelope (everything up to and including the trailer record) is
/// copied verbatim into `envelope`; the zero padding that follows it is
/// measured and skipped; the payload that remains is classified. Returns
/// the detected payload type and the padding size, with the source cursor
/// positioned [`crate::MAX_MAGIC_LEN`] bytes into the payload.
pub fn cut_header<R: Read + Seek, W: Write>(
    src: &mut R,
    envelope: &mut W,
    buffer_size: usize,
) -> Result<(HeaderType, u64)> {
    cut(envelope, src)?;

    let zero_footer_size = find_zero_footer(src, buffer_size)?;

    let payload_type = HeaderType::from_reader(src)?;

    Ok((payload_type, zero_footer_size))
}

/// Write the preserved envelope followed by `footer_size` zero bytes,
/// reproducing the framing measured by [`cut_header`].
pub fn write_envelope<W: Write, R: Read>(
    dst: &mut W,
    envelope: &mut R,
    footer_size: u64,
) -> Result<()> {
    io::copy(envelope, dst)?;
    io::copy(&mut io::repeat(0x00).take(footer_size), dst)?;

    Ok(())
}
