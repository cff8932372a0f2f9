//! Streaming exact-byte-sequence search
//!
//! The searcher makes a single left-to-right pass over the stream with a
//! fixed-size read buffer, so memory stays constant no matter how large
//! the decompressed payload is, and matches that span two reads are still
//! found. Matching is an explicit partial-match counter: on a mismatch
//! the counter resets to zero and the mismatching byte is not
//! reconsidered as the start of a new match. Needles with a repeating
//! prefix (`AAB` inside `AAAB`) can therefore go undetected; the patterns
//! used on firmware payloads are distinguishing strings where this does
//! not occur.

use std::io::{self, Read};

use crate::Result;

/// Scan `reader` once for exact occurrences of `needle`, returning the
/// starting offset of every match in stream order.
///
/// `expected` is the caller's declared match count and only pre-sizes the
/// offset vector; finding a different number of matches is the caller's
/// concern, not an error here.
pub fn search_bytes<R: Read>(
    reader: &mut R,
    needle: &[u8],
    buffer_size: usize,
    expected: usize,
) -> Result<Vec<u64>> {
    let mut offsets = Vec::with_capacity(expected);
    if needle.is_empty() {
        return Ok(offsets);
    }

    let mut buffer = vec![0u8; buffer_size];
    let mut matched: usize = 0;
    let mut total_read: u64 = 0;

    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(read) => read,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        };

        for (index, &byte) in buffer[..read].iter().enumerate() {
            if byte != needle[matched] {
                matched = 0;
                continue;
            }

            matched += 1;
            if matched == needle.len() {
                offsets.push(total_read + index as u64 + 1 - needle.len() as u64);
                matched = 0;
            }
        }

        total_read += read as u64;
    }

    Ok(offsets)
}
