//! Shared fixture builders for pipeline tests

// Not every test binary uses every helper
#![allow(dead_code)]

use std::io::{Cursor, Read, Write};

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;

/// Route library logs through the test harness when RUST_LOG is set
pub fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// gzip-compress `data`
pub fn gz(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// Decode a gzip stream
pub fn gunzip(data: &[u8]) -> Vec<u8> {
    let mut decoded = Vec::new();
    GzDecoder::new(Cursor::new(data))
        .read_to_end(&mut decoded)
        .unwrap();
    decoded
}

/// xz-compress `data`
pub fn xz(data: &[u8]) -> Vec<u8> {
    let mut compressed = Vec::new();
    lzma_rs::xz_compress(&mut Cursor::new(data), &mut compressed).unwrap();
    compressed
}

/// A deterministic payload with `marker` planted at the given offsets.
///
/// Filler bytes cycle through 0..251, which cannot reproduce the ASCII
/// markers used by the tests.
pub fn payload_with_markers(marker: &[u8], offsets: &[usize], len: usize) -> Vec<u8> {
    let mut data: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
    for &offset in offsets {
        data[offset..offset + marker.len()].copy_from_slice(marker);
    }
    data
}

/// One newc cpio record; pass empty data for the trailer
pub fn newc_record(name: &str, data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"070701");

    let fields: [u32; 13] = [
        1,                 // ino
        0o100_644,         // mode
        0,                 // uid
        0,                 // gid
        1,                 // nlink
        0,                 // mtime
        data.len() as u32, // filesize
        0,                 // devmajor
        0,                 // devminor
        0,                 // rdevmajor
        0,                 // rdevminor
        name.len() as u32 + 1,
        0, // check
    ];
    for field in fields {
        out.extend_from_slice(format!("{field:08x}").as_bytes());
    }

    out.extend_from_slice(name.as_bytes());
    out.push(0);
    while out.len() % 4 != 0 {
        out.push(0);
    }

    out.extend_from_slice(data);
    while out.len() % 4 != 0 {
        out.push(0);
    }

    out
}

/// A minimal initramfs-style envelope: one microcode-ish entry plus the
/// end-of-archive trailer
pub fn sample_envelope() -> Vec<u8> {
    let mut archive = Vec::new();
    archive.extend_from_slice(&newc_record("early_cpio", b"1\n"));
    archive.extend_from_slice(&newc_record("TRAILER!!!", &[]));
    archive
}
