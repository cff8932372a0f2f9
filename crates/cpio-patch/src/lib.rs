//! # cpio-patch
//!
//! In-place byte-pattern patching for compressed firmware images.
//!
//! Firmware and initramfs images commonly ship as a gzip or xz stream,
//! sometimes wrapped in a cpio envelope with zero padding between the
//! archive trailer and the compressed payload. This crate rewrites exact
//! byte sequences inside such an image without restructuring it:
//!
//! 1. classify the container by magic bytes;
//! 2. when the outer container is cpio, split off the envelope verbatim
//!    and measure the zero-byte footer behind it;
//! 3. decompress the payload into an on-disk scratch file, with a hard
//!    output ceiling on gzip input as a decompression-bomb guard;
//! 4. stream-search the raw payload for each pattern and overwrite every
//!    match offset in place;
//! 5. gzip-recompress and reassemble the original framing byte for byte.
//!
//! Every declared pattern must match exactly its declared count, or the
//! whole file is rejected and left untouched.
//!
//! ## Example
//!
//! ```no_run
//! use cpio_patch::{Patcher, Pattern};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let (sender, receiver) = crossbeam_channel::unbounded();
//!
//! let mut patcher = Patcher::new("/tmp", "/images/initramfs.img", sender);
//! patcher.patch(
//!     &[Pattern::new(
//!         "rescue shell password",
//!         1,
//!         b"rescue-password-v1".to_vec(),
//!         b"rescue-password-v2".to_vec(),
//!     )],
//!     true,
//! );
//!
//! let result = receiver.recv()?;
//! if let Some(err) = result.error {
//!     eprintln!("{} failed: {err}", result.path.display());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! For many files, run one [`Patcher`] per file (one thread each if
//! wanted); all of them can share a single result sender.

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod compression;
pub mod cpio;
pub mod error;
pub mod header;
pub mod io;
pub mod patcher;
pub mod pattern;
pub mod replace;
pub mod search;

// Re-export commonly used types
pub use error::{Error, Result};
pub use header::{HeaderType, MAX_MAGIC_LEN};
pub use patcher::{BUFFER_SIZE, MAX_DECOMPRESS_BYTES, Patcher};
pub use pattern::{PatchResult, Pattern};
pub use replace::replace_bytes;
pub use search::search_bytes;
