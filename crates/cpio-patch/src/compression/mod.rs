//! Streaming compression adapters for the patch pipeline

mod compress;
mod decompress;

pub use compress::pack_gz;
pub use decompress::{unpack_gz, unpack_xz};
