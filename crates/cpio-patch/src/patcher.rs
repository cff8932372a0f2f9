//! Per-file patch pipeline
//!
//! One [`Patcher`] owns one target file for the duration of one
//! [`Patcher::patch`] call: sniff the container format, cut the cpio
//! envelope when one is present, decompress the payload into a scratch
//! file, search and rewrite every pattern, then recompress and restore
//! the original framing. The outcome crosses the boundary as exactly one
//! [`PatchResult`] on the result channel.
//!
//! The pipeline is strictly sequential and performs no internal
//! concurrency; callers drive one `Patcher` per file, each from its own
//! thread when parallelism is wanted. Scratch files are named after the
//! target's base name, so concurrent patchers over different files never
//! collide. Any component error is terminal for the file: there are no
//! retries, and the original file is only rewritten after every pattern
//! has matched its declared count.

use std::fs::{self, File, OpenOptions};
use std::io::{Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crossbeam_channel::Sender;

use crate::compression::{pack_gz, unpack_gz, unpack_xz};
use crate::header::{HeaderType, MAX_MAGIC_LEN};
use crate::io::clone_to_path;
use crate::pattern::{PatchResult, Pattern};
use crate::{Error, Result, cpio, replace, search};

/// Chunk size for buffered scans and searches
pub const BUFFER_SIZE: usize = 8192;

/// Hard ceiling on gzip decompressed output
pub const MAX_DECOMPRESS_BYTES: u64 = 524_288_000;

/// Drives the patch pipeline for a single target file
#[derive(Debug)]
pub struct Patcher {
    temp_dir: PathBuf,
    path: PathBuf,
    file_name: String,
    zero_footer_size: u64,
    result: Sender<PatchResult>,
}

impl Patcher {
    /// Create an orchestrator for `path`, reporting into `result`.
    ///
    /// Scratch files are created under `temp_dir` and named after the
    /// target's base name.
    pub fn new(
        temp_dir: impl Into<PathBuf>,
        path: impl Into<PathBuf>,
        result: Sender<PatchResult>,
    ) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            temp_dir: temp_dir.into(),
            path,
            file_name,
            zero_footer_size: 0,
            result,
        }
    }

    /// Run the whole pipeline for this file and deliver exactly one
    /// result, success or failure.
    ///
    /// Every declared pattern must match exactly its declared count or
    /// the file is rejected; the original file is untouched on any
    /// failure before the repack stage. With `backup` set, a verbatim
    /// copy of the pre-patch file is written to `<path>.bak` before the
    /// rewrite.
    pub fn patch(&mut self, patterns: &[Pattern], backup: bool) {
        let result = match self.run(patterns, backup) {
            Ok(bytes_patched) => PatchResult::success(self.path.clone(), bytes_patched),
            Err(err) => PatchResult::failure(self.path.clone(), err),
        };

        self.cleanup();

        if self.result.send(result).is_err() {
            log::warn!("{}: result receiver dropped", self.path.display());
        }
    }

    fn run(&mut self, patterns: &[Pattern], backup: bool) -> Result<u64> {
        let mut in_file = OpenOptions::new().read(true).write(true).open(&self.path)?;

        let mut file_type = HeaderType::from_reader(&mut in_file)?;
        let mut cpio_file = None;

        if file_type == HeaderType::Cpio {
            log::info!("{}: cut cpio envelope", self.path.display());

            let mut envelope = scratch_file(&self.cpio_path())?;
            let (payload_type, zero_footer_size) =
                cpio::cut_header(&mut in_file, &mut envelope, BUFFER_SIZE)?;

            file_type = payload_type;
            self.zero_footer_size = zero_footer_size;
            cpio_file = Some(envelope);
        }

        let mut raw_file = scratch_file(&self.raw_path())?;

        self.unpack(&mut raw_file, &mut in_file, file_type)?;

        let replaced = self.apply_patterns(&mut raw_file, patterns)?;
        if replaced == 0 {
            return Ok(0);
        }

        self.pack(&mut raw_file, &mut in_file, cpio_file.as_mut(), backup)?;

        Ok(replaced)
    }

    /// Decompress the payload into the raw scratch file.
    ///
    /// The sniffer consumed the magic bytes, so the source is first
    /// rewound to the true payload start.
    fn unpack(&self, raw_file: &mut File, in_file: &mut File, file_type: HeaderType) -> Result<()> {
        in_file.seek(SeekFrom::Current(-(MAX_MAGIC_LEN as i64)))?;

        match file_type {
            HeaderType::Xz => {
                log::info!("{}: unpack xz payload", self.path.display());
                unpack_xz(raw_file, in_file)
            }
            HeaderType::Gz => {
                log::info!("{}: unpack gz payload", self.path.display());
                unpack_gz(raw_file, in_file, MAX_DECOMPRESS_BYTES)
            }
            HeaderType::Cpio | HeaderType::Unknown => {
                Err(Error::InvalidPayload { found: file_type })
            }
        }
    }

    /// Search and rewrite every pattern against the raw scratch file,
    /// returning the total bytes replaced.
    fn apply_patterns(&self, raw_file: &mut File, patterns: &[Pattern]) -> Result<u64> {
        let mut replaced: u64 = 0;

        for (index, pattern) in patterns.iter().enumerate() {
            log::info!(
                "{}: search pattern {index} [{}]",
                self.path.display(),
                pattern.description
            );

            raw_file.seek(SeekFrom::Start(0))?;

            let offsets =
                search::search_bytes(raw_file, &pattern.search, BUFFER_SIZE, pattern.count)?;

            if offsets.is_empty() {
                return Err(Error::PatternNotFound {
                    path: self.path.clone(),
                    index,
                    description: pattern.description.clone(),
                });
            }

            if offsets.len() != pattern.count {
                return Err(Error::OffsetCountMismatch {
                    path: self.path.clone(),
                    index,
                    description: pattern.description.clone(),
                    expected: pattern.count,
                    actual: offsets.len(),
                });
            }

            log::info!("{}: patch pattern {index}", self.path.display());

            replaced += replace::replace_bytes(raw_file, &offsets, &pattern.replace)?;
        }

        Ok(replaced)
    }

    fn backup(&self, in_file: &mut File) -> Result<()> {
        log::info!("{}: backup", self.path.display());

        in_file.seek(SeekFrom::Start(0))?;

        let mut backup_path = self.path.clone().into_os_string();
        backup_path.push(".bak");

        clone_to_path(in_file, Path::new(&backup_path))
    }

    /// Rewrite the original file: optional backup, truncate in place,
    /// restore the cpio envelope and zero footer, append the
    /// gzip-recompressed payload.
    fn pack(
        &mut self,
        raw_file: &mut File,
        in_file: &mut File,
        cpio_file: Option<&mut File>,
        backup: bool,
    ) -> Result<()> {
        if backup {
            self.backup(in_file)?;
        }

        raw_file.seek(SeekFrom::Start(0))?;
        in_file.seek(SeekFrom::Start(0))?;
        in_file.set_len(0)?;

        if let Some(envelope) = cpio_file {
            envelope.seek(SeekFrom::Start(0))?;
            cpio::write_envelope(in_file, envelope, self.zero_footer_size)?;
        }

        log::info!("{}: pack gz", self.path.display());

        pack_gz(in_file, raw_file)
    }

    /// Best-effort removal of the scratch files owned by this invocation
    fn cleanup(&self) {
        for path in [self.raw_path(), self.cpio_path()] {
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => {
                    log::warn!("{}: scratch file not removed: {err}", path.display());
                }
            }
        }
    }

    fn raw_path(&self) -> PathBuf {
        self.temp_dir.join(format!("{}.raw", self.file_name))
    }

    fn cpio_path(&self) -> PathBuf {
        self.temp_dir.join(format!("{}.cpio", self.file_name))
    }
}

/// Open a read-write scratch file, truncating anything left behind by an
/// earlier run over the same base name.
fn scratch_file(path: &Path) -> Result<File> {
    Ok(OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?)
}
