//! Pattern and result data model

use std::path::PathBuf;

use crate::Error;

/// One byte-replacement rule applied to a decompressed payload.
///
/// `replace` is written verbatim at each match offset through a
/// random-access write, so no surrounding bytes shift; callers must keep
/// the replacement length compatible with whatever consumes the payload.
#[derive(Debug, Clone)]
pub struct Pattern {
    /// Human-readable label used in logs and error messages
    pub description: String,
    /// Exact number of occurrences the search bytes must have
    pub count: usize,
    /// Byte sequence to locate; must be non-empty
    pub search: Vec<u8>,
    /// Bytes written at each match offset
    pub replace: Vec<u8>,
}

impl Pattern {
    /// Create a pattern
    pub fn new(
        description: impl Into<String>,
        count: usize,
        search: impl Into<Vec<u8>>,
        replace: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            description: description.into(),
            count,
            search: search.into(),
            replace: replace.into(),
        }
    }
}

/// Terminal outcome of one patch invocation, delivered on the result
/// channel exactly once per target file
#[derive(Debug)]
pub struct PatchResult {
    /// Path of the target file
    pub path: PathBuf,
    /// Total replacement bytes written into the decompressed payload;
    /// zero when no pattern was applied
    pub bytes_patched: u64,
    /// The failure that terminated the pipeline, if any
    pub error: Option<Error>,
}

impl PatchResult {
    /// A successful outcome
    pub fn success(path: impl Into<PathBuf>, bytes_patched: u64) -> Self {
        Self {
            path: path.into(),
            bytes_patched,
            error: None,
        }
    }

    /// A failed outcome
    pub fn failure(path: impl Into<PathBuf>, error: Error) -> Self {
        Self {
            path: path.into(),
            bytes_patched: 0,
            error: Some(error),
        }
    }

    /// True when the pipeline completed without error
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_constructors() {
        let ok = PatchResult::success("/images/a.img", 16);
        assert!(ok.is_success());
        assert_eq!(ok.bytes_patched, 16);

        let failed = PatchResult::failure(
            "/images/b.img",
            Error::PatternNotFound {
                path: PathBuf::from("/images/b.img"),
                index: 0,
                description: "missing".to_string(),
            },
        );
        assert!(!failed.is_success());
        assert_eq!(failed.bytes_patched, 0);
    }
}
