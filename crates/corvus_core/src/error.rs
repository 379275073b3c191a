use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced while reading category ledgers or assembling a build.
///
/// There is no recoverable tier: every variant aborts the run. Each carries
/// enough context (expected path, offending line) to diagnose the failure
/// without re-running with added instrumentation.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// An expected version or hash file does not exist under the asset tree.
    #[error("expected file not found: {}", .0.display())]
    MissingFile(PathBuf),

    /// A hash-ledger line did not parse as `path,size,hash`.
    #[error("malformed hash record at {path}:{line}: {source}", path = .path.display())]
    Format {
        path: PathBuf,
        line: usize,
        #[source]
        source: HashLineError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a single hash-ledger line failed to parse.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum HashLineError {
    #[error("expected 3 comma-separated fields, found {0}")]
    FieldCount(usize),

    #[error("invalid size field: {0}")]
    Size(#[from] std::num::ParseIntError),
}
