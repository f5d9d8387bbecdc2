//! Error handling for the partwise library.
//!
//! The variants mirror the stages of a download: probing metadata, fetching
//! byte-range segments, reassembling part files, and verifying the final size.
//! A [`Batch`](crate::batch::Batch) run never aborts on a per-file error;
//! terminal failures are collected into a
//! [`FailureLedger`](crate::ledger::FailureLedger) instead.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can happen while downloading.
#[derive(Error, Debug)]
pub enum Error {
    /// The metadata probe (HEAD request) failed after exhausting the
    /// transport retry budget. The affected task is skipped, not fatal to
    /// the batch.
    #[error("metadata probe failed for {url}: {reason}")]
    MetadataUnavailable { url: String, reason: String },

    /// A byte-range fetch exhausted its retries. Partial part files are
    /// retained on disk so a later run can resume.
    #[error("segment {index} failed: {reason}")]
    SegmentFailed { index: usize, reason: String },

    /// A part file expected by the assembler is missing.
    #[error("assembly incomplete: missing part file {0:?}")]
    AssemblyIncomplete(PathBuf),

    /// The assembled file does not match the size announced by the server.
    /// Triggers a bounded whole-file retry before becoming terminal.
    #[error("size mismatch: expected {expected} bytes, assembled {actual}")]
    SizeMismatch { expected: u64, actual: u64 },

    /// Error from the underlying URL parser or the expected URL format.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// A failure-ledger file could not be parsed.
    #[error("malformed ledger: {0}")]
    MalformedLedger(String),

    /// I/O error.
    #[error("I/O error")]
    IOError {
        #[from]
        source: io::Error,
    },

    /// Error from the Reqwest library.
    #[error("request error")]
    Reqwest {
        #[from]
        source: reqwest::Error,
    },
}

impl Error {
    /// Whether this error marks a task as skippable rather than failed.
    pub fn is_skip(&self) -> bool {
        matches!(self, Error::MetadataUnavailable { .. })
    }
}

/// Result type alias for operations that can fail with a partwise error.
pub type Result<T> = std::result::Result<T, Error>;
