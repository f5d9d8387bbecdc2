//! Download task definitions and per-file outcomes.
//!
//! A [`DownloadTask`] describes one file to fetch and is immutable once a
//! download starts. A [`FileOutcome`] reports how that download ended:
//! [`Status::Done`], [`Status::Skipped`] (nothing to do, not an error), or
//! [`Status::Failed`] (terminal, recorded in the failure ledger).

pub mod outcome;
#[allow(clippy::module_inception)]
pub mod task;

pub use outcome::{FileOutcome, Status};
pub use task::{DownloadTask, DEFAULT_SEGMENTS};
