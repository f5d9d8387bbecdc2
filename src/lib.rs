//! Partwise downloads large files over HTTP(S) by splitting them into
//! byte-range segments fetched concurrently, resumes partially-completed
//! downloads from their on-disk part files, and supervises many such
//! downloads as a batch with failure tracking and retry.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use partwise::batch::BatchBuilder;
//! use partwise::task::DownloadTask;
//! use std::path::PathBuf;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), partwise::Error> {
//! let tasks = vec![DownloadTask::try_from("https://example.com/big.iso")?
//!     .directory(PathBuf::from("downloads"))
//!     .segments(8)];
//! let report = BatchBuilder::new().build().run(&tasks).await?;
//! if !report.ledger().is_empty() {
//!     report.ledger().save(std::path::Path::new("partwise.failed"))?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`task`] - Download tasks and per-file outcomes
//! - [`metadata`] - The HEAD probe: size, range support, file name
//! - [`segment`] - Byte-range planning and the segment workers
//! - [`assemble`] - Part file reassembly
//! - [`single`] - The per-file download state machine
//! - [`batch`] - Batch orchestration over a bounded job pool
//! - [`ledger`] - The persisted failure ledger feeding retry runs
//! - [`progress`] - Funnel-channel progress aggregation and display
//! - [`http`] - HTTP client with retry/tracing middleware
//! - [`error`] - Centralized error handling

pub mod assemble;
pub mod batch;
pub mod error;
pub mod http;
pub mod ledger;
pub mod metadata;
pub mod progress;
pub mod segment;
pub mod single;
pub mod task;

pub use batch::{Batch, BatchBuilder, BatchConfig, BatchReport};
pub use error::{Error, Result};
pub use http::{create_http_client, HttpClientConfig};
pub use ledger::{FailureLedger, FailureRecord, LEDGER_VERSION};
pub use metadata::ResolvedTarget;
pub use progress::{ProgressBarOpts, ProgressEvent, StyleOptions};
pub use segment::{plan, Segment};
pub use task::{DownloadTask, FileOutcome, Status, DEFAULT_SEGMENTS};
