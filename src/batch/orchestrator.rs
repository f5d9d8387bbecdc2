//! The batch orchestrator.
//!
//! # Examples
//!
//! ```rust,no_run
//! use partwise::batch::BatchBuilder;
//! use partwise::task::DownloadTask;
//!
//! # async fn example() -> Result<(), partwise::Error> {
//! let tasks = vec![
//!     DownloadTask::try_from("https://example.com/one.zip")?,
//!     DownloadTask::try_from("https://example.com/two.zip")?,
//! ];
//! let report = BatchBuilder::new().max_concurrent_files(2).build().run(&tasks).await?;
//! println!("{} ok, {} failed", report.succeeded(), report.failed());
//! # Ok(())
//! # }
//! ```

use super::{config::BatchConfig, report::BatchReport};
use crate::error::Result;
use crate::http::{create_http_client, HttpClientConfig};
use crate::ledger::FailureLedger;
use crate::metadata::{self, ResolvedTarget};
use crate::progress::{
    aggregator::{self, ProgressEvent},
    ProgressDisplay,
};
use crate::single::{self, FileContext};
use crate::task::{DownloadTask, FileOutcome, Status};

use futures::stream::{self, StreamExt};
use std::fmt;
use std::fmt::Debug;
use tracing::{debug, warn};

/// Runs a bounded pool of concurrent file downloads.
///
/// Created via [`BatchBuilder`](super::BatchBuilder). One file's failure
/// never cancels its siblings; failures surface in the returned report's
/// ledger instead.
#[derive(Clone)]
pub struct Batch {
    config: BatchConfig,
}

impl Debug for Batch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Batch").field("config", &self.config).finish()
    }
}

impl Batch {
    /// Creates a new batch with the given configuration.
    pub(crate) fn new(config: BatchConfig) -> Self {
        Self { config }
    }

    /// Gets the number of files downloading at once.
    pub fn max_concurrent_files(&self) -> usize {
        self.config.max_concurrent_files
    }

    /// Gets the upper bound on concurrent segments per file.
    pub fn max_segments(&self) -> usize {
        self.config.max_segments
    }

    /// Gets the probe phase concurrency.
    pub fn probe_concurrency(&self) -> usize {
        self.config.probe_concurrency
    }

    /// Gets the number of transport-level retries per request.
    pub fn retries(&self) -> u32 {
        self.config.retries
    }

    /// Gets whether invalid TLS certificates are accepted.
    pub fn accept_invalid_certs(&self) -> bool {
        self.config.accept_invalid_certs
    }

    /// Runs every task to a terminal outcome.
    ///
    /// Phase one probes metadata for all tasks (bounded concurrency) to
    /// compute the aggregate expected byte total; tasks that cannot be
    /// resolved, or whose size is unknown, are reported as skipped. Phase
    /// two runs up to `max_concurrent_files` file downloads concurrently.
    pub async fn run(&self, tasks: &[DownloadTask]) -> Result<BatchReport> {
        let client = create_http_client(HttpClientConfig {
            retries: self.config.retries,
            proxy: self.config.proxy.clone(),
            headers: self.config.headers.clone(),
            accept_invalid_certs: self.config.accept_invalid_certs,
            connect_timeout: self.config.connect_timeout,
        })?;

        let display = ProgressDisplay::new(self.config.style_options.clone());

        // Probe phase: aggregate total for batch-level progress.
        let probe = display.probe_bar(tasks.len() as u64);
        let probed: Vec<(&DownloadTask, Result<ResolvedTarget>)> = stream::iter(tasks)
            .map(|task| {
                let client = &client;
                let probe = &probe;
                async move {
                    let resolved =
                        metadata::resolve(client, &task.url, task.headers.as_ref()).await;
                    probe.inc(1);
                    (task, resolved)
                }
            })
            .buffered(self.config.probe_concurrency)
            .collect()
            .await;
        probe.finish_and_clear();

        let mut outcomes: Vec<FileOutcome> = Vec::with_capacity(tasks.len());
        let mut runnable: Vec<&DownloadTask> = Vec::new();
        let mut aggregate_total: u64 = 0;
        for (task, resolved) in probed {
            match resolved {
                Ok(target) if target.total_size > 0 => {
                    aggregate_total += target.total_size;
                    runnable.push(task);
                }
                Ok(_) => {
                    warn!("{}: size unknown, skipping", task.url);
                    outcomes.push(skip(task, "server did not announce a size"));
                }
                Err(e) => {
                    warn!("{}: {}, skipping", task.url, e);
                    outcomes.push(skip(task, &e.to_string()));
                }
            }
        }
        debug!(
            "probe phase: {} of {} tasks runnable, {} bytes expected",
            runnable.len(),
            tasks.len(),
            aggregate_total
        );

        // Transfer phase.
        let batch_bar = display.batch_bar(aggregate_total);
        let (tx, rx) = aggregator::channel();
        let batch_agg = tokio::spawn(aggregator::run(rx, aggregate_total, batch_bar.clone(), None));

        let ctx = FileContext {
            client: &client,
            display: &display,
            batch_progress: Some(tx.clone()),
            max_segments: self.config.max_segments,
        };
        let transferred: Vec<FileOutcome> = stream::iter(runnable)
            .map(|task| single::run(&ctx, task))
            .buffer_unordered(self.config.max_concurrent_files)
            .collect()
            .await;

        // The batch total can stay unreached (failures, skips mid-phase);
        // the sentinel releases the aggregator regardless.
        let _ = tx.send(ProgressEvent::Finished);
        drop(ctx);
        drop(tx);
        let _ = batch_agg.await;
        display.finish_batch(batch_bar);

        let mut ledger = FailureLedger::new();
        for outcome in &transferred {
            if let Status::Failed(_) = outcome.status() {
                ledger.record(outcome.task().url.as_str(), outcome.path(), outcome.attempts());
            }
        }
        outcomes.extend(transferred);

        Ok(BatchReport::new(outcomes, ledger))
    }
}

fn skip(task: &DownloadTask, reason: &str) -> FileOutcome {
    FileOutcome::new(
        task.clone(),
        single::intended_destination(task),
        0,
        0,
        Status::Skipped(reason.to_string()),
    )
}
