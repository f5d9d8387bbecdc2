//! Single-file download orchestration.
//!
//! One download moves through resolving, planning, fetching, assembling
//! and verifying. Verification failures delete the malformed destination
//! and re-enter resolving, bounded by [`MAX_FILE_ATTEMPTS`]; any other
//! error is terminal for the file. Part files always survive a failure so
//! the next run can resume.

use crate::assemble;
use crate::error::{Error, Result};
use crate::http::{create_http_client, HttpClientConfig};
use crate::metadata::{self, sanitize_filename};
use crate::progress::{
    aggregator::{self, ProgressEvent, ProgressSender},
    ProgressDisplay, StyleOptions,
};
use crate::segment::{self, worker::fetch_segment};
use crate::task::{DownloadTask, FileOutcome, Status};

use futures::future::join_all;
use reqwest_middleware::ClientWithMiddleware;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// Whole-file attempts before a size mismatch becomes terminal.
pub(crate) const MAX_FILE_ATTEMPTS: u32 = 3;

/// Shared collaborators handed to each file download by the batch.
pub(crate) struct FileContext<'a> {
    pub client: &'a ClientWithMiddleware,
    pub display: &'a ProgressDisplay,
    /// Funnel into the batch-level aggregator, when one exists.
    pub batch_progress: Option<ProgressSender>,
    /// Upper bound on concurrent segments for one file.
    pub max_segments: usize,
}

/// Downloads a single file with its own client and progress display.
///
/// Convenience entry point for one-off downloads; batches drive
/// [`run`] directly with shared collaborators.
pub async fn download(task: &DownloadTask) -> Result<FileOutcome> {
    let client = create_http_client(HttpClientConfig {
        headers: task.headers.clone(),
        ..HttpClientConfig::default()
    })?;
    let display = ProgressDisplay::new(StyleOptions::default());
    let ctx = FileContext {
        client: &client,
        display: &display,
        batch_progress: None,
        max_segments: task.segments,
    };
    Ok(run(&ctx, task).await)
}

/// Runs the download state machine for one task to a terminal outcome.
pub(crate) async fn run(ctx: &FileContext<'_>, task: &DownloadTask) -> FileOutcome {
    let mut attempts = 0;
    loop {
        attempts += 1;
        match attempt(ctx, task).await {
            Ok(Completed::Done { path, size }) => {
                return FileOutcome::new(task.clone(), path, size, attempts, Status::Done);
            }
            Ok(Completed::AlreadyDownloaded { path, size }) => {
                return FileOutcome::new(
                    task.clone(),
                    path,
                    size,
                    attempts,
                    Status::Skipped("destination already matches the expected size".into()),
                );
            }
            Err(e @ Error::SizeMismatch { .. }) if attempts < MAX_FILE_ATTEMPTS => {
                warn!("{}: {}, retrying whole file", task.url, e);
            }
            Err(e) => {
                return FileOutcome::new(
                    task.clone(),
                    intended_destination(task),
                    0,
                    attempts,
                    Status::Failed(e.to_string()),
                );
            }
        }
    }
}

/// Best-guess destination for outcomes that never resolved metadata.
pub(crate) fn intended_destination(task: &DownloadTask) -> PathBuf {
    let name = task
        .filename
        .clone()
        .or_else(|| metadata::filename_from_url(&task.url))
        .unwrap_or_else(|| metadata::FALLBACK_FILENAME.to_string());
    task.directory.join(sanitize_filename(&name))
}

enum Completed {
    Done { path: PathBuf, size: u64 },
    AlreadyDownloaded { path: PathBuf, size: u64 },
}

async fn attempt(ctx: &FileContext<'_>, task: &DownloadTask) -> Result<Completed> {
    // Resolving.
    let target = metadata::resolve(ctx.client, &task.url, task.headers.as_ref()).await?;
    let name = sanitize_filename(task.filename.as_deref().unwrap_or(&target.filename));
    fs::create_dir_all(&task.directory).await?;
    let mut destination = task.directory.join(name);

    if task.overwrite {
        remove_if_exists(&destination).await?;
        segment::remove_parts(&destination)?;
    } else if target.total_size > 0 {
        if let Ok(meta) = fs::metadata(&destination).await {
            if meta.len() == target.total_size {
                debug!("{:?} already fully downloaded", destination);
                return Ok(Completed::AlreadyDownloaded {
                    path: destination,
                    size: meta.len(),
                });
            }
        }
    }

    // Planning. Part files on disk are the sole resume authority; stale
    // ones that can no longer be ranged are discarded.
    let resume_offsets = if target.segmentable() {
        segment::scan_parts(&destination)
    } else {
        segment::remove_parts(&destination)?;
        Vec::new()
    };

    if resume_offsets.is_empty() && !task.overwrite && destination.exists() {
        destination = disambiguate(&destination);
        debug!("destination taken, using {:?}", destination);
    } else if !resume_offsets.is_empty() {
        debug!(
            "found {} downloaded parts for {:?}, resuming",
            resume_offsets.len(),
            destination
        );
    }

    let segment_count = if target.segmentable() {
        task.segments.clamp(1, ctx.max_segments.max(1))
    } else {
        1
    };
    let segments = segment::plan(target.total_size, segment_count, &resume_offsets);
    let resumed: u64 = resume_offsets.iter().sum();
    let expected_remaining = target.total_size.saturating_sub(resumed);

    // Fetching: one worker per segment, all concurrent, one funnel channel.
    let (tx, rx) = aggregator::channel();
    let bar = ctx.display.file_bar(target.total_size, resumed);
    let agg = tokio::spawn(aggregator::run(
        rx,
        expected_remaining,
        bar.clone(),
        ctx.batch_progress.clone(),
    ));

    let parts: Vec<PathBuf> = segments
        .iter()
        .map(|s| segment::part_path(&destination, s.index))
        .collect();
    let results = join_all(segments.iter().zip(&parts).map(|(s, part)| {
        fetch_segment(
            ctx.client,
            &task.url,
            task.headers.as_ref(),
            s,
            part,
            &tx,
        )
    }))
    .await;

    let _ = tx.send(ProgressEvent::Finished);
    drop(tx);
    let _ = agg.await;
    ctx.display.finish_file(bar);

    // All workers must have succeeded; failed segments keep their partial
    // part files on disk for a later resume.
    for result in results {
        result?;
    }

    // Assembling, then verifying.
    let size = assemble::assemble(&destination, &parts).await?;
    if target.total_size > 0 && size != target.total_size {
        fs::remove_file(&destination).await?;
        return Err(Error::SizeMismatch {
            expected: target.total_size,
            actual: size,
        });
    }

    Ok(Completed::Done {
        path: destination,
        size,
    })
}

async fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Picks `name(1).ext`, `name(2).ext`, … until a free path is found.
fn disambiguate(path: &Path) -> PathBuf {
    let parent = path.parent().unwrap_or_else(|| Path::new(""));
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path.extension().map(|e| e.to_string_lossy().into_owned());

    for i in 1.. {
        let name = match &ext {
            Some(ext) => format!("{}({}).{}", stem, i, ext),
            None => format!("{}({})", stem, i),
        };
        let candidate = parent.join(name);
        if !candidate.exists() {
            return candidate;
        }
    }
    unreachable!("ran out of collision suffixes");
}
