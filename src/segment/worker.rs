//! Streams one segment into its part file.
//!
//! Writes are append-only: bytes that reached the disk are never discarded,
//! so a failed worker leaves its part file resumable by a later planning
//! pass. Progress is reported through the per-file funnel channel after
//! every received chunk.

use crate::error::{Error, Result};
use crate::progress::aggregator::{ProgressEvent, ProgressSender};
use crate::segment::Segment;

use futures::StreamExt;
use reqwest::{
    header::{HeaderMap, RANGE},
    Url,
};
use reqwest_middleware::ClientWithMiddleware;
use std::path::Path;
use tokio::{fs::OpenOptions, io::AsyncWriteExt};
use tracing::{debug, warn};

/// Request attempts per segment before giving up.
pub(crate) const SEGMENT_ATTEMPTS: u32 = 3;

/// Fetches `segment` of `url`, appending to the part file at `part`.
///
/// For a ranged segment the request covers
/// `[start + already_written, end - 1]`; the degenerate whole-resource
/// segment is fetched without a `Range` header. Connection-level failures
/// (on send, or mid-stream when the range can be recomputed) are retried up
/// to [`SEGMENT_ATTEMPTS`] times on top of the client middleware's own
/// transient retries. A non-success status after headers is fatal for the
/// segment and is not retried.
///
/// Returns the number of bytes written by this call.
pub(crate) async fn fetch_segment(
    client: &ClientWithMiddleware,
    url: &Url,
    headers: Option<&HeaderMap>,
    segment: &Segment,
    part: &Path,
    progress: &ProgressSender,
) -> Result<u64> {
    if segment.is_complete() {
        debug!("segment {} already complete, skipping", segment.index);
        return Ok(0);
    }

    let failed = |reason: String| Error::SegmentFailed {
        index: segment.index,
        reason,
    };

    let mut written = segment.already;
    let mut attempt = 0;
    loop {
        attempt += 1;

        let mut req = client.get(url.clone());
        if let Some(h) = headers {
            req = req.headers(h.clone());
        }
        if segment.is_ranged() {
            req = req.header(
                RANGE,
                format!("bytes={}-{}", segment.start + written, segment.end - 1),
            );
        }

        let res = match req.send().await {
            Ok(res) => res,
            Err(e) if attempt < SEGMENT_ATTEMPTS => {
                warn!("segment {} request failed, retrying: {}", segment.index, e);
                continue;
            }
            Err(e) => return Err(failed(e.to_string())),
        };

        // A refusal after headers (403, 404, 416, ...) will not improve on
        // retry; propagate immediately.
        if let Err(e) = res.error_for_status_ref() {
            return Err(failed(e.to_string()));
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(part)
            .await?;

        let mut stream = res.bytes_stream();
        let mut interrupted = None;
        while let Some(item) = stream.next().await {
            match item {
                Ok(chunk) => {
                    file.write_all(&chunk).await?;
                    written += chunk.len() as u64;
                    let _ = progress.send(ProgressEvent::Chunk {
                        source: segment.index,
                        bytes: chunk.len() as u64,
                    });
                }
                Err(e) => {
                    interrupted = Some(e);
                    break;
                }
            }
        }
        file.flush().await?;

        match interrupted {
            None => return Ok(written - segment.already),
            // Reconnecting mid-body only works when a range can skip the
            // bytes already on disk.
            Some(e) if segment.is_ranged() && attempt < SEGMENT_ATTEMPTS => {
                warn!(
                    "segment {} interrupted at {} bytes, retrying: {}",
                    segment.index, written, e
                );
            }
            Some(e) => return Err(failed(e.to_string())),
        }
    }
}
