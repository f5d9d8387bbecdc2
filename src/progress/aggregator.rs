//! Progress event aggregation.
//!
//! Each aggregation scope (one file, one batch) owns a funnel channel: any
//! number of producers send [`ProgressEvent::Chunk`]s, a single aggregator
//! task drains them. The aggregator is purely additive and not
//! authoritative for correctness; final sizes are verified after assembly.
//!
//! Termination is guaranteed three ways: the expected byte total is
//! reached, a [`ProgressEvent::Finished`] sentinel arrives, or every sender
//! is dropped. The sentinel matters when the expected total is an estimate
//! that is never exactly reached.

use indicatif::ProgressBar;
use tokio::sync::mpsc;

/// A progress report flowing from workers toward an aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressEvent {
    /// `bytes` new bytes written by the producer identified by `source`.
    Chunk { source: usize, bytes: u64 },
    /// Forced completion: the scope is done regardless of bytes observed.
    Finished,
}

/// Sending half of a progress funnel channel.
pub type ProgressSender = mpsc::UnboundedSender<ProgressEvent>;

/// Receiving half of a progress funnel channel.
pub type ProgressReceiver = mpsc::UnboundedReceiver<ProgressEvent>;

/// Creates the funnel channel for one aggregation scope.
pub fn channel() -> (ProgressSender, ProgressReceiver) {
    mpsc::unbounded_channel()
}

/// Drains `rx`, advancing `bar` and forwarding chunks to `parent`.
///
/// Blocks until `expected_total` bytes were observed, a
/// [`ProgressEvent::Finished`] sentinel arrives, or all senders are gone.
/// `expected_total == 0` means unknown: only the sentinel (or sender drop)
/// terminates. Returns the number of bytes observed.
pub async fn run(
    mut rx: ProgressReceiver,
    expected_total: u64,
    bar: ProgressBar,
    parent: Option<ProgressSender>,
) -> u64 {
    let mut observed: u64 = 0;
    while expected_total == 0 || observed < expected_total {
        match rx.recv().await {
            Some(ProgressEvent::Chunk { source, bytes }) => {
                observed += bytes;
                bar.inc(bytes);
                if let Some(parent) = &parent {
                    let _ = parent.send(ProgressEvent::Chunk { source, bytes });
                }
            }
            Some(ProgressEvent::Finished) | None => break,
        }
    }
    observed
}
