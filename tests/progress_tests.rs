//! Tests for the progress aggregation funnel.

use indicatif::ProgressBar;
use partwise::progress::{aggregator, ProgressEvent};

mod common;

#[tokio::test]
async fn test_aggregator_terminates_at_expected_total() {
    let (tx, rx) = aggregator::channel();
    let handle = tokio::spawn(aggregator::run(rx, 100, ProgressBar::hidden(), None));

    for _ in 0..4 {
        tx.send(ProgressEvent::Chunk {
            source: 0,
            bytes: 25,
        })
        .unwrap();
    }

    // No sentinel needed: the total is reached.
    assert_eq!(handle.await.unwrap(), 100);
}

#[tokio::test]
async fn test_aggregator_terminates_on_sentinel_before_total() {
    let (tx, rx) = aggregator::channel();
    let handle = tokio::spawn(aggregator::run(rx, 1_000_000, ProgressBar::hidden(), None));

    tx.send(ProgressEvent::Chunk {
        source: 1,
        bytes: 10,
    })
    .unwrap();
    tx.send(ProgressEvent::Finished).unwrap();

    assert_eq!(handle.await.unwrap(), 10);
}

#[tokio::test]
async fn test_aggregator_unknown_total_needs_sentinel() {
    let (tx, rx) = aggregator::channel();
    let handle = tokio::spawn(aggregator::run(rx, 0, ProgressBar::hidden(), None));

    tx.send(ProgressEvent::Chunk {
        source: 0,
        bytes: 4096,
    })
    .unwrap();
    tx.send(ProgressEvent::Chunk {
        source: 1,
        bytes: 4096,
    })
    .unwrap();
    tx.send(ProgressEvent::Finished).unwrap();

    assert_eq!(handle.await.unwrap(), 8192);
}

#[tokio::test]
async fn test_aggregator_terminates_when_senders_drop() {
    let (tx, rx) = aggregator::channel();
    let handle = tokio::spawn(aggregator::run(rx, 50, ProgressBar::hidden(), None));

    tx.send(ProgressEvent::Chunk {
        source: 0,
        bytes: 20,
    })
    .unwrap();
    drop(tx);

    assert_eq!(handle.await.unwrap(), 20);
}

#[tokio::test]
async fn test_aggregator_forwards_to_parent() {
    let (parent_tx, parent_rx) = aggregator::channel();
    let parent = tokio::spawn(aggregator::run(parent_rx, 0, ProgressBar::hidden(), None));

    let (tx, rx) = aggregator::channel();
    let child = tokio::spawn(aggregator::run(
        rx,
        30,
        ProgressBar::hidden(),
        Some(parent_tx.clone()),
    ));

    tx.send(ProgressEvent::Chunk {
        source: 2,
        bytes: 30,
    })
    .unwrap();
    assert_eq!(child.await.unwrap(), 30);

    parent_tx.send(ProgressEvent::Finished).unwrap();
    assert_eq!(parent.await.unwrap(), 30);
}

#[tokio::test]
async fn test_aggregator_drives_bar_position() {
    let bar = ProgressBar::hidden();
    let (tx, rx) = aggregator::channel();
    let handle = tokio::spawn(aggregator::run(rx, 64, bar.clone(), None));

    tx.send(ProgressEvent::Chunk {
        source: 0,
        bytes: 64,
    })
    .unwrap();
    handle.await.unwrap();

    assert_eq!(bar.position(), 64);
}
