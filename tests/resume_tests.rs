//! End-to-end resume flow over the filesystem: partial part files from an
//! interrupted run drive a second plan that fetches only what is missing.

use partwise::segment::{self, Segment};

use std::fs::OpenOptions;
use std::io::Write;

mod common;
use common::helpers::*;

#[test]
fn test_scan_reflects_interrupted_run() {
    let dir = create_temp_dir();
    let dest = dir.path().join("file.bin");
    let content = create_test_content(10_000);

    // First run: four segments, only the first two made it to disk fully,
    // the third partially.
    let segments = segment::plan(content.len() as u64, 4, &[]);
    for s in &segments[..2] {
        std::fs::write(
            segment::part_path(&dest, s.index),
            &content[s.start as usize..s.end as usize],
        )
        .unwrap();
    }
    let third = &segments[2];
    std::fs::write(
        segment::part_path(&dest, third.index),
        &content[third.start as usize..(third.start + 100) as usize],
    )
    .unwrap();

    let offsets = segment::scan_parts(&dest);
    assert_eq!(offsets, vec![2_500, 2_500, 100]);
}

#[tokio::test]
async fn test_resumed_plan_completes_to_identical_content() {
    let dir = create_temp_dir();
    let dest = dir.path().join("file.bin");
    let content = create_test_content(10_000);
    let total = content.len() as u64;

    // Interrupted run: three part files at uneven progress.
    let first = segment::plan(total, 3, &[]);
    let progress = [first[0].planned_len(), 1_000, 0];
    for (s, done) in first.iter().zip(progress) {
        std::fs::write(
            segment::part_path(&dest, s.index),
            &content[s.start as usize..(s.start + done) as usize],
        )
        .unwrap();
    }

    // Second run resumes from the scan; the requested count is overridden
    // by the number of parts on disk.
    let offsets = segment::scan_parts(&dest);
    let resumed = segment::plan(total, 8, &offsets);
    assert_eq!(resumed.len(), 3);
    assert!(resumed[0].is_complete());

    let remaining: u64 = resumed.iter().map(Segment::remaining).sum();
    assert_eq!(remaining, total - progress.iter().sum::<u64>());

    // Simulate the workers: append exactly the missing tail of each
    // segment to its part file.
    let mut parts = Vec::new();
    for s in &resumed {
        let part = segment::part_path(&dest, s.index);
        if !s.is_complete() {
            let from = (s.start + s.already) as usize;
            let mut file = OpenOptions::new().append(true).open(&part).unwrap();
            file.write_all(&content[from..s.end as usize]).unwrap();
        }
        parts.push(part);
    }

    let size = partwise::assemble::assemble(&dest, &parts).await.unwrap();
    assert_eq!(size, total);
    assert_file_content(&dest, &content);
    assert!(segment::scan_parts(&dest).is_empty());
}
