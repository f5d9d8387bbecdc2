//! Byte-range segmentation and part files.
//!
//! [`plan`] carves `[0, total_size)` into contiguous, non-overlapping
//! segments; [`worker`] streams one segment into its part file. Part files
//! live next to the destination as `<destination>.part0`, `.part1`, … and
//! their on-disk sizes are the sole source of truth for resumption.

pub mod worker;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A contiguous byte range of a remote resource, downloaded independently
/// into its own part file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// 0-based position among the segments of one file.
    pub index: usize,
    /// First byte of the range.
    pub start: u64,
    /// One past the last byte of the range. 0 marks the degenerate
    /// "whole resource, unknown length" segment, fetched without a
    /// `Range` header.
    pub end: u64,
    /// Bytes already present in the part file from a prior attempt.
    pub already: u64,
}

impl Segment {
    /// Planned length of the range.
    pub fn planned_len(&self) -> u64 {
        self.end - self.start
    }

    /// Bytes still to fetch.
    pub fn remaining(&self) -> u64 {
        self.planned_len().saturating_sub(self.already)
    }

    /// Whether the range is a real byte range (vs. the whole resource).
    pub fn is_ranged(&self) -> bool {
        self.end > 0
    }

    /// Whether the part file already holds the full range.
    pub fn is_complete(&self) -> bool {
        self.is_ranged() && self.remaining() == 0
    }
}

/// Plans the segments for one file. Pure function, no I/O.
///
/// With empty `resume_offsets`, produces `segment_count` ranges of
/// `total_size / segment_count` bytes each, the last one extended to absorb
/// the integer-division remainder so the ranges partition `[0, total_size)`
/// exactly. Non-empty `resume_offsets` (one entry per part file found on
/// disk, in part order) override the requested count so the partition
/// matches the prior run, and pre-fill each segment's `already` bytes.
///
/// `total_size == 0` or `segment_count == 0` yields the single degenerate
/// segment `(0, 0)`.
pub fn plan(total_size: u64, segment_count: usize, resume_offsets: &[u64]) -> Vec<Segment> {
    if total_size == 0 || segment_count == 0 {
        return vec![Segment {
            index: 0,
            start: 0,
            end: 0,
            already: 0,
        }];
    }

    let count = if resume_offsets.is_empty() {
        segment_count
    } else {
        resume_offsets.len()
    };
    // Never more segments than bytes.
    let count = (count as u64).clamp(1, total_size) as usize;
    let part = total_size / count as u64;

    (0..count)
        .map(|i| Segment {
            index: i,
            start: part * i as u64,
            end: if i == count - 1 {
                total_size
            } else {
                part * (i as u64 + 1)
            },
            already: resume_offsets.get(i).copied().unwrap_or(0),
        })
        .collect()
}

/// Path of the part file for segment `index` of `destination`.
pub fn part_path(destination: &Path, index: usize) -> PathBuf {
    let mut name = destination.as_os_str().to_owned();
    name.push(format!(".part{}", index));
    PathBuf::from(name)
}

/// Sizes of the part files already on disk for `destination`, in part
/// order. Stops at the first missing index, so the result length is the
/// partition count of the prior run.
pub fn scan_parts(destination: &Path) -> Vec<u64> {
    let mut sizes = Vec::new();
    for index in 0.. {
        match fs::metadata(part_path(destination, index)) {
            Ok(meta) => sizes.push(meta.len()),
            Err(_) => break,
        }
    }
    sizes
}

/// Removes any part files of `destination`. Used when stale parts cannot be
/// resumed (range support lost, unknown size, or overwrite requested).
pub(crate) fn remove_parts(destination: &Path) -> io::Result<()> {
    for index in 0.. {
        let part = part_path(destination, index);
        if !part.exists() {
            break;
        }
        fs::remove_file(part)?;
    }
    Ok(())
}
