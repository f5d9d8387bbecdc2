use partwise::segment::{self, Segment};
use partwise::task::DownloadTask;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// Common test constants
pub const TEST_URL: &str = "https://example.com/file.zip";

/// Creates a temporary directory for testing purposes
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Creates deterministic test content of the given size
pub fn create_test_content(size: usize) -> Vec<u8> {
    (0..size).map(|i| (i % 256) as u8).collect()
}

/// Creates a test task for the common test URL
pub fn create_test_task() -> DownloadTask {
    DownloadTask::try_from(TEST_URL).expect("Failed to create test task")
}

/// Writes the slice of `content` covered by each segment into the part
/// files of `destination`, returning the part paths in index order.
pub fn write_parts(destination: &Path, segments: &[Segment], content: &[u8]) -> Vec<PathBuf> {
    segments
        .iter()
        .map(|s| {
            let part = segment::part_path(destination, s.index);
            fs::write(&part, &content[s.start as usize..s.end as usize])
                .expect("Failed to write part file");
            part
        })
        .collect()
}

/// Asserts that a file holds exactly `expected`
pub fn assert_file_content(path: &Path, expected: &[u8]) {
    let actual = fs::read(path).expect("Failed to read file");
    assert_eq!(actual, expected, "content mismatch at {:?}", path);
}

/// Asserts that a file has the expected size
pub fn assert_file_size(path: &Path, expected_size: u64) {
    let metadata = fs::metadata(path).expect("Failed to get file metadata");
    assert_eq!(
        metadata.len(),
        expected_size,
        "File size mismatch at path: {:?}",
        path
    );
}
