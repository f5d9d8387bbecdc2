//! The [`DownloadTask`] struct: one URL bound for one destination.
//!
//! # Examples
//!
//! ```rust
//! use partwise::task::DownloadTask;
//! use std::path::PathBuf;
//!
//! let task = DownloadTask::try_from("https://example.com/archive.zip")?
//!     .directory(PathBuf::from("downloads"))
//!     .segments(8);
//! # Ok::<(), partwise::Error>(())
//! ```

use crate::error::Error;

use reqwest::{header::HeaderMap, Url};
use std::convert::TryFrom;
use std::path::PathBuf;

/// Default number of byte-range segments per file.
pub const DEFAULT_SEGMENTS: usize = 4;

/// Represents a file to be downloaded.
///
/// The filename is optional: when absent, it is derived during metadata
/// resolution from the `Content-Disposition` header or the URL path.
#[derive(Debug, Clone)]
pub struct DownloadTask {
    /// URL of the file to download.
    pub url: Url,
    /// Directory where the file is saved.
    pub directory: PathBuf,
    /// Explicit file name, overriding server- and URL-derived names.
    pub filename: Option<String>,
    /// Extra headers attached to every request for this task.
    pub headers: Option<HeaderMap>,
    /// Requested number of concurrent byte-range segments.
    pub segments: usize,
    /// Replace an existing destination instead of resuming or renaming.
    pub overwrite: bool,
}

impl DownloadTask {
    /// Creates a new [`DownloadTask`] saving into the current directory.
    pub fn new(url: &Url) -> Self {
        Self {
            url: url.clone(),
            directory: PathBuf::from("."),
            filename: None,
            headers: None,
            segments: DEFAULT_SEGMENTS,
            overwrite: false,
        }
    }

    /// Sets the destination directory.
    pub fn directory(mut self, directory: PathBuf) -> Self {
        self.directory = directory;
        self
    }

    /// Sets an explicit file name.
    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Sets extra headers for this task.
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = Some(headers);
        self
    }

    /// Sets the requested segment count. Values below 1 are clamped to 1.
    pub fn segments(mut self, segments: usize) -> Self {
        self.segments = segments.max(1);
        self
    }

    /// Sets the overwrite policy.
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

impl TryFrom<&Url> for DownloadTask {
    type Error = Error;

    fn try_from(value: &Url) -> Result<Self, Self::Error> {
        if !matches!(value.scheme(), "http" | "https") {
            return Err(Error::InvalidUrl(format!(
                "the url \"{}\" is not an http(s) url",
                value
            )));
        }
        Ok(DownloadTask::new(value))
    }
}

impl TryFrom<&str> for DownloadTask {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Url::parse(value)
            .map_err(|e| Error::InvalidUrl(format!("the url \"{}\" cannot be parsed: {}", value, e)))
            .and_then(|u| DownloadTask::try_from(&u))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_from_str() {
        let task = DownloadTask::try_from("https://example.com/file.zip").unwrap();
        assert_eq!(task.url.as_str(), "https://example.com/file.zip");
        assert_eq!(task.segments, DEFAULT_SEGMENTS);
        assert!(!task.overwrite);
        assert!(task.filename.is_none());
    }

    #[test]
    fn test_try_from_rejects_garbage() {
        assert!(DownloadTask::try_from("not a url").is_err());
        assert!(DownloadTask::try_from("ftp://example.com/file.zip").is_err());
    }

    #[test]
    fn test_segments_clamped() {
        let task = DownloadTask::try_from("https://example.com/a")
            .unwrap()
            .segments(0);
        assert_eq!(task.segments, 1);
    }
}
