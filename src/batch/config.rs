//! Configuration structure and defaults for batch runs.

use crate::progress::StyleOptions;

use reqwest::{header::HeaderMap, Proxy};
use std::time::Duration;

/// Configuration for a [`Batch`](super::Batch).
///
/// Two nested bounds shape the concurrency: `max_concurrent_files` caps
/// the simultaneously active file downloads, `max_segments` caps the
/// concurrent byte-range workers within each one.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Number of files downloading at once.
    pub max_concurrent_files: usize,
    /// Upper bound on concurrent segments per file.
    pub max_segments: usize,
    /// Concurrency of the metadata probe phase.
    pub probe_concurrency: usize,
    /// Transport-level retries per request.
    pub retries: u32,
    /// Headers applied to every request of the batch.
    pub headers: Option<HeaderMap>,
    /// Optional proxy.
    pub proxy: Option<Proxy>,
    /// Accept invalid TLS certificates (defaults to `true`).
    pub accept_invalid_certs: bool,
    /// Connection establishment timeout.
    pub connect_timeout: Duration,
    /// Progress bar styling.
    pub style_options: StyleOptions,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_concurrent_files: 4,
            max_segments: 4,
            probe_concurrency: 4,
            retries: 3,
            headers: None,
            proxy: None,
            accept_invalid_certs: true,
            connect_timeout: Duration::from_secs(30),
            style_options: StyleOptions::default(),
        }
    }
}
