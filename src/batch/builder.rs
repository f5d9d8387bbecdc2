//! Builder pattern for creating [`Batch`] instances.
//!
//! ```rust
//! use partwise::batch::BatchBuilder;
//!
//! let batch = BatchBuilder::new()
//!     .max_concurrent_files(2)
//!     .max_segments(8)
//!     .retries(5)
//!     .build();
//! ```

use super::{config::BatchConfig, orchestrator::Batch};
use crate::progress::StyleOptions;

use reqwest::{
    header::{HeaderMap, HeaderValue, IntoHeaderName},
    Proxy,
};
use std::time::Duration;

/// A builder used to create a [`Batch`].
#[derive(Default)]
pub struct BatchBuilder {
    config: BatchConfig,
}

impl BatchBuilder {
    /// Creates a builder with the default options.
    pub fn new() -> Self {
        BatchBuilder::default()
    }

    /// Convenience function to hide the progress bars.
    pub fn hidden() -> Self {
        let mut builder = BatchBuilder::default();
        builder.config.style_options = StyleOptions::hidden();
        builder
    }

    /// Set the number of files downloading at once.
    pub fn max_concurrent_files(mut self, max_concurrent_files: usize) -> Self {
        self.config.max_concurrent_files = max_concurrent_files.max(1);
        self
    }

    /// Set the upper bound on concurrent segments per file.
    pub fn max_segments(mut self, max_segments: usize) -> Self {
        self.config.max_segments = max_segments.max(1);
        self
    }

    /// Set the concurrency of the metadata probe phase.
    pub fn probe_concurrency(mut self, probe_concurrency: usize) -> Self {
        self.config.probe_concurrency = probe_concurrency.max(1);
        self
    }

    /// Set the number of transport-level retries per request.
    pub fn retries(mut self, retries: u32) -> Self {
        self.config.retries = retries;
        self
    }

    /// Set the proxy for all requests.
    pub fn proxy(mut self, proxy: Proxy) -> Self {
        self.config.proxy = Some(proxy);
        self
    }

    /// Enforce TLS certificate validation instead of the permissive
    /// default.
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.config.accept_invalid_certs = accept;
        self
    }

    /// Set the connection establishment timeout.
    pub fn connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.config.connect_timeout = connect_timeout;
        self
    }

    /// Set the progress bar styling.
    pub fn style_options(mut self, style_options: StyleOptions) -> Self {
        self.config.style_options = style_options;
        self
    }

    fn new_header(&self) -> HeaderMap {
        match self.config.headers {
            Some(ref h) => h.to_owned(),
            _ => HeaderMap::new(),
        }
    }

    /// Add http headers applied to every request of the batch.
    ///
    /// Can be called multiple times; all maps are merged into one.
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        let mut new = self.new_header();
        new.extend(headers);
        self.config.headers = Some(new);
        self
    }

    /// Add a single http header.
    pub fn header<K: IntoHeaderName>(mut self, name: K, value: HeaderValue) -> Self {
        let mut new = self.new_header();
        new.insert(name, value);
        self.config.headers = Some(new);
        self
    }

    /// Create the [`Batch`] with the specified options.
    pub fn build(self) -> Batch {
        Batch::new(self.config)
    }
}
