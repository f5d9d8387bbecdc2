//! HTTP client functionality.
//!
//! All requests issued by the crate, metadata probes and segment fetches
//! alike, go through a single [`ClientWithMiddleware`] built here. The
//! middleware stack provides transparent retries with exponential backoff
//! for transient network failures and request tracing.
//!
//! [`ClientWithMiddleware`]: reqwest_middleware::ClientWithMiddleware

pub mod client;

pub use client::{create_http_client, HttpClientConfig};
