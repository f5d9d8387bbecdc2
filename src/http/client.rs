//! HTTP client setup and middleware configuration.
//!
//! The retry middleware is the transport-level retry budget for the whole
//! crate: both metadata probes and segment fetches rely on it to absorb
//! transient connection failures before escalating.
//!
//! # Examples
//!
//! ```rust
//! use partwise::http::{create_http_client, HttpClientConfig};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = create_http_client(HttpClientConfig::default())?;
//! # Ok(())
//! # }
//! ```

use reqwest::{header::HeaderMap, Proxy};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use reqwest_tracing::TracingMiddleware;
use std::time::Duration;

/// Configuration for HTTP client setup.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Number of transport-level retries for failed requests.
    pub retries: u32,
    /// Optional proxy configuration.
    pub proxy: Option<Proxy>,
    /// Default headers to include with all requests.
    pub headers: Option<HeaderMap>,
    /// Accept self-issued or otherwise invalid TLS certificates.
    ///
    /// Defaults to `true`: the file mirrors this crate targets routinely
    /// serve misconfigured certificates. Set to `false` to enforce
    /// validation.
    pub accept_invalid_certs: bool,
    /// Connection establishment timeout.
    pub connect_timeout: Duration,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            retries: 3,
            proxy: None,
            headers: None,
            accept_invalid_certs: true,
            connect_timeout: Duration::from_secs(30),
        }
    }
}

/// Creates an HTTP client with middleware configuration.
///
/// The client carries tracing middleware, retry middleware with exponential
/// backoff, redirect following, and the TLS/timeout/proxy/header settings
/// from `config`.
pub fn create_http_client(
    config: HttpClientConfig,
) -> Result<ClientWithMiddleware, reqwest::Error> {
    let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.retries);

    let mut inner_client_builder = reqwest::Client::builder()
        .danger_accept_invalid_certs(config.accept_invalid_certs)
        .connect_timeout(config.connect_timeout);

    if let Some(proxy) = config.proxy {
        inner_client_builder = inner_client_builder.proxy(proxy);
    }

    if let Some(headers) = config.headers {
        inner_client_builder = inner_client_builder.default_headers(headers);
    }

    let inner_client = inner_client_builder.build()?;

    let client = ClientBuilder::new(inner_client)
        .with(TracingMiddleware::default())
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build();

    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

    #[test]
    fn test_default_config() {
        let config = HttpClientConfig::default();
        assert_eq!(config.retries, 3);
        assert!(config.proxy.is_none());
        assert!(config.headers.is_none());
        assert!(config.accept_invalid_certs);
        assert_eq!(config.connect_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_create_http_client_default() {
        let client = create_http_client(HttpClientConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_create_http_client_with_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("partwise-test"));

        let config = HttpClientConfig {
            retries: 5,
            headers: Some(headers),
            ..HttpClientConfig::default()
        };

        let client = create_http_client(config);
        assert!(client.is_ok());
    }

    #[test]
    fn test_create_http_client_strict_tls() {
        let config = HttpClientConfig {
            accept_invalid_certs: false,
            ..HttpClientConfig::default()
        };
        assert!(create_http_client(config).is_ok());
    }
}
