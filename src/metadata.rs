//! Metadata resolution: one HEAD probe per task.
//!
//! The probe determines everything planning needs: the total size in bytes
//! (0 when the server does not announce one, meaning the file can neither be
//! segmented nor resumed), whether byte ranges are accepted, and a candidate
//! file name. Name precedence: `Content-Disposition`, then the last URL path
//! segment (percent-decoded), then a synthetic fallback.

use crate::error::{Error, Result};

use reqwest::{
    header::{HeaderMap, ACCEPT_RANGES, CONTENT_DISPOSITION, CONTENT_LENGTH},
    Url,
};
use reqwest_middleware::ClientWithMiddleware;
use tracing::debug;

/// Name used when neither the server nor the URL provides one.
pub const FALLBACK_FILENAME: &str = "download.bin";

/// What the metadata probe learned about a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// Candidate file name, not yet sanitized.
    pub filename: String,
    /// Total size in bytes; 0 means unknown.
    pub total_size: u64,
    /// Whether the server accepts `Range: bytes=` requests.
    pub supports_range: bool,
}

impl ResolvedTarget {
    /// Whether the resource can be split into concurrent segments.
    pub fn segmentable(&self) -> bool {
        self.supports_range && self.total_size > 0
    }
}

/// Issues the metadata probe for `url`.
///
/// Transient network failures are retried by the client middleware; once
/// that budget is spent, or the server answers with a non-success status,
/// the task is reported as [`Error::MetadataUnavailable`] so the caller can
/// skip it without aborting a batch.
pub async fn resolve(
    client: &ClientWithMiddleware,
    url: &Url,
    headers: Option<&HeaderMap>,
) -> Result<ResolvedTarget> {
    let mut req = client.head(url.clone());
    if let Some(h) = headers {
        req = req.headers(h.clone());
    }

    let unavailable = |reason: String| Error::MetadataUnavailable {
        url: url.to_string(),
        reason,
    };

    let res = req.send().await.map_err(|e| unavailable(e.to_string()))?;
    let res = res
        .error_for_status()
        .map_err(|e| unavailable(e.to_string()))?;
    let headers = res.headers();

    let total_size = headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(0);

    let supports_range = headers
        .get(ACCEPT_RANGES)
        .and_then(|v| v.to_str().ok())
        .map(|v| v == "bytes")
        .unwrap_or(false);

    let filename = headers
        .get(CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .and_then(disposition_filename)
        .or_else(|| filename_from_url(url))
        .unwrap_or_else(|| FALLBACK_FILENAME.to_string());

    debug!(
        "resolved {}: {} bytes, ranges={}, name={:?}",
        url, total_size, supports_range, filename
    );

    Ok(ResolvedTarget {
        filename,
        total_size,
        supports_range,
    })
}

/// Extracts a file name from a `Content-Disposition` header value.
///
/// Handles the plain `filename=` parameter, quoted or not, and the RFC 5987
/// `filename*=charset''value` form.
pub(crate) fn disposition_filename(value: &str) -> Option<String> {
    for param in value.split(';') {
        let param = param.trim();
        let Some((key, raw)) = param.split_once('=') else {
            continue;
        };
        match key.trim() {
            "filename*" => {
                // charset''percent-encoded-value
                let encoded = raw.rsplit("''").next().unwrap_or(raw);
                let name = percent_decode(encoded);
                if !name.is_empty() {
                    return Some(name);
                }
            }
            "filename" => {
                let name = raw.trim().trim_matches('"');
                if !name.is_empty() {
                    return Some(name.to_string());
                }
            }
            _ => continue,
        }
    }
    None
}

/// Derives a file name from the last non-empty URL path segment.
pub(crate) fn filename_from_url(url: &Url) -> Option<String> {
    url.path_segments()?
        .filter(|s| !s.is_empty())
        .next_back()
        .map(percent_decode)
        .filter(|s| !s.is_empty())
}

fn percent_decode(input: &str) -> String {
    form_urlencoded::parse(input.as_bytes())
        .map(|(key, val)| [key, val].concat())
        .collect()
}

/// Strips characters that are unusable in file names on common filesystems.
///
/// An empty result falls back to [`FALLBACK_FILENAME`].
pub(crate) fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|'))
        .filter(|c| !c.is_control())
        .collect();
    let cleaned = cleaned.trim().to_string();
    if cleaned.is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disposition_plain() {
        assert_eq!(
            disposition_filename("attachment; filename=report.pdf"),
            Some("report.pdf".to_string())
        );
    }

    #[test]
    fn test_disposition_quoted() {
        assert_eq!(
            disposition_filename("attachment; filename=\"a b.zip\""),
            Some("a b.zip".to_string())
        );
    }

    #[test]
    fn test_disposition_extended() {
        assert_eq!(
            disposition_filename("attachment; filename*=UTF-8''caf%C3%A9.png"),
            Some("café.png".to_string())
        );
    }

    #[test]
    fn test_disposition_missing() {
        assert_eq!(disposition_filename("inline"), None);
        assert_eq!(disposition_filename("attachment; filename="), None);
    }

    #[test]
    fn test_filename_from_url() {
        let url = Url::parse("https://example.com/books/chapter%201.epub").unwrap();
        assert_eq!(filename_from_url(&url), Some("chapter 1.epub".to_string()));
    }

    #[test]
    fn test_filename_from_url_trailing_slash() {
        let url = Url::parse("https://example.com/books/").unwrap();
        assert_eq!(filename_from_url(&url), Some("books".to_string()));
    }

    #[test]
    fn test_filename_from_url_empty_path() {
        let url = Url::parse("https://example.com/").unwrap();
        assert_eq!(filename_from_url(&url), None);
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize_filename("a/b\\c:d*e?f\"g<h>i|j"), "abcdefghij");
        assert_eq!(sanitize_filename("  plain.txt "), "plain.txt");
        assert_eq!(sanitize_filename("///"), FALLBACK_FILENAME);
    }

    #[test]
    fn test_segmentable() {
        let target = ResolvedTarget {
            filename: "x".into(),
            total_size: 10,
            supports_range: true,
        };
        assert!(target.segmentable());
        assert!(!ResolvedTarget {
            total_size: 0,
            ..target.clone()
        }
        .segmentable());
        assert!(!ResolvedTarget {
            supports_range: false,
            ..target
        }
        .segmentable());
    }
}
