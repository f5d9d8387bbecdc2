//! The failure ledger: persisted record of failed downloads.
//!
//! A batch run never raises on a per-file failure; it returns a
//! [`FailureLedger`] instead. Saved to disk, the ledger re-seeds a later
//! invocation that retries only the failed subset, with attempt counts
//! accumulating across runs.
//!
//! On-disk format, line-oriented and versioned:
//!
//! ```text
//! partwise-ledger/1
//! 3<TAB>https://example.com/a.zip<TAB>downloads/a.zip
//! ```

use crate::error::{Error, Result};
use crate::task::DownloadTask;

use reqwest::Url;
use std::fs;
use std::path::{Path, PathBuf};

/// Version header, first line of every ledger file.
pub const LEDGER_VERSION: &str = "partwise-ledger/1";

/// One failed download: enough to retry it later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureRecord {
    /// Source URL.
    pub url: String,
    /// Intended destination path.
    pub destination: PathBuf,
    /// Whole-file attempts consumed so far, across runs.
    pub attempts: u32,
}

/// Collects [`FailureRecord`]s for one batch run.
#[derive(Debug, Clone, Default)]
pub struct FailureLedger {
    records: Vec<FailureRecord>,
}

impl FailureLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no failures were recorded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of recorded failures.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// The recorded failures.
    pub fn records(&self) -> &[FailureRecord] {
        &self.records
    }

    /// Records a failure. A repeated `(url, destination)` pair accumulates
    /// its attempt count instead of duplicating the record.
    pub fn record(&mut self, url: &str, destination: &Path, attempts: u32) {
        if let Some(existing) = self
            .records
            .iter_mut()
            .find(|r| r.url == url && r.destination == destination)
        {
            existing.attempts += attempts;
        } else {
            self.records.push(FailureRecord {
                url: url.to_string(),
                destination: destination.to_path_buf(),
                attempts,
            });
        }
    }

    /// Adds the attempt counts of `prior` to matching records, so a retry
    /// run carries the history of the runs before it.
    pub fn absorb_attempts(&mut self, prior: &FailureLedger) {
        for record in &mut self.records {
            if let Some(p) = prior
                .records
                .iter()
                .find(|p| p.url == record.url && p.destination == record.destination)
            {
                record.attempts += p.attempts;
            }
        }
    }

    /// Rebuilds a task list identical in shape to a fresh submission.
    pub fn tasks(&self) -> Result<Vec<DownloadTask>> {
        self.records
            .iter()
            .map(|record| {
                let url = Url::parse(&record.url).map_err(|e| {
                    Error::InvalidUrl(format!(
                        "ledger url \"{}\" cannot be parsed: {}",
                        record.url, e
                    ))
                })?;
                let mut task = DownloadTask::new(&url);
                if let Some(parent) = record.destination.parent() {
                    if !parent.as_os_str().is_empty() {
                        task = task.directory(parent.to_path_buf());
                    }
                }
                if let Some(name) = record.destination.file_name() {
                    task = task.filename(name.to_string_lossy());
                }
                Ok(task)
            })
            .collect()
    }

    /// Saves the ledger to `path`, overwriting any previous contents.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut out = String::from(LEDGER_VERSION);
        out.push('\n');
        for record in &self.records {
            out.push_str(&format!(
                "{}\t{}\t{}\n",
                record.attempts,
                record.url,
                record.destination.display()
            ));
        }
        fs::write(path, out)?;
        Ok(())
    }

    /// Loads a ledger from `path`.
    pub fn load(path: &Path) -> Result<FailureLedger> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Whether `content` starts with the ledger version header.
    pub fn sniff(content: &str) -> bool {
        content.lines().next().map(str::trim) == Some(LEDGER_VERSION)
    }

    fn parse(content: &str) -> Result<FailureLedger> {
        let mut lines = content.lines();
        match lines.next().map(str::trim) {
            Some(LEDGER_VERSION) => (),
            Some(other) => {
                return Err(Error::MalformedLedger(format!(
                    "unknown version line \"{}\"",
                    other
                )))
            }
            None => return Err(Error::MalformedLedger("empty file".into())),
        }

        let mut ledger = FailureLedger::new();
        for line in lines {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut fields = line.splitn(3, '\t');
            let (attempts, url, destination) = match (fields.next(), fields.next(), fields.next())
            {
                (Some(a), Some(u), Some(d)) => (a, u, d),
                _ => {
                    return Err(Error::MalformedLedger(format!(
                        "expected attempts<TAB>url<TAB>destination, got \"{}\"",
                        line
                    )))
                }
            };
            let attempts = attempts.parse::<u32>().map_err(|_| {
                Error::MalformedLedger(format!("bad attempt count \"{}\"", attempts))
            })?;
            ledger.record(url, Path::new(destination), attempts);
        }
        Ok(ledger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_accumulates_attempts() {
        let mut ledger = FailureLedger::new();
        ledger.record("https://example.com/a", Path::new("a"), 3);
        ledger.record("https://example.com/a", Path::new("a"), 2);
        ledger.record("https://example.com/b", Path::new("b"), 1);

        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.records()[0].attempts, 5);
    }

    #[test]
    fn test_absorb_attempts() {
        let mut prior = FailureLedger::new();
        prior.record("https://example.com/a", Path::new("a"), 3);
        prior.record("https://example.com/gone", Path::new("gone"), 9);

        let mut current = FailureLedger::new();
        current.record("https://example.com/a", Path::new("a"), 3);
        current.absorb_attempts(&prior);

        assert_eq!(current.len(), 1);
        assert_eq!(current.records()[0].attempts, 6);
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("failed.ledger");

        let mut ledger = FailureLedger::new();
        ledger.record(
            "https://example.com/a.zip",
            Path::new("downloads/a.zip"),
            3,
        );
        ledger.record("https://example.com/b.zip", Path::new("b.zip"), 1);
        ledger.save(&path).unwrap();

        let loaded = FailureLedger::load(&path).unwrap();
        assert_eq!(loaded.records(), ledger.records());
    }

    #[test]
    fn test_load_rejects_unknown_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("failed.ledger");
        fs::write(&path, "error\nhttps://example.com/a a\n").unwrap();
        assert!(matches!(
            FailureLedger::load(&path),
            Err(Error::MalformedLedger(_))
        ));
    }

    #[test]
    fn test_load_rejects_short_lines() {
        let content = format!("{}\n2\thttps://example.com/a\n", LEDGER_VERSION);
        assert!(matches!(
            FailureLedger::parse(&content),
            Err(Error::MalformedLedger(_))
        ));
    }

    #[test]
    fn test_sniff() {
        assert!(FailureLedger::sniff("partwise-ledger/1\n"));
        assert!(!FailureLedger::sniff("https://example.com/a\n"));
    }

    #[test]
    fn test_tasks_reconstruction() {
        let mut ledger = FailureLedger::new();
        ledger.record(
            "https://example.com/a.zip",
            Path::new("downloads/a.zip"),
            3,
        );
        ledger.record("https://example.com/b.zip", Path::new("b.zip"), 1);

        let tasks = ledger.tasks().unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].url.as_str(), "https://example.com/a.zip");
        assert_eq!(tasks[0].directory, PathBuf::from("downloads"));
        assert_eq!(tasks[0].filename.as_deref(), Some("a.zip"));
        assert_eq!(tasks[1].directory, PathBuf::from("."));
        assert_eq!(tasks[1].filename.as_deref(), Some("b.zip"));
    }

    #[test]
    fn test_tasks_rejects_bad_url() {
        let mut ledger = FailureLedger::new();
        ledger.record("not a url", Path::new("a"), 1);
        assert!(ledger.tasks().is_err());
    }
}
