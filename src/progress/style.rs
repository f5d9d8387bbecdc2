//! Progress bar styling options.
//!
//! Two bars are styled independently: the batch bar tracking cumulative
//! bytes across all active files, and the per-file bars underneath it. Both
//! default to byte-oriented templates; everything can be hidden for
//! non-interactive use.

use indicatif::{ProgressBar, ProgressStyle};

/// Style options for the batch and per-file progress bars.
///
/// By default the batch bar stays on screen upon completion while the
/// per-file bars are cleared once their file is done.
#[derive(Debug, Clone)]
pub struct StyleOptions {
    pub(crate) batch: ProgressBarOpts,
    pub(crate) file: ProgressBarOpts,
}

impl Default for StyleOptions {
    fn default() -> Self {
        Self {
            batch: ProgressBarOpts {
                template: Some(ProgressBarOpts::TEMPLATE_BYTES.into()),
                progress_chars: Some(ProgressBarOpts::CHARS_FINE.into()),
                enabled: true,
                clear: false,
            },
            file: ProgressBarOpts {
                template: Some(ProgressBarOpts::TEMPLATE_BYTES.into()),
                progress_chars: Some(ProgressBarOpts::CHARS_LINE.into()),
                enabled: true,
                clear: true,
            },
        }
    }
}

impl StyleOptions {
    /// Create new [`StyleOptions`].
    pub fn new(batch: ProgressBarOpts, file: ProgressBarOpts) -> Self {
        Self { batch, file }
    }

    /// Hide every bar.
    pub fn hidden() -> Self {
        Self {
            batch: ProgressBarOpts::hidden(),
            file: ProgressBarOpts::hidden(),
        }
    }

    /// Return `false` if neither bar is enabled.
    pub fn is_enabled(&self) -> bool {
        self.batch.enabled || self.file.enabled
    }

    /// Get a reference to the batch bar options.
    pub fn batch(&self) -> &ProgressBarOpts {
        &self.batch
    }

    /// Get a reference to the per-file bar options.
    pub fn file(&self) -> &ProgressBarOpts {
        &self.file
    }
}

/// Options for a single progress bar.
#[derive(Debug, Clone)]
pub struct ProgressBarOpts {
    template: Option<String>,
    progress_chars: Option<String>,
    pub(crate) enabled: bool,
    /// Clear the bar once completed.
    pub(crate) clear: bool,
}

impl Default for ProgressBarOpts {
    fn default() -> Self {
        Self {
            template: None,
            progress_chars: None,
            enabled: true,
            clear: true,
        }
    }
}

impl ProgressBarOpts {
    /// Byte-oriented bar with throughput and ETA.
    ///
    /// `━━━━━━━━━━━━  211.23 KiB/211.23 KiB  1.01 MiB/s eta 0s`
    pub const TEMPLATE_BYTES: &'static str =
        "{bar:40.green/black} {bytes:>11}/{total_bytes:<11} {bytes_per_sec:>13} eta {eta:.blue}";
    /// Byte counter without a total, for resources of unknown size.
    pub const TEMPLATE_COUNTER: &'static str = "{spinner} {bytes:>11} {bytes_per_sec:>13}";
    /// Plain position counter, used for the metadata probe phase.
    pub const TEMPLATE_PROBE: &'static str = "{bar:40.blue} {pos:>}/{len} urls";
    /// Fine blocks: `"█▉▊▋▌▍▎▏  "`.
    pub const CHARS_FINE: &'static str = "█▉▊▋▌▍▎▏  ";
    /// Line: `"━╾╴─"`.
    pub const CHARS_LINE: &'static str = "━╾╴─";

    /// Create a new [`ProgressBarOpts`].
    pub fn new(
        template: Option<String>,
        progress_chars: Option<String>,
        enabled: bool,
        clear: bool,
    ) -> Self {
        Self {
            template,
            progress_chars,
            enabled,
            clear,
        }
    }

    /// Create a [`ProgressBarOpts`] which hides the bar.
    pub fn hidden() -> Self {
        Self {
            enabled: false,
            ..ProgressBarOpts::default()
        }
    }

    /// Set to `true` to clear the bar upon completion.
    pub fn set_clear(&mut self, clear: bool) {
        self.clear = clear;
    }

    /// Create a [`ProgressStyle`] from these options.
    pub fn to_progress_style(&self) -> ProgressStyle {
        let mut style = ProgressStyle::default_bar();
        if let Some(template) = &self.template {
            style = style
                .template(template)
                .unwrap_or_else(|_| ProgressStyle::default_bar());
        }
        if let Some(progress_chars) = &self.progress_chars {
            style = style.progress_chars(progress_chars);
        }
        style
    }

    /// Create a [`ProgressBar`] of length `len` from these options.
    ///
    /// `len == 0` yields a templated byte counter instead of a bar, since
    /// no meaningful percentage can be shown for an unknown total.
    pub fn to_progress_bar(&self, len: u64) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::hidden();
        }
        if len == 0 {
            let style = ProgressStyle::default_spinner()
                .template(Self::TEMPLATE_COUNTER)
                .unwrap_or_else(|_| ProgressStyle::default_spinner());
            return ProgressBar::new_spinner().with_style(style);
        }
        ProgressBar::new(len).with_style(self.to_progress_style())
    }
}
