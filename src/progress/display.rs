//! Bar hierarchy for one batch run.
//!
//! A single [`MultiProgress`] hosts the probe bar, the byte-based batch
//! bar, and one child bar per actively downloading file.

use crate::progress::style::StyleOptions;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget};

/// Owns the `MultiProgress` and styles for one batch run.
pub struct ProgressDisplay {
    multi: MultiProgress,
    style: StyleOptions,
}

impl ProgressDisplay {
    /// Create a new display; fully hidden when the styles disable all bars.
    pub fn new(style: StyleOptions) -> Self {
        let multi = match style.is_enabled() {
            true => MultiProgress::new(),
            false => MultiProgress::with_draw_target(ProgressDrawTarget::hidden()),
        };
        Self { multi, style }
    }

    /// Bar counting resolved URLs during the metadata probe phase.
    pub fn probe_bar(&self, total_urls: u64) -> ProgressBar {
        if !self.style.batch().enabled {
            return ProgressBar::hidden();
        }
        let style = indicatif::ProgressStyle::default_bar()
            .template(crate::progress::style::ProgressBarOpts::TEMPLATE_PROBE)
            .unwrap_or_else(|_| indicatif::ProgressStyle::default_bar());
        self.multi.add(ProgressBar::new(total_urls).with_style(style))
    }

    /// Byte-based bar covering the aggregate expected total of the batch.
    pub fn batch_bar(&self, total_bytes: u64) -> ProgressBar {
        self.multi.add(self.style.batch().to_progress_bar(total_bytes))
    }

    /// Child bar for one file, positioned past any resumed bytes.
    pub fn file_bar(&self, size: u64, position: u64) -> ProgressBar {
        let bar = self.multi.add(self.style.file().to_progress_bar(size));
        bar.set_position(position);
        bar
    }

    /// Finish a per-file bar according to the style options.
    pub fn finish_file(&self, bar: ProgressBar) {
        if self.style.file().clear {
            bar.finish_and_clear();
        } else {
            bar.finish();
        }
    }

    /// Finish the batch bar according to the style options.
    pub fn finish_batch(&self, bar: ProgressBar) {
        if self.style.batch().clear {
            bar.finish_and_clear();
        } else {
            bar.finish();
        }
    }
}
