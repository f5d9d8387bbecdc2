//! Progress reporting.
//!
//! Workers never touch a progress bar directly: they send
//! [`ProgressEvent`]s into a funnel channel, one channel per aggregation
//! scope (per file, then per batch). The [`aggregator`] drains a channel
//! and drives an `indicatif` bar; [`display`] owns the bar hierarchy and
//! [`style`] its appearance.

pub mod aggregator;
pub mod display;
pub mod style;

pub use aggregator::{ProgressEvent, ProgressSender};
pub use display::ProgressDisplay;
pub use style::{ProgressBarOpts, StyleOptions};
