//! Batch orchestration.
//!
//! A [`Batch`] runs a bounded pool of concurrent file downloads over a
//! task list: first a metadata probe phase computes the aggregate expected
//! byte total (unresolvable tasks become skips, not failures), then the
//! transfer phase runs the per-file state machines, collecting every
//! terminal failure into the [`FailureLedger`](crate::ledger::FailureLedger)
//! of the returned [`BatchReport`].

pub mod builder;
pub mod config;
pub mod orchestrator;
pub mod report;

pub use builder::BatchBuilder;
pub use config::BatchConfig;
pub use orchestrator::Batch;
pub use report::BatchReport;
