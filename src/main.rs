//! Command-line front end.
//!
//! Accepts a single URL, a newline-delimited file of URLs, or a failure
//! ledger from a previous run. Best-effort semantics: problems are
//! reported per item and collected into a fresh ledger, never turned into
//! a non-zero exit.

use clap::Parser;
use partwise::{BatchBuilder, DownloadTask, FailureLedger};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "partwise", version, about = "Segmented, resumable HTTP downloads")]
struct Cli {
    /// URL, newline-delimited URL list file, or failure-ledger path.
    input: String,

    /// Destination directory.
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Files downloading at once.
    #[arg(long, default_value_t = 4)]
    files: usize,

    /// Byte-range segments per file.
    #[arg(long, default_value_t = 4)]
    segments: usize,

    /// Replace existing destinations instead of resuming or renaming.
    #[arg(long)]
    overwrite: bool,

    /// Where failed downloads are recorded for a later retry run.
    #[arg(long, default_value = "partwise.failed")]
    ledger: PathBuf,

    /// Hide the progress bars.
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> partwise::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let (tasks, prior) = gather_tasks(&cli)?;
    if tasks.is_empty() {
        eprintln!("nothing to download");
        return Ok(());
    }

    let builder = if cli.quiet {
        BatchBuilder::hidden()
    } else {
        BatchBuilder::new()
    };
    let batch = builder
        .max_concurrent_files(cli.files)
        .max_segments(cli.segments)
        .build();

    let report = batch.run(&tasks).await?;

    for failure in report.failures() {
        if let partwise::Status::Failed(reason) = failure.status() {
            eprintln!("failed: {} ({})", failure.task().url, reason);
        }
    }
    println!(
        "{} succeeded, {} skipped, {} failed",
        report.succeeded(),
        report.skipped(),
        report.failed()
    );

    let (_, mut ledger) = report.into_parts();
    ledger.absorb_attempts(&prior);
    if !ledger.is_empty() {
        ledger.save(&cli.ledger)?;
        println!(
            "{} failures recorded in {}; pass that path to retry them",
            ledger.len(),
            cli.ledger.display()
        );
    }

    Ok(())
}

/// Builds the task list from the input argument. Returns the prior ledger
/// when the input was one, so attempt counts carry over.
fn gather_tasks(cli: &Cli) -> partwise::Result<(Vec<DownloadTask>, FailureLedger)> {
    let path = Path::new(&cli.input);
    if path.is_file() {
        let content = fs::read_to_string(path)?;
        if FailureLedger::sniff(&content) {
            let prior = FailureLedger::load(path)?;
            let tasks = prior
                .tasks()?
                .into_iter()
                .map(|t| t.segments(cli.segments).overwrite(cli.overwrite))
                .collect();
            return Ok((tasks, prior));
        }
        let mut tasks = Vec::new();
        for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
            match DownloadTask::try_from(line) {
                Ok(task) => tasks.push(configure(task, cli)),
                Err(e) => eprintln!("skipping line: {}", e),
            }
        }
        return Ok((tasks, FailureLedger::new()));
    }

    let task = DownloadTask::try_from(cli.input.as_str())?;
    Ok((vec![configure(task, cli)], FailureLedger::new()))
}

fn configure(task: DownloadTask, cli: &Cli) -> DownloadTask {
    task.directory(cli.output.clone())
        .segments(cli.segments)
        .overwrite(cli.overwrite)
}
