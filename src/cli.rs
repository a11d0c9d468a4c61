//! Command line interface for the `featurerun` binary.
//!
//! The binary replays a recorded suite through the runtime and prints the
//! summary report.

use std::path::PathBuf;

use clap::Parser;

/// Command line arguments for the `featurerun` binary.
#[derive(Debug, Parser)]
#[command(
    name = "featurerun",
    version,
    about = "Replay a recorded acceptance-test run and print its summary"
)]
pub struct Cli {
    /// JSON file holding the recorded suite.
    pub record: PathBuf,
    /// Resolve steps without executing them.
    #[arg(long)]
    pub dry_run: bool,
    /// Skip remaining scenarios after the first failure.
    #[arg(long)]
    pub fail_fast: bool,
    /// Hide framework frames in failure traces.
    #[arg(long)]
    pub filter_stacktraces: bool,
    /// Fail the run on pending or undefined steps.
    #[arg(long)]
    pub strict: bool,
    /// Colour the report with ANSI escape sequences.
    #[arg(long)]
    pub colour: bool,
    /// Directory source paths are shown relative to.
    #[arg(long, value_name = "DIR")]
    pub base_dir: Option<PathBuf>,
}
