//! `featurerun` binary.
//!
//! Replays a recorded suite, writes the summary report to stdout and exits
//! non-zero when the run did not succeed.

mod cli;

use std::{io, process::ExitCode};

use clap::Parser;
use featurerun::{
    RuntimeError,
    config::RunOptions,
    engine::{RecordedSuite, ReplayEngine},
    listener::{ListenerConfig, StyleTable, WriterSink},
    runtime::{Runtime, SupportCode},
    summary::SummaryReporter,
};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to read record: {0}")]
    Io(#[from] io::Error),
    #[error("malformed record: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Run(#[from] RuntimeError),
}

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr so the report on stdout stays machine-comparable.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    match run(cli::Cli::parse()).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(error) => {
            eprintln!("featurerun: {error}");
            ExitCode::from(2)
        }
    }
}

async fn run(cli: cli::Cli) -> Result<bool, CliError> {
    let record = tokio::fs::read_to_string(&cli.record).await?;
    let suite: RecordedSuite = serde_json::from_str(&record)?;
    let options = RunOptions::default()
        .dry_run(cli.dry_run)
        .fail_fast(cli.fail_fast)
        .filter_stacktraces(cli.filter_stacktraces)
        .strict(cli.strict);

    let mut config = ListenerConfig::new(WriterSink::new(io::stdout()));
    if let Some(base_dir) = cli.base_dir {
        config = config.with_base_dir(base_dir);
    }
    if cli.colour {
        config = config.with_styles(StyleTable::ansi());
    }

    let mut runtime = Runtime::<ReplayEngine, _>::new(suite, options, SupportCode::new());
    runtime.attach_listener(SummaryReporter::new(config))?;
    let result = runtime.start().await?;
    Ok(result.success)
}
