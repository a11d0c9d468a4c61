#![doc(html_root_url = "https://docs.rs/featurerun/latest")]
//! Public API for the `featurerun` library.
//!
//! This crate orchestrates acceptance-test runs and renders their summary
//! report: an execution engine emits step outcomes through an event bus to
//! reporting listeners, and the [`summary::SummaryReporter`] turns them into
//! a deterministic textual report once the run completes.

pub mod bus;
pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod listener;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod model;
pub mod panic;
pub mod runtime;
pub mod snippet;
pub mod status;
pub mod summary;

pub use bus::{BusError, EventBus};
pub use config::RunOptions;
pub use engine::{EngineError, ExecutionEngine};
pub use error::{Result, RuntimeError};
pub use listener::{ListenerConfig, ReportingListener};
pub use model::{AggregateResult, StepOutcome};
pub use runtime::{Runtime, SupportCode, SupportCodeLibrary};
pub use status::Status;
pub use summary::SummaryReporter;
