//! Metric helpers for `featurerun`.
//!
//! This module defines metric names and simple helper functions
//! wrapping the [`metrics`](https://docs.rs/metrics) crate.

use metrics::counter;

use crate::status::Status;

/// Name of the counter tracking delivered step outcomes.
pub const STEPS_TOTAL: &str = "featurerun_steps_total";
/// Name of the counter tracking completed runs.
pub const RUNS_TOTAL: &str = "featurerun_runs_total";

/// Record a step outcome with the given status.
pub fn inc_steps(status: Status) { counter!(STEPS_TOTAL, "status" => status.name()).increment(1); }

/// Record a completed run.
pub fn inc_runs(success: bool) {
    let outcome = if success { "success" } else { "failure" };
    counter!(RUNS_TOTAL, "outcome" => outcome).increment(1);
}
