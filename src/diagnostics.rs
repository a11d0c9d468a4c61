//! Process-wide stack-trace filtering toggle.
//!
//! While enabled, failure traces captured by the execution engine are expected
//! to omit frames belonging to the framework itself. The toggle is shared by
//! the whole process, so at most one run may hold it at a time.
//!
//! [`FilterGuard`] scopes the toggle to a run: it enables the filter on
//! acquisition and disables it when dropped, on every exit path.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tracing::debug;

/// A resource that can be switched on and off.
///
/// Both operations must be idempotent.
pub trait DiagnosticFilter: Send + Sync {
    fn enable(&self);
    fn disable(&self);
}

static TRACES_FILTERED: AtomicBool = AtomicBool::new(false);

/// Prefixes of frames hidden while filtering is active.
const FRAMEWORK_FRAMES: [&str; 3] = ["featurerun::", "tokio::", "futures_util::"];

/// Handle to the process-wide trace filter.
#[derive(Clone, Copy, Debug, Default)]
pub struct StackTraceFilter;

impl StackTraceFilter {
    /// Whether filtering is currently active anywhere in the process.
    #[must_use]
    pub fn is_active() -> bool { TRACES_FILTERED.load(Ordering::Acquire) }

    /// Drop framework frames from a rendered trace when filtering is active.
    ///
    /// Lines mentioning a framework module path are removed; every other line
    /// is kept verbatim.
    #[must_use]
    pub fn apply(trace: &str) -> String {
        if !Self::is_active() {
            return trace.to_owned();
        }
        trace
            .lines()
            .filter(|line| !FRAMEWORK_FRAMES.iter().any(|frame| line.contains(frame)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl DiagnosticFilter for StackTraceFilter {
    fn enable(&self) {
        if !TRACES_FILTERED.swap(true, Ordering::AcqRel) {
            debug!("stack trace filtering enabled");
        }
    }

    fn disable(&self) {
        if TRACES_FILTERED.swap(false, Ordering::AcqRel) {
            debug!("stack trace filtering disabled");
        }
    }
}

/// Enables a [`DiagnosticFilter`] for as long as the guard lives.
#[must_use = "the filter is disabled as soon as the guard is dropped"]
pub struct FilterGuard {
    filter: Arc<dyn DiagnosticFilter>,
}

impl FilterGuard {
    pub fn acquire(filter: Arc<dyn DiagnosticFilter>) -> Self {
        filter.enable();
        Self { filter }
    }
}

impl Drop for FilterGuard {
    fn drop(&mut self) { self.filter.disable(); }
}
