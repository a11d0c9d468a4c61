//! Run orchestration.
//!
//! [`Runtime`] wires the configured listeners into an [`EventBus`], scopes the
//! stack-trace filter around the engine run, delivers the aggregate result to
//! every listener and hands it back to the caller.
//!
//! A runtime drives exactly one run:
//!
//! ```text
//! Idle --start--> Running --+--> Completed
//!                           +--> Failed
//! ```

mod support;

use std::{panic::AssertUnwindSafe, sync::Arc};

use futures::FutureExt;
pub use support::{DEFAULT_LISTENER_TIMEOUT, ListenerFactory, SupportCode, SupportCodeLibrary};
use tracing::{Instrument, debug, error, info, info_span};

use crate::{
    bus::EventBus,
    config::RunOptions,
    diagnostics::{DiagnosticFilter, FilterGuard, StackTraceFilter},
    engine::{EngineContext, EngineError, ExecutionEngine},
    error::{Result, RuntimeError},
    listener::ReportingListener,
    model::AggregateResult,
    panic::panic_message,
};

/// Lifecycle position of a [`Runtime`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Completed,
    Failed,
}

/// Orchestrates a single run of engine `E` with support library `L`.
///
/// # Examples
///
/// ```
/// use featurerun::{
///     config::RunOptions,
///     engine::{RecordedSuite, ReplayEngine},
///     listener::{ListenerConfig, SharedBuffer},
///     runtime::{Runtime, SupportCode},
///     summary::SummaryReporter,
/// };
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), featurerun::RuntimeError> {
/// let report = SharedBuffer::new();
/// let mut runtime = Runtime::<ReplayEngine, _>::new(
///     RecordedSuite::default(),
///     RunOptions::default(),
///     SupportCode::new(),
/// );
/// runtime.attach_listener(SummaryReporter::new(ListenerConfig::new(report.clone())))?;
/// let result = runtime.start().await?;
/// assert!(result.success);
/// assert_eq!(report.contents(), "0 scenarios\n0 steps\n0m0.000s\n");
/// # Ok(())
/// # }
/// ```
pub struct Runtime<E: ExecutionEngine, L> {
    features: Option<E::Features>,
    options: RunOptions,
    support: L,
    listeners: Vec<Box<dyn ReportingListener>>,
    filter: Arc<dyn DiagnosticFilter>,
    state: RunState,
}

impl<E, L> Runtime<E, L>
where
    E: ExecutionEngine,
    L: SupportCodeLibrary,
{
    /// Create an idle runtime using the process-wide [`StackTraceFilter`].
    pub fn new(features: E::Features, options: RunOptions, support: L) -> Self {
        Self {
            features: Some(features),
            options,
            support,
            listeners: Vec::new(),
            filter: Arc::new(StackTraceFilter),
            state: RunState::Idle,
        }
    }

    /// Replace the filter toggled when `filter_stacktraces` is set.
    #[must_use]
    pub fn with_diagnostic_filter(mut self, filter: Arc<dyn DiagnosticFilter>) -> Self {
        self.filter = filter;
        self
    }

    #[must_use]
    pub fn state(&self) -> RunState { self.state }

    #[must_use]
    pub fn options(&self) -> RunOptions { self.options }

    /// Append a listener. Attached listeners receive events before those
    /// provided by the support library, in attachment order.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::ListenerAfterStart`] once [`Runtime::start`]
    /// has been called.
    pub fn attach_listener<T>(&mut self, listener: T) -> Result<()>
    where
        T: ReportingListener + 'static,
    {
        if self.state != RunState::Idle {
            return Err(RuntimeError::ListenerAfterStart);
        }
        self.listeners.push(Box::new(listener));
        Ok(())
    }

    /// Execute the run and return its aggregate result.
    ///
    /// The stack-trace filter, when requested, is released before this method
    /// returns on every path, including engine errors and panics.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::AlreadyStarted`] on a second call and
    /// [`RuntimeError::Engine`] when the engine rejects the run or a listener
    /// times out.
    pub async fn start(&mut self) -> Result<AggregateResult> {
        let features = match (self.state, self.features.take()) {
            (RunState::Idle, Some(features)) => features,
            _ => return Err(RuntimeError::AlreadyStarted),
        };
        self.state = RunState::Running;

        let mut listeners = std::mem::take(&mut self.listeners);
        listeners.extend(self.support.listeners());
        let bus = EventBus::new(self.support.default_timeout(), listeners);
        let span = info_span!("run", listeners = bus.listener_count());

        let filter = Arc::clone(&self.filter);
        let outcome = Self::drive(features, self.options, filter, bus)
            .instrument(span)
            .await;
        self.state = match outcome {
            Ok(_) => RunState::Completed,
            Err(_) => RunState::Failed,
        };
        #[cfg(feature = "metrics")]
        crate::metrics::inc_runs(outcome.as_ref().is_ok_and(|result| result.success));
        outcome.map_err(RuntimeError::from)
    }

    async fn drive(
        features: E::Features,
        options: RunOptions,
        filter: Arc<dyn DiagnosticFilter>,
        bus: EventBus,
    ) -> std::result::Result<AggregateResult, EngineError> {
        info!(?options, "starting run");
        let engine = E::new(EngineContext {
            event_bus: bus.clone(),
            features,
            options,
        });

        let outcome = {
            let _filter = options.filter_stacktraces.then(|| {
                debug!("acquiring stack trace filter");
                FilterGuard::acquire(filter)
            });
            AssertUnwindSafe(engine.run())
                .catch_unwind()
                .await
                .unwrap_or_else(|payload| Err(EngineError::Panicked(panic_message(payload))))
        };

        let result = match outcome {
            Ok(result) => result,
            Err(error) => {
                error!(%error, "run failed");
                return Err(error);
            }
        };
        bus.emit_run_complete(&result).await?;
        info!(
            scenarios = result.scenario_counts.total(),
            steps = result.step_counts.total(),
            duration_millis = result.duration_millis,
            success = result.success,
            "run completed"
        );
        Ok(result)
    }
}

impl<E: ExecutionEngine, L> std::fmt::Debug for Runtime<E, L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("options", &self.options)
            .field("listeners", &self.listeners.len())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
