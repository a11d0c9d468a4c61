//! Listener contract for consumers of run events.
//!
//! A [`ReportingListener`] receives every step outcome as it completes and a
//! single aggregate result once the run has finished. The runtime and the
//! [`EventBus`](crate::bus::EventBus) invoke these methods; listeners never
//! call them on themselves.

pub mod config;

use async_trait::async_trait;
pub use config::{ListenerConfig, ReportSink, SharedBuffer, StyleFn, StyleKey, StyleTable, WriterSink};

use crate::model::{AggregateResult, StepOutcome};

/// Capability implemented by report consumers.
///
/// Calls are delivered serially: the bus never invokes two methods on the same
/// listener concurrently and waits for each call to return before delivering
/// the next event. Failures inside a listener are the listener's own concern;
/// the bus neither catches nor retries them.
///
/// ```
/// use async_trait::async_trait;
/// use featurerun::{
///     listener::ReportingListener,
///     model::{AggregateResult, StepOutcome},
/// };
///
/// #[derive(Default)]
/// struct StepCounter(usize);
///
/// #[async_trait]
/// impl ReportingListener for StepCounter {
///     async fn on_step_outcome(&mut self, _outcome: &StepOutcome) { self.0 += 1; }
///
///     async fn on_run_complete(&mut self, _result: &AggregateResult) {}
/// }
/// ```
#[async_trait]
pub trait ReportingListener: Send {
    /// Called once per executed step, in completion order.
    async fn on_step_outcome(&mut self, outcome: &StepOutcome);

    /// Called exactly once, after the last step outcome.
    async fn on_run_complete(&mut self, result: &AggregateResult);
}

#[async_trait]
impl<L> ReportingListener for Box<L>
where
    L: ReportingListener + ?Sized,
{
    async fn on_step_outcome(&mut self, outcome: &StepOutcome) {
        (**self).on_step_outcome(outcome).await;
    }

    async fn on_run_complete(&mut self, result: &AggregateResult) {
        (**self).on_run_complete(result).await;
    }
}
