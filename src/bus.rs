//! Serial delivery of run events to listeners.
//!
//! [`EventBus`] is a cloneable handle: the execution engine emits step
//! outcomes through one clone while the runtime keeps another to deliver the
//! final aggregate result. Every delivery holds the listener set for its whole
//! duration, so no listener ever sees two events at once.

use std::{sync::Arc, time::Duration};

use thiserror::Error;
use tokio::{sync::Mutex, time::timeout};
use tracing::warn;

use crate::{
    listener::ReportingListener,
    model::{AggregateResult, StepOutcome},
};

/// Errors raised while delivering events.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum BusError {
    /// A listener did not return within the default timeout.
    #[error("listener {index} did not finish within {timeout:?}")]
    ListenerTimeout { index: usize, timeout: Duration },
}

/// Distributes events to an ordered list of listeners.
#[derive(Clone)]
pub struct EventBus {
    listeners: Arc<Mutex<Vec<Box<dyn ReportingListener>>>>,
    listener_count: usize,
    default_timeout: Duration,
}

impl EventBus {
    /// Create a bus delivering to `listeners` in the given order.
    #[must_use]
    pub fn new(default_timeout: Duration, listeners: Vec<Box<dyn ReportingListener>>) -> Self {
        Self {
            listener_count: listeners.len(),
            listeners: Arc::new(Mutex::new(listeners)),
            default_timeout,
        }
    }

    /// Upper bound on a single listener call.
    #[must_use]
    pub fn default_timeout(&self) -> Duration { self.default_timeout }

    #[must_use]
    pub fn listener_count(&self) -> usize { self.listener_count }

    /// Deliver a step outcome to every listener, one after another.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::ListenerTimeout`] if a listener exceeds the default
    /// timeout. Listeners after it do not receive the event.
    pub async fn emit_step_outcome(&self, outcome: &StepOutcome) -> Result<(), BusError> {
        #[cfg(feature = "metrics")]
        crate::metrics::inc_steps(outcome.status);

        let mut listeners = self.listeners.lock().await;
        for (index, listener) in listeners.iter_mut().enumerate() {
            self.bounded(index, listener.on_step_outcome(outcome)).await?;
        }
        Ok(())
    }

    /// Deliver the aggregate result to every listener, one after another.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::ListenerTimeout`] if a listener exceeds the default
    /// timeout.
    pub async fn emit_run_complete(&self, result: &AggregateResult) -> Result<(), BusError> {
        let mut listeners = self.listeners.lock().await;
        for (index, listener) in listeners.iter_mut().enumerate() {
            self.bounded(index, listener.on_run_complete(result)).await?;
        }
        Ok(())
    }

    async fn bounded<F>(&self, index: usize, call: F) -> Result<(), BusError>
    where
        F: Future<Output = ()>,
    {
        timeout(self.default_timeout, call).await.map_err(|_| {
            warn!(index, timeout = ?self.default_timeout, "listener timed out");
            BusError::ListenerTimeout {
                index,
                timeout: self.default_timeout,
            }
        })
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listener_count", &self.listener_count)
            .field("default_timeout", &self.default_timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex as StdMutex;

    use async_trait::async_trait;
    use rstest::rstest;
    use tracing_test::traced_test;

    use super::*;
    use crate::{model::Step, status::Status};

    type Journal = Arc<StdMutex<Vec<String>>>;

    struct Recording {
        name: &'static str,
        journal: Journal,
    }

    #[async_trait]
    impl ReportingListener for Recording {
        async fn on_step_outcome(&mut self, outcome: &StepOutcome) {
            tokio::task::yield_now().await;
            self.journal
                .lock()
                .expect("journal lock")
                .push(format!("{}:{}", self.name, outcome.step.text()));
        }

        async fn on_run_complete(&mut self, _result: &AggregateResult) {
            self.journal
                .lock()
                .expect("journal lock")
                .push(format!("{}:done", self.name));
        }
    }

    struct Stalled;

    #[async_trait]
    impl ReportingListener for Stalled {
        async fn on_step_outcome(&mut self, _outcome: &StepOutcome) {
            tokio::time::sleep(Duration::from_secs(60)).await;
        }

        async fn on_run_complete(&mut self, _result: &AggregateResult) {}
    }

    fn outcome(name: &str) -> StepOutcome {
        StepOutcome::new(Status::Passed, Step::new("Given ", name))
    }

    #[rstest]
    #[tokio::test]
    async fn delivers_in_listener_then_event_order() {
        let journal = Journal::default();
        let bus = EventBus::new(
            Duration::from_secs(1),
            vec![
                Box::new(Recording {
                    name: "a",
                    journal: journal.clone(),
                }),
                Box::new(Recording {
                    name: "b",
                    journal: journal.clone(),
                }),
            ],
        );
        bus.emit_step_outcome(&outcome("one")).await.expect("emit one");
        bus.emit_step_outcome(&outcome("two")).await.expect("emit two");
        bus.emit_run_complete(&AggregateResult::default())
            .await
            .expect("emit result");

        assert_eq!(
            *journal.lock().expect("journal lock"),
            vec![
                "a:Given one",
                "b:Given one",
                "a:Given two",
                "b:Given two",
                "a:done",
                "b:done"
            ]
        );
    }

    #[rstest]
    #[traced_test]
    #[tokio::test(start_paused = true)]
    async fn stalled_listener_times_out() {
        let bus = EventBus::new(Duration::from_millis(50), vec![Box::new(Stalled)]);
        let err = bus
            .emit_step_outcome(&outcome("one"))
            .await
            .expect_err("stalled listener must time out");
        assert_eq!(
            err,
            BusError::ListenerTimeout {
                index: 0,
                timeout: Duration::from_millis(50)
            }
        );
        assert!(logs_contain("listener timed out"));
    }

    #[test]
    fn reports_listener_count() {
        let bus = EventBus::new(Duration::from_secs(1), vec![Box::new(Stalled)]);
        assert_eq!(bus.listener_count(), 1);
        assert_eq!(bus.default_timeout(), Duration::from_secs(1));
    }
}
