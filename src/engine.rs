//! Interface to the component that executes a suite.
//!
//! The runtime builds an [`ExecutionEngine`] from an [`EngineContext`] and
//! awaits its [`run`](ExecutionEngine::run). The engine emits one step
//! outcome per executed step through the context's [`EventBus`] and resolves
//! with the run's [`AggregateResult`].

pub mod replay;

use async_trait::async_trait;
pub use replay::{RecordedScenario, RecordedStep, RecordedSuite, ReplayEngine};
use thiserror::Error;

use crate::{
    bus::{BusError, EventBus},
    config::RunOptions,
    model::AggregateResult,
};

/// Failures that abort a run before an aggregate result exists.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum EngineError {
    /// Event delivery to a listener failed.
    #[error("event delivery failed: {0}")]
    Bus(#[from] BusError),
    /// The engine panicked while running.
    #[error("engine panicked: {0}")]
    Panicked(String),
    /// Engine-specific failure.
    #[error("engine failed: {0}")]
    Failed(String),
}

/// Everything an engine receives at construction.
#[derive(Debug)]
pub struct EngineContext<F> {
    pub event_bus: EventBus,
    pub features: F,
    pub options: RunOptions,
}

/// Executes a parsed suite, reporting through the event bus.
#[async_trait]
pub trait ExecutionEngine: Send + Sized {
    /// Opaque handle to the parsed suite.
    type Features: Send;

    fn new(context: EngineContext<Self::Features>) -> Self;

    /// Execute the suite.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] if the run cannot complete.
    async fn run(self) -> Result<AggregateResult, EngineError>;
}
