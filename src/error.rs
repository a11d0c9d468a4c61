//! Canonical error type for the run lifecycle.

use thiserror::Error;

use crate::engine::EngineError;

/// Errors returned by [`Runtime`](crate::runtime::Runtime).
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum RuntimeError {
    /// `start` was called on a runtime that already ran.
    #[error("run has already been started")]
    AlreadyStarted,
    /// A listener was attached after the run started.
    #[error("listeners must be attached before the run starts")]
    ListenerAfterStart,
    /// The execution engine rejected the run.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Result type used by the runtime API.
pub type Result<T> = std::result::Result<T, RuntimeError>;
