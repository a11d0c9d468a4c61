//! Support code consulted when wiring a run.

use std::{fmt, time::Duration};

use crate::listener::ReportingListener;

/// Default upper bound on a single listener call.
pub const DEFAULT_LISTENER_TIMEOUT: Duration = Duration::from_secs(5);

/// Library of user support code: listener defaults and extra listeners.
pub trait SupportCodeLibrary: Send + Sync {
    /// Timeout applied to each listener call.
    fn default_timeout(&self) -> Duration;

    /// Listeners registered by support code, delivered after any listeners
    /// attached directly to the runtime.
    fn listeners(&self) -> Vec<Box<dyn ReportingListener>>;
}

/// Factory producing a fresh listener for each run.
pub type ListenerFactory = Box<dyn Fn() -> Box<dyn ReportingListener> + Send + Sync>;

/// Builder-style [`SupportCodeLibrary`].
///
/// ```
/// use std::time::Duration;
///
/// use featurerun::runtime::{SupportCode, SupportCodeLibrary};
///
/// let support = SupportCode::new().with_default_timeout(Duration::from_secs(2));
/// assert_eq!(support.default_timeout(), Duration::from_secs(2));
/// assert!(support.listeners().is_empty());
/// ```
pub struct SupportCode {
    default_timeout: Duration,
    factories: Vec<ListenerFactory>,
}

impl SupportCode {
    #[must_use]
    pub fn new() -> Self {
        Self {
            default_timeout: DEFAULT_LISTENER_TIMEOUT,
            factories: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Register a listener factory. Factories run in registration order.
    #[must_use]
    pub fn with_listener<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Box<dyn ReportingListener> + Send + Sync + 'static,
    {
        self.factories.push(Box::new(factory));
        self
    }
}

impl Default for SupportCode {
    fn default() -> Self { Self::new() }
}

impl SupportCodeLibrary for SupportCode {
    fn default_timeout(&self) -> Duration { self.default_timeout }

    fn listeners(&self) -> Vec<Box<dyn ReportingListener>> {
        self.factories.iter().map(|factory| factory()).collect()
    }
}

impl fmt::Debug for SupportCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupportCode")
            .field("default_timeout", &self.default_timeout)
            .field("listeners", &self.factories.len())
            .finish()
    }
}
