//! Run options passed through to the execution engine.

use serde::{Deserialize, Serialize};

/// Flags controlling a run. All default to `false`.
///
/// The runtime reads only `filter_stacktraces`; every flag is handed to the
/// execution engine unmodified.
///
/// # Examples
///
/// ```
/// use featurerun::config::RunOptions;
///
/// let options = RunOptions::default().fail_fast(true).strict(true);
/// assert!(options.fail_fast && options.strict);
/// assert!(!options.dry_run && !options.filter_stacktraces);
/// ```
#[expect(
    clippy::struct_excessive_bools,
    reason = "four independent on/off switches recognised by the engine"
)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RunOptions {
    /// Resolve step definitions without executing them.
    pub dry_run: bool,
    /// Skip every remaining scenario after the first failing one.
    pub fail_fast: bool,
    /// Hide framework frames in failure traces for the duration of the run.
    pub filter_stacktraces: bool,
    /// Treat pending and undefined steps as failures.
    pub strict: bool,
}

impl RunOptions {
    #[must_use]
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    #[must_use]
    pub fn fail_fast(mut self, enabled: bool) -> Self {
        self.fail_fast = enabled;
        self
    }

    #[must_use]
    pub fn filter_stacktraces(mut self, enabled: bool) -> Self {
        self.filter_stacktraces = enabled;
        self
    }

    #[must_use]
    pub fn strict(mut self, enabled: bool) -> Self {
        self.strict = enabled;
        self
    }
}
