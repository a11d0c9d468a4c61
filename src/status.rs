//! Step outcome taxonomy.
//!
//! [`Status`] is the closed set of outcomes a step can produce. Each status
//! belongs to exactly one [`IssueClass`], which decides whether the summary
//! report lists it as a failure, a warning, or not at all.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Outcome of executing a single step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Failed,
    Ambiguous,
    Undefined,
    Pending,
    Skipped,
    Passed,
}

/// Report section a status is filed under.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IssueClass {
    /// Build-breaking outcomes.
    Failure,
    /// Non-fatal outcomes that need developer action.
    Warning,
    /// Outcomes that never produce a report entry.
    Silent,
}

impl Status {
    /// Order used wherever statuses are enumerated for display.
    pub const REPORT_ORDER: [Status; 6] = [
        Status::Failed,
        Status::Ambiguous,
        Status::Undefined,
        Status::Pending,
        Status::Skipped,
        Status::Passed,
    ];

    /// Lowercase name used in count summaries.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Status::Failed => "failed",
            Status::Ambiguous => "ambiguous",
            Status::Undefined => "undefined",
            Status::Pending => "pending",
            Status::Skipped => "skipped",
            Status::Passed => "passed",
        }
    }

    /// Section this status is reported under.
    #[must_use]
    pub fn class(self) -> IssueClass {
        match self {
            Status::Failed | Status::Ambiguous => IssueClass::Failure,
            Status::Undefined | Status::Pending => IssueClass::Warning,
            Status::Passed | Status::Skipped => IssueClass::Silent,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

/// Raised when text does not name one of the six statuses.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown step status `{0}`")]
pub struct ParseStatusError(pub String);

impl FromStr for Status {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::REPORT_ORDER
            .into_iter()
            .find(|status| status.name() == s)
            .ok_or_else(|| ParseStatusError(s.to_owned()))
    }
}
