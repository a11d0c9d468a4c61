//! Data carried from the execution engine to reporting listeners.
//!
//! Every value here is produced by the engine and handed to listeners by
//! reference. Listeners read them; they never mutate them.

use std::{collections::BTreeMap, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::status::Status;

/// File and line a suite entity was declared at.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: PathBuf,
    pub line: u32,
}

impl SourceLocation {
    pub fn new(file: impl Into<PathBuf>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

/// A named scenario within a feature.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub location: SourceLocation,
}

impl Scenario {
    pub fn new(name: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            name: name.into(),
            location,
        }
    }
}

/// One step as written in a feature file.
///
/// `location` is absent for generated and hook steps. `scenario` is absent for
/// steps that belong to a background block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub keyword: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub location: Option<SourceLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario: Option<Scenario>,
}

impl Step {
    pub fn new(keyword: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            name: Some(name.into()),
            location: None,
            scenario: None,
        }
    }

    #[must_use]
    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    #[must_use]
    pub fn in_scenario(mut self, scenario: Scenario) -> Self {
        self.scenario = Some(scenario);
        self
    }

    /// Keyword followed by the step name, e.g. `Given a user`.
    #[must_use]
    pub fn text(&self) -> String {
        format!("{}{}", self.keyword, self.name.as_deref().unwrap_or_default())
    }
}

/// A pattern-matched implementation bound to steps at run time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDefinition {
    pub pattern: String,
    pub location: SourceLocation,
}

impl StepDefinition {
    pub fn new(pattern: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            pattern: pattern.into(),
            location,
        }
    }
}

/// Why a step failed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureDetail {
    pub message: String,
    #[serde(default)]
    pub trace: Option<String>,
}

impl FailureDetail {
    /// A failure with only an opaque textual representation.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            trace: None,
        }
    }

    /// A failure carrying a rendered trace.
    pub fn with_trace(message: impl Into<String>, trace: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            trace: Some(trace.into()),
        }
    }

    /// Trace text if a non-empty one was captured, else the textual form.
    #[must_use]
    pub fn report_text(&self) -> &str {
        self.trace
            .as_deref()
            .filter(|trace| !trace.is_empty())
            .unwrap_or(&self.message)
    }
}

/// Result of executing one step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepOutcome {
    pub status: Status,
    pub step: Step,
    #[serde(default)]
    pub matched_definition: Option<StepDefinition>,
    #[serde(default)]
    pub ambiguous_definitions: Vec<StepDefinition>,
    #[serde(default)]
    pub failure: Option<FailureDetail>,
    #[serde(default)]
    pub duration_millis: u64,
}

impl StepOutcome {
    pub fn new(status: Status, step: Step) -> Self {
        Self {
            status,
            step,
            matched_definition: None,
            ambiguous_definitions: Vec::new(),
            failure: None,
            duration_millis: 0,
        }
    }

    pub fn failed(step: Step, failure: FailureDetail) -> Self {
        Self {
            failure: Some(failure),
            ..Self::new(Status::Failed, step)
        }
    }

    pub fn ambiguous(step: Step, definitions: Vec<StepDefinition>) -> Self {
        Self {
            ambiguous_definitions: definitions,
            ..Self::new(Status::Ambiguous, step)
        }
    }

    #[must_use]
    pub fn with_definition(mut self, definition: StepDefinition) -> Self {
        self.matched_definition = Some(definition);
        self
    }

    #[must_use]
    pub fn with_duration(mut self, millis: u64) -> Self {
        self.duration_millis = millis;
        self
    }
}

/// Per-status tallies. Statuses never counted read as zero.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusCounts(BTreeMap<Status, u64>);

impl StatusCounts {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn get(&self, status: Status) -> u64 { self.0.get(&status).copied().unwrap_or(0) }

    pub fn increment(&mut self, status: Status) {
        let count = self.0.entry(status).or_insert(0);
        *count = count.saturating_add(1);
    }

    /// Sum of all tallies, saturating at `u64::MAX`.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.0
            .values()
            .fold(0, |sum, count| sum.saturating_add(*count))
    }

    /// Non-zero tallies in report order.
    pub fn iter_report_order(&self) -> impl Iterator<Item = (Status, u64)> + '_ {
        Status::REPORT_ORDER
            .into_iter()
            .map(|status| (status, self.get(status)))
            .filter(|(_, count)| *count > 0)
    }
}

impl FromIterator<(Status, u64)> for StatusCounts {
    fn from_iter<I: IntoIterator<Item = (Status, u64)>>(iter: I) -> Self {
        let mut counts = BTreeMap::new();
        for (status, count) in iter {
            let entry = counts.entry(status).or_insert(0_u64);
            *entry = entry.saturating_add(count);
        }
        Self(counts)
    }
}

/// Outcome of a whole run, produced once by the engine.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub scenario_counts: StatusCounts,
    pub step_counts: StatusCounts,
    pub duration_millis: u64,
    pub success: bool,
}

impl AggregateResult {
    /// Build a result, deriving `success` from the step tallies.
    ///
    /// Failed or ambiguous steps always fail the run. Under `strict`, pending
    /// and undefined steps fail it too.
    #[must_use]
    pub fn new(
        scenario_counts: StatusCounts,
        step_counts: StatusCounts,
        duration_millis: u64,
        strict: bool,
    ) -> Self {
        let broken = step_counts
            .get(Status::Failed)
            .saturating_add(step_counts.get(Status::Ambiguous));
        let incomplete = step_counts
            .get(Status::Undefined)
            .saturating_add(step_counts.get(Status::Pending));
        let success = broken == 0 && (!strict || incomplete == 0);
        Self {
            scenario_counts,
            step_counts,
            duration_millis,
            success,
        }
    }
}
