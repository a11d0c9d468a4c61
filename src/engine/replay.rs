//! Engine replaying a recorded suite.
//!
//! A [`RecordedSuite`] holds the outcome each step produced when the suite was
//! last executed. [`ReplayEngine`] walks it in order and re-derives the
//! statuses a live run would report under the given [`RunOptions`]:
//!
//! - once a scenario stops passing, its remaining steps are skipped;
//! - under `dry_run` no step is executed, so every step is skipped;
//! - under `fail_fast` every scenario after a failing one is skipped.
//!
//! Undefined and ambiguous steps keep their status in all three cases, since
//! they are detected before execution.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{EngineContext, EngineError, ExecutionEngine};
use crate::{
    bus::EventBus,
    config::RunOptions,
    diagnostics::StackTraceFilter,
    model::{
        AggregateResult,
        FailureDetail,
        Scenario,
        SourceLocation,
        StatusCounts,
        Step,
        StepDefinition,
        StepOutcome,
    },
    status::{IssueClass, Status},
};

/// A previously executed suite.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedSuite {
    #[serde(default)]
    pub scenarios: Vec<RecordedScenario>,
}

/// A scenario and the steps it ran, background steps included.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedScenario {
    pub name: String,
    pub location: SourceLocation,
    #[serde(default)]
    pub steps: Vec<RecordedStep>,
}

/// One step together with its recorded outcome.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedStep {
    pub keyword: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub location: Option<SourceLocation>,
    /// Step comes from the feature's background block.
    #[serde(default)]
    pub background: bool,
    pub status: Status,
    #[serde(default)]
    pub duration_millis: u64,
    #[serde(default)]
    pub failure: Option<FailureDetail>,
    #[serde(default)]
    pub matched_definition: Option<StepDefinition>,
    #[serde(default)]
    pub ambiguous_definitions: Vec<StepDefinition>,
}

/// [`ExecutionEngine`] over a [`RecordedSuite`].
#[derive(Debug)]
pub struct ReplayEngine {
    bus: EventBus,
    suite: RecordedSuite,
    options: RunOptions,
}

#[async_trait]
impl ExecutionEngine for ReplayEngine {
    type Features = RecordedSuite;

    fn new(context: EngineContext<RecordedSuite>) -> Self {
        Self {
            bus: context.event_bus,
            suite: context.features,
            options: context.options,
        }
    }

    async fn run(self) -> Result<AggregateResult, EngineError> {
        let mut scenario_counts = StatusCounts::new();
        let mut step_counts = StatusCounts::new();
        let mut duration_millis: u64 = 0;
        let mut halted = false;

        for recorded in &self.suite.scenarios {
            let scenario = Scenario::new(recorded.name.clone(), recorded.location.clone());
            let mut scenario_status = Status::Passed;
            for recorded_step in &recorded.steps {
                let skipping = halted || self.options.dry_run || scenario_status != Status::Passed;
                let outcome = replay_step(&scenario, recorded_step, skipping);
                scenario_status = merge_scenario_status(scenario_status, outcome.status);
                step_counts.increment(outcome.status);
                duration_millis = duration_millis.saturating_add(outcome.duration_millis);
                self.bus.emit_step_outcome(&outcome).await?;
            }
            debug!(scenario = %scenario.name, status = %scenario_status, "scenario replayed");
            scenario_counts.increment(scenario_status);
            if self.options.fail_fast && scenario_status.class() == IssueClass::Failure {
                halted = true;
            }
        }

        Ok(AggregateResult::new(
            scenario_counts,
            step_counts,
            duration_millis,
            self.options.strict,
        ))
    }
}

fn replay_step(scenario: &Scenario, recorded: &RecordedStep, skipping: bool) -> StepOutcome {
    let step = Step {
        keyword: recorded.keyword.clone(),
        name: recorded.name.clone(),
        location: recorded.location.clone(),
        scenario: (!recorded.background).then(|| scenario.clone()),
    };
    let status = match recorded.status {
        Status::Undefined | Status::Ambiguous => recorded.status,
        _ if skipping => Status::Skipped,
        other => other,
    };
    let mut outcome = StepOutcome::new(status, step);
    match status {
        Status::Undefined => {}
        Status::Ambiguous => {
            outcome
                .ambiguous_definitions
                .clone_from(&recorded.ambiguous_definitions);
        }
        Status::Failed => {
            outcome.matched_definition.clone_from(&recorded.matched_definition);
            outcome.failure = recorded.failure.as_ref().map(filtered);
            outcome.duration_millis = recorded.duration_millis;
        }
        Status::Pending | Status::Passed => {
            outcome.matched_definition.clone_from(&recorded.matched_definition);
            outcome.duration_millis = recorded.duration_millis;
        }
        Status::Skipped => {
            outcome.matched_definition.clone_from(&recorded.matched_definition);
        }
    }
    outcome
}

fn filtered(failure: &FailureDetail) -> FailureDetail {
    FailureDetail {
        message: failure.message.clone(),
        trace: failure.trace.as_deref().map(StackTraceFilter::apply),
    }
}

/// Fold a step status into the scenario status.
///
/// A failure always wins; any other non-passing status only replaces a status
/// that is still passing.
fn merge_scenario_status(current: Status, step: Status) -> Status {
    match step {
        Status::Failed => Status::Failed,
        Status::Passed => current,
        _ if current == Status::Passed => step,
        _ => current,
    }
}
