//! Test world for summary report behavioural tests.
//!
//! [`ReportWorld`] accumulates a recorded suite from Given steps, replays it
//! through a [`Runtime`] with a [`SummaryReporter`] attached and keeps the
//! runtime around so later steps can probe its lifecycle.

use cucumber::World;
use featurerun::{
    RuntimeError,
    config::RunOptions,
    engine::{RecordedScenario, RecordedStep, RecordedSuite, ReplayEngine},
    listener::{ListenerConfig, SharedBuffer},
    model::{FailureDetail, SourceLocation},
    runtime::{Runtime, SupportCode},
    status::Status,
    summary::SummaryReporter,
};

const BASE_DIR: &str = "/repo";

#[derive(Debug, Default, World)]
pub struct ReportWorld {
    suite: RecordedSuite,
    options: RunOptions,
    report: SharedBuffer,
    runtime: Option<Runtime<ReplayEngine, SupportCode>>,
    success: Option<bool>,
}

impl ReportWorld {
    /// Append a scenario declared at `file:line`, relative to the base dir.
    pub fn add_scenario(&mut self, name: &str, file: &str, line: u32) {
        self.suite.scenarios.push(RecordedScenario {
            name: name.to_owned(),
            location: SourceLocation::new(format!("{BASE_DIR}/{file}"), line),
            steps: Vec::new(),
        });
    }

    /// Append a step to the most recent scenario.
    ///
    /// # Panics
    /// Panics if no scenario has been declared yet.
    pub fn add_step(&mut self, name: &str, status: Status, failure: Option<&str>) {
        let scenario = self
            .suite
            .scenarios
            .last_mut()
            .expect("declare a scenario before its steps");
        let line = scenario.location.line + u32::try_from(scenario.steps.len()).unwrap_or(0) + 1;
        let location = SourceLocation::new(scenario.location.file.clone(), line);
        scenario.steps.push(RecordedStep {
            keyword: "Given ".to_owned(),
            name: Some(name.to_owned()),
            location: Some(location),
            background: false,
            status,
            duration_millis: 10,
            failure: failure.map(FailureDetail::message),
            matched_definition: None,
            ambiguous_definitions: Vec::new(),
        });
    }

    pub fn enable_fail_fast(&mut self) { self.options = self.options.fail_fast(true); }

    /// Replay the suite and capture the report.
    ///
    /// # Panics
    /// Panics if the run fails.
    pub async fn replay(&mut self) {
        let config = ListenerConfig::new(self.report.clone()).with_base_dir(BASE_DIR);
        let mut runtime = Runtime::<ReplayEngine, _>::new(
            std::mem::take(&mut self.suite),
            self.options,
            SupportCode::new(),
        );
        runtime
            .attach_listener(SummaryReporter::new(config))
            .expect("attach reporter");
        let result = runtime.start().await.expect("run completes");
        self.success = Some(result.success);
        self.runtime = Some(runtime);
    }

    #[must_use]
    pub fn report(&self) -> String { self.report.contents() }

    /// Text of the named section, up to the next section or the counts.
    #[must_use]
    pub fn section(&self, title: &str) -> Option<String> {
        let report = self.report();
        let start = report.find(&format!("{title}:\n\n"))?;
        let body = &report[start..];
        let end = body
            .find("Warnings:\n\n")
            .filter(|&i| i > 0)
            .or_else(|| body.find(" scenario"))
            .unwrap_or(body.len());
        Some(body[..end].to_owned())
    }

    /// Attempt a second start on the finished runtime.
    ///
    /// # Panics
    /// Panics if no run has completed.
    pub async fn restart(&mut self) -> Result<(), RuntimeError> {
        let runtime = self.runtime.as_mut().expect("run has completed");
        runtime.start().await.map(|_| ())
    }

    /// Attempt to attach another reporter to the finished runtime.
    ///
    /// # Panics
    /// Panics if no run has completed.
    pub fn attach_late(&mut self) -> Result<(), RuntimeError> {
        let runtime = self.runtime.as_mut().expect("run has completed");
        runtime.attach_listener(SummaryReporter::new(ListenerConfig::new(SharedBuffer::new())))
    }

    #[must_use]
    pub fn succeeded(&self) -> Option<bool> { self.success }
}
