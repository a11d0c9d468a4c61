//! Summary report listener.
//!
//! [`SummaryReporter`] files each non-passing step outcome as an [`Issue`]
//! while the run progresses and renders the whole report once the aggregate
//! result arrives. The report layout is:
//!
//! ```text
//! Failures:
//!
//! 1) Scenario: <name> - <location>
//!    Step: <keyword><name> - <location>
//!    Step Definition: <location>
//!    Message:
//!      <message>
//!
//! Warnings:
//!
//! 1) ...
//!
//! <n> scenarios (<count> <status>, ...)
//! <n> steps (<count> <status>, ...)
//! <minutes>m<seconds>.<millis>s
//! ```

mod format;

use async_trait::async_trait;
pub use format::{format_count_summary, format_duration, indent};

use crate::{
    listener::{ListenerConfig, ReportingListener},
    model::{AggregateResult, FailureDetail, StepOutcome},
    status::Status,
};

/// A failure or warning recorded for the report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Issue {
    pub message: String,
    pub outcome: StepOutcome,
}

/// Listener rendering the end-of-run summary.
#[derive(Debug)]
pub struct SummaryReporter {
    config: ListenerConfig,
    failures: Vec<Issue>,
    warnings: Vec<Issue>,
}

impl SummaryReporter {
    #[must_use]
    pub fn new(config: ListenerConfig) -> Self {
        Self {
            config,
            failures: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Failures recorded so far, in first-seen order.
    #[must_use]
    pub fn failures(&self) -> &[Issue] { &self.failures }

    /// Warnings recorded so far, in first-seen order.
    #[must_use]
    pub fn warnings(&self) -> &[Issue] { &self.warnings }

    /// File `outcome` under failures or warnings. Silent statuses are ignored.
    pub fn record(&mut self, outcome: &StepOutcome) {
        match outcome.status {
            Status::Ambiguous => {
                let message =
                    format::ambiguous_message(&outcome.ambiguous_definitions, &self.config);
                self.push_failure(message, outcome);
            }
            Status::Failed => {
                let message = outcome
                    .failure
                    .as_ref()
                    .map(FailureDetail::report_text)
                    .filter(|text| !text.is_empty())
                    .unwrap_or("Failed")
                    .to_owned();
                self.push_failure(message, outcome);
            }
            Status::Pending => self.push_warning("Pending".to_owned(), outcome),
            Status::Undefined => {
                let snippet = self.config.snippet_builder.build(&outcome.step);
                self.push_warning(format::undefined_message(&snippet), outcome);
            }
            Status::Passed | Status::Skipped => {}
        }
    }

    /// Render the full report for `result` into a string.
    #[must_use]
    pub fn render(&self, result: &AggregateResult) -> String {
        let mut text = String::new();
        for (title, issues) in [("Failures", &self.failures), ("Warnings", &self.warnings)] {
            if issues.is_empty() {
                continue;
            }
            text.push_str(title);
            text.push_str(":\n\n");
            for (index, issue) in issues.iter().enumerate() {
                text.push_str(&format::format_issue(index + 1, issue, &self.config));
            }
        }
        let styles = self.config.styles();
        text.push_str(&format_count_summary(
            "scenario",
            &result.scenario_counts,
            styles,
        ));
        text.push_str(&format_count_summary("step", &result.step_counts, styles));
        text.push_str(&format_duration(result.duration_millis));
        text
    }

    fn push_failure(&mut self, message: String, outcome: &StepOutcome) {
        self.failures.push(Issue {
            message,
            outcome: outcome.clone(),
        });
    }

    fn push_warning(&mut self, message: String, outcome: &StepOutcome) {
        self.warnings.push(Issue {
            message,
            outcome: outcome.clone(),
        });
    }
}

#[async_trait]
impl ReportingListener for SummaryReporter {
    async fn on_step_outcome(&mut self, outcome: &StepOutcome) { self.record(outcome); }

    async fn on_run_complete(&mut self, result: &AggregateResult) {
        let report = self.render(result);
        self.config.write(&report);
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;
    use crate::{
        listener::{SharedBuffer, StyleKey, StyleTable},
        model::{Scenario, SourceLocation, StatusCounts, Step, StepDefinition},
    };

    fn scenario() -> Scenario {
        Scenario::new(
            "Checkout",
            SourceLocation::new("/repo/features/cart.feature", 3),
        )
    }

    fn step(name: &str, line: u32) -> Step {
        Step::new("Given ", name)
            .at(SourceLocation::new("/repo/features/cart.feature", line))
            .in_scenario(scenario())
    }

    #[fixture]
    fn buffer() -> SharedBuffer { SharedBuffer::new() }

    fn reporter(buffer: &SharedBuffer) -> SummaryReporter {
        SummaryReporter::new(
            ListenerConfig::new(buffer.clone())
                .with_base_dir("/repo")
                .with_snippet_builder(|step: &Step| format!("snippet for {}", step.text())),
        )
    }

    #[rstest]
    #[case(Status::Passed)]
    #[case(Status::Skipped)]
    fn silent_statuses_record_nothing(buffer: SharedBuffer, #[case] status: Status) {
        let mut reporter = reporter(&buffer);
        reporter.record(&StepOutcome::new(status, step("a cart", 4)));
        assert!(reporter.failures().is_empty());
        assert!(reporter.warnings().is_empty());
    }

    #[rstest]
    fn failed_step_uses_trace_text(buffer: SharedBuffer) {
        let mut reporter = reporter(&buffer);
        reporter.record(&StepOutcome::failed(
            step("a cart", 4),
            FailureDetail::with_trace("boom", "boom\nat cart.rs:9"),
        ));
        assert_eq!(reporter.failures()[0].message, "boom\nat cart.rs:9");
    }

    #[rstest]
    #[case::empty_trace(FailureDetail::with_trace("boom", ""), "boom")]
    #[case::empty_message(FailureDetail::message(""), "Failed")]
    #[case::both_empty(FailureDetail::with_trace("", ""), "Failed")]
    fn empty_failure_text_never_yields_empty_message(
        buffer: SharedBuffer,
        #[case] failure: FailureDetail,
        #[case] expected: &str,
    ) {
        let mut reporter = reporter(&buffer);
        reporter.record(&StepOutcome::failed(step("a cart", 4), failure));
        assert_eq!(reporter.failures()[0].message, expected);
    }

    #[rstest]
    fn failed_step_without_detail_still_has_message(buffer: SharedBuffer) {
        let mut reporter = reporter(&buffer);
        reporter.record(&StepOutcome::new(Status::Failed, step("a cart", 4)));
        assert_eq!(reporter.failures()[0].message, "Failed");
    }

    #[rstest]
    fn pending_step_is_a_warning(buffer: SharedBuffer) {
        let mut reporter = reporter(&buffer);
        reporter.record(&StepOutcome::new(Status::Pending, step("a cart", 4)));
        assert_eq!(reporter.warnings()[0].message, "Pending");
        assert!(reporter.failures().is_empty());
    }

    #[rstest]
    fn undefined_step_embeds_snippet(buffer: SharedBuffer) {
        let mut reporter = reporter(&buffer);
        reporter.record(&StepOutcome::new(Status::Undefined, step("a cart", 4)));
        assert_eq!(
            reporter.warnings()[0].message,
            "Undefined. Implement with the following snippet:\n\n  snippet for Given a cart"
        );
    }

    #[rstest]
    fn ambiguous_step_lists_definitions(buffer: SharedBuffer) {
        let mut reporter = reporter(&buffer);
        reporter.record(&StepOutcome::ambiguous(
            step("a cart", 4),
            vec![
                StepDefinition::new("a cart", SourceLocation::new("/repo/steps/cart.rs", 2)),
                StepDefinition::new("a (.*)", SourceLocation::new("/repo/steps/any.rs", 8)),
            ],
        ));
        assert_eq!(
            reporter.failures()[0].message,
            "Multiple step definitions match:\n  a cart - steps/cart.rs:2\n  a (.*) - steps/any.rs:8"
        );
    }

    #[rstest]
    fn issues_keep_first_seen_order(buffer: SharedBuffer) {
        let mut reporter = reporter(&buffer);
        for (name, line) in [("first", 4), ("second", 5), ("third", 6)] {
            reporter.record(&StepOutcome::failed(
                step(name, line),
                FailureDetail::message(name),
            ));
        }
        let messages: Vec<_> = reporter
            .failures()
            .iter()
            .map(|issue| issue.message.as_str())
            .collect();
        assert_eq!(messages, vec!["first", "second", "third"]);
    }

    #[rstest]
    #[tokio::test]
    async fn clean_run_has_no_issue_sections(buffer: SharedBuffer) {
        let mut reporter = reporter(&buffer);
        reporter
            .on_step_outcome(&StepOutcome::new(Status::Passed, step("a cart", 4)))
            .await;
        let result = AggregateResult::new(
            [(Status::Passed, 1)].into_iter().collect(),
            [(Status::Passed, 1)].into_iter().collect(),
            1_250,
            false,
        );
        reporter.on_run_complete(&result).await;
        assert_eq!(
            buffer.contents(),
            "1 scenario (1 passed)\n1 step (1 passed)\n0m1.250s\n"
        );
    }

    #[rstest]
    #[tokio::test]
    async fn renders_failures_before_warnings(buffer: SharedBuffer) {
        let mut reporter = reporter(&buffer);
        let failed = StepOutcome::failed(step("a cart", 4), FailureDetail::message("boom"))
            .with_definition(StepDefinition::new(
                "a cart",
                SourceLocation::new("/repo/steps/cart.rs", 2),
            ));
        let undefined = StepOutcome::new(Status::Undefined, step("an item", 5));
        reporter.on_step_outcome(&undefined).await;
        reporter.on_step_outcome(&failed).await;

        let result = AggregateResult::new(
            [(Status::Failed, 1)].into_iter().collect(),
            [(Status::Undefined, 1), (Status::Failed, 1)]
                .into_iter()
                .collect(),
            125_500,
            false,
        );
        reporter.on_run_complete(&result).await;

        let expected = "Failures:\n\n1) Scenario: Checkout - features/cart.feature:3\n   Step: \
                        Given a cart - features/cart.feature:4\n   Step Definition: \
                        steps/cart.rs:2\n   Message:\n     boom\n\nWarnings:\n\n1) Scenario: \
                        Checkout - features/cart.feature:3\n   Step: Given an item - \
                        features/cart.feature:5\n   Message:\n     Undefined. Implement with \
                        the following snippet:\n\n       snippet for Given an item\n\n1 scenario \
                        (1 failed)\n2 steps (1 failed, 1 undefined)\n2m5.500s\n";
        assert_eq!(buffer.contents(), expected);
    }

    #[rstest]
    fn background_step_without_location(buffer: SharedBuffer) {
        let mut reporter = reporter(&buffer);
        let mut background = Step::new("Given ", "a logged in user");
        background.name = None;
        reporter.record(&StepOutcome::new(Status::Pending, background));
        let report = reporter.render(&AggregateResult::default());
        assert!(
            report.starts_with("Warnings:\n\n1) Background:\n   Step: Given \n   Message:\n     Pending\n\n"),
            "{report}"
        );
    }

    #[rstest]
    fn issue_blocks_are_numbered_per_section(buffer: SharedBuffer) {
        let mut reporter = reporter(&buffer);
        for line in 4..6 {
            reporter.record(&StepOutcome::new(Status::Pending, step("wait", line)));
        }
        reporter.record(&StepOutcome::failed(
            step("boom", 7),
            FailureDetail::message("boom"),
        ));
        let report = reporter.render(&AggregateResult::default());
        let failures = report.find("Failures:").expect("failures section");
        let warnings = report.find("Warnings:").expect("warnings section");
        assert!(failures < warnings);
        assert_eq!(report.matches("1) Scenario").count(), 2);
        assert_eq!(report.matches("2) Scenario").count(), 1);
    }

    #[rstest]
    fn styles_are_applied_to_report_parts(buffer: SharedBuffer) {
        let styles = StyleTable::plain()
            .with_style(StyleKey::Bold, |t: &str| format!("*{t}*"))
            .with_style(StyleKey::Location, |t: &str| format!("[{t}]"))
            .with_style(Status::Failed, |t: &str| format!("!{t}!"));
        let mut reporter = SummaryReporter::new(
            ListenerConfig::new(buffer.clone())
                .with_base_dir("/repo")
                .with_styles(styles),
        );
        reporter.record(&StepOutcome::failed(
            step("a cart", 4),
            FailureDetail::message("boom"),
        ));
        let report = reporter.render(&AggregateResult::new(
            StatusCounts::new(),
            [(Status::Failed, 1)].into_iter().collect(),
            0,
            false,
        ));
        assert!(report.contains(
            "1) Scenario: *Checkout* - [features/cart.feature:3]\n   Step: *Given a cart* - \
             [features/cart.feature:4]\n   Message:\n     !boom!\n\n"
        ));
        assert!(report.contains("1 step (!1 failed!)\n"));
    }
}
