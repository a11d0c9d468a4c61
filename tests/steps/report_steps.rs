//! Step definitions for summary report scenarios.

use cucumber::{given, then, when};
use featurerun::status::Status;

use crate::world::ReportWorld;

#[given(expr = "a scenario {string} in {string} at line {int}")]
fn a_scenario(world: &mut ReportWorld, name: String, file: String, line: u32) {
    world.add_scenario(&name, &file, line);
}

#[given(expr = "a step {string} that failed with {string}")]
fn a_failed_step(world: &mut ReportWorld, name: String, message: String) {
    world.add_step(&name, Status::Failed, Some(&message));
}

#[given(expr = "a step {string} that is {word}")]
fn a_step_with_status(world: &mut ReportWorld, name: String, status: String) {
    let status: Status = status.parse().expect("known status");
    world.add_step(&name, status, None);
}

#[given("the run stops at the first failure")]
fn fail_fast(world: &mut ReportWorld) { world.enable_fail_fast(); }

#[when("the run completes")]
async fn run_completes(world: &mut ReportWorld) { world.replay().await; }

#[then(expr = "the {word} section lists {int} issue(s)")]
fn section_lists(world: &mut ReportWorld, section: String, count: usize) {
    let title = match section.as_str() {
        "failures" => "Failures",
        "warnings" => "Warnings",
        other => panic!("unknown section {other}"),
    };
    let body = world
        .section(title)
        .unwrap_or_else(|| panic!("missing {title} section in:\n{}", world.report()));
    assert_eq!(body.matches("   Message:\n").count(), count, "{body}");
}

#[then("the failures section precedes the warnings section")]
fn failures_first(world: &mut ReportWorld) {
    let report = world.report();
    let failures = report.find("Failures:").expect("failures section");
    let warnings = report.find("Warnings:").expect("warnings section");
    assert!(failures < warnings, "{report}");
}

#[then(expr = "the report has no {string} section")]
fn no_section(world: &mut ReportWorld, header: String) {
    let report = world.report();
    assert!(!report.contains(&header), "{report}");
}

#[then(expr = "the report contains {string}")]
fn report_contains(world: &mut ReportWorld, text: String) {
    let report = world.report();
    assert!(report.contains(&text), "{report}");
}

#[then(expr = "the run is reported as {word}")]
fn run_outcome(world: &mut ReportWorld, outcome: String) {
    let expected = match outcome.as_str() {
        "successful" => true,
        "unsuccessful" => false,
        other => panic!("unknown outcome {other}"),
    };
    assert_eq!(world.succeeded(), Some(expected));
}
