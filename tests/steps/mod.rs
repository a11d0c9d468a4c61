//! Step definitions for Cucumber behavioural tests.

mod lifecycle_steps;
mod report_steps;
