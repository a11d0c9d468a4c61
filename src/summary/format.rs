//! Pure text rendering for the summary report.

use crate::{
    listener::{ListenerConfig, StyleKey, StyleTable},
    model::{StatusCounts, StepDefinition},
    summary::Issue,
};

const AMBIGUOUS_HEADER: &str = "Multiple step definitions match:";
const UNDEFINED_HEADER: &str = "Undefined. Implement with the following snippet:";
const COLUMN_SEPARATOR: &str = " - ";

/// Indent every non-blank line of `text` by `spaces`.
#[must_use]
pub fn indent(text: &str, spaces: usize) -> String {
    let pad = " ".repeat(spaces);
    text.split('\n')
        .map(|line| {
            if line.trim().is_empty() {
                line.to_owned()
            } else {
                format!("{pad}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Message recorded for an ambiguous match.
pub(crate) fn ambiguous_message(definitions: &[StepDefinition], config: &ListenerConfig) -> String {
    let rows: Vec<(&str, String)> = definitions
        .iter()
        .map(|definition| {
            (
                definition.pattern.as_str(),
                config.format_location(&definition.location),
            )
        })
        .collect();
    let width = rows
        .iter()
        .map(|(pattern, _)| pattern.chars().count())
        .max()
        .unwrap_or(0);
    let table = rows
        .iter()
        .map(|(pattern, location)| format!("{pattern:<width$}{COLUMN_SEPARATOR}{location}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!("{AMBIGUOUS_HEADER}\n{}", indent(&table, 2))
}

/// Message recorded for an undefined step.
pub(crate) fn undefined_message(snippet: &str) -> String {
    format!("{UNDEFINED_HEADER}\n\n{}", indent(snippet, 2))
}

/// Render one numbered issue block, including its trailing blank line.
pub(crate) fn format_issue(number: usize, issue: &Issue, config: &ListenerConfig) -> String {
    let prefix = format!("{number}) ");
    let width = prefix.len();
    let styles = config.styles();
    let step = &issue.outcome.step;

    let mut text = prefix;
    match &step.scenario {
        Some(scenario) => {
            text.push_str("Scenario: ");
            text.push_str(&styles.apply(StyleKey::Bold, &scenario.name));
            text.push_str(" - ");
            text.push_str(&styles.apply(
                StyleKey::Location,
                &config.format_location(&scenario.location),
            ));
        }
        None => text.push_str("Background:"),
    }
    text.push('\n');

    let mut step_line = format!("Step: {}", styles.apply(StyleKey::Bold, &step.text()));
    if let Some(location) = &step.location {
        step_line.push_str(" - ");
        step_line.push_str(&styles.apply(StyleKey::Location, &config.format_location(location)));
    }
    text.push_str(&indent(&step_line, width));
    text.push('\n');

    if let Some(definition) = &issue.outcome.matched_definition {
        let definition_line = format!(
            "Step Definition: {}",
            styles.apply(
                StyleKey::Location,
                &config.format_location(&definition.location)
            )
        );
        text.push_str(&indent(&definition_line, width));
        text.push('\n');
    }

    text.push_str(&indent("Message:", width));
    text.push('\n');
    let message = styles.apply(issue.outcome.status, &issue.message);
    text.push_str(&indent(&message, width + 2));
    text.push_str("\n\n");
    text
}

/// `<total> <label>[s][ (<count> <status>, ...)]` followed by a newline.
///
/// ```
/// use featurerun::{listener::StyleTable, model::StatusCounts, status::Status, summary};
///
/// let counts: StatusCounts = [(Status::Passed, 2), (Status::Failed, 1)].into_iter().collect();
/// assert_eq!(
///     summary::format_count_summary("step", &counts, &StyleTable::plain()),
///     "3 steps (1 failed, 2 passed)\n"
/// );
/// ```
#[must_use]
pub fn format_count_summary(label: &str, counts: &StatusCounts, styles: &StyleTable) -> String {
    let total = counts.total();
    let plural = if total == 1 { "" } else { "s" };
    let mut text = format!("{total} {label}{plural}");
    if total > 0 {
        let details = counts
            .iter_report_order()
            .map(|(status, count)| styles.apply(status, &format!("{count} {status}")))
            .collect::<Vec<_>>()
            .join(", ");
        text.push_str(" (");
        text.push_str(&details);
        text.push(')');
    }
    text.push('\n');
    text
}

/// `<minutes>m<seconds>.<millis>s` followed by a newline.
///
/// ```
/// assert_eq!(featurerun::summary::format_duration(125_500), "2m5.500s\n");
/// ```
#[must_use]
pub fn format_duration(duration_millis: u64) -> String {
    let minutes = duration_millis / 60_000;
    let remaining = duration_millis % 60_000;
    let seconds = remaining / 1000;
    let millis = remaining % 1000;
    format!("{minutes}m{seconds}.{millis:03}s\n")
}
