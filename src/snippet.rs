//! Snippet generation for undefined steps.
//!
//! The summary reporter asks a [`SnippetBuilder`] for suggested step
//! definition code whenever a step has no matching definition.

use crate::model::Step;

/// Produces skeleton code for a step with no definition.
pub trait SnippetBuilder: Send + Sync {
    fn build(&self, step: &Step) -> String;
}

impl<F> SnippetBuilder for F
where
    F: Fn(&Step) -> String + Send + Sync,
{
    fn build(&self, step: &Step) -> String { self(step) }
}

/// Emits a `cucumber` step function skeleton.
///
/// Quoted arguments become `{string}` parameters and bare integers become
/// `{int}` parameters.
///
/// ```
/// use featurerun::{model::Step, snippet::{SnippetBuilder, SyntaxSnippetBuilder}};
///
/// let snippet = SyntaxSnippetBuilder.build(&Step::new("Given ", "a user named \"ann\""));
/// assert!(snippet.starts_with("#[given(expr = \"a user named {string}\")]"));
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct SyntaxSnippetBuilder;

impl SnippetBuilder for SyntaxSnippetBuilder {
    fn build(&self, step: &Step) -> String {
        let attribute = match step.keyword.trim() {
            "When" => "when",
            "Then" => "then",
            _ => "given",
        };
        let (expression, params) = expression_for(step.name.as_deref().unwrap_or_default());
        let function = function_name(&expression);
        let mut args = vec!["world: &mut World".to_owned()];
        args.extend(
            params
                .iter()
                .enumerate()
                .map(|(i, ty)| format!("arg{}: {ty}", i + 1)),
        );
        format!(
            "#[{attribute}(expr = \"{expression}\")]\nfn {function}({}) {{\n    todo!(\"implement \
             step\")\n}}",
            args.join(", ")
        )
    }
}

/// Replace quoted strings and integers with cucumber expression parameters.
fn expression_for(name: &str) -> (String, Vec<&'static str>) {
    let mut expression = String::with_capacity(name.len());
    let mut params = Vec::new();
    let mut chars = name.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => {
                for inner in chars.by_ref() {
                    if inner == '"' {
                        break;
                    }
                }
                expression.push_str("{string}");
                params.push("String");
            }
            d if d.is_ascii_digit() && !ends_in_word(&expression) => {
                while chars.next_if(char::is_ascii_digit).is_some() {}
                expression.push_str("{int}");
                params.push("i64");
            }
            '\\' => expression.push_str("\\\\"),
            other => expression.push(other),
        }
    }
    (expression, params)
}

fn ends_in_word(text: &str) -> bool { text.chars().last().is_some_and(char::is_alphanumeric) }

fn function_name(expression: &str) -> String {
    let words: Vec<String> = expression
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty() && *word != "string" && *word != "int")
        .map(str::to_ascii_lowercase)
        .collect();
    match words.first() {
        None => "undefined_step".to_owned(),
        Some(first) if first.starts_with(|c: char| c.is_ascii_digit()) => {
            format!("step_{}", words.join("_"))
        }
        Some(_) => words.join("_"),
    }
}
