use owo_colors::OwoColorize;
use std::path::Path;

use super::messages::generate_error_message;
use crate::formatting::Render;
use crate::language::{LoadingError, Span};
use crate::parsing::error::ParsingError;

/// How many lines of context to show either side of the problem.
const CONTEXT: usize = 3;

/// Format a parsing error with full details including the surrounding source
/// lines, the offending ones marked.
pub fn full_parsing_error<'i>(
    error: &ParsingError,
    filename: &'i Path,
    source: &'i str,
    renderer: &impl Render,
) -> String {
    let (problem, details) = generate_error_message(error, renderer);
    let spans = error.spans();
    let line = error
        .span()
        .begin
        + 1;

    let lines: Vec<&str> = source
        .lines()
        .collect();
    let covered = spans
        .iter()
        .copied()
        .reduce(Span::join)
        .unwrap_or(Span::line(0));
    let start = covered
        .begin
        .saturating_sub(CONTEXT);
    let end = (covered.end + CONTEXT).min(lines.len());
    let width = 3.max(
        end.to_string()
            .len(),
    );

    let mut window = String::new();
    for i in start..end {
        let marked = spans
            .iter()
            .any(|span| span.begin <= i && i < span.end);
        let marker = if marked {
            '>'.bright_red()
                .to_string()
        } else {
            " ".to_string()
        };
        window.push_str(&format!(
            "{:>width$} {} {} {}\n",
            (i + 1).bright_blue(),
            '|'.bright_blue(),
            marker,
            lines[i]
        ));
    }

    format!(
        r#"
{}: {}:{} {}

{:width$} {}
{}{:width$} {}

{}
        "#,
        "error".bright_red(),
        filename.to_string_lossy(),
        line,
        problem.bold(),
        ' ',
        '|'.bright_blue(),
        window,
        ' ',
        '|'.bright_blue(),
        details
    )
    .trim_ascii()
    .to_string()
}

/// Format a parsing error with concise single-line output
pub fn concise_parsing_error<'i>(
    error: &ParsingError,
    filename: &'i Path,
    renderer: &impl Render,
) -> String {
    let (problem, _) = generate_error_message(error, renderer);
    let line = error
        .span()
        .begin
        + 1;

    format!(
        "{}: {}:{} {}",
        "error".bright_red(),
        filename.to_string_lossy(),
        line,
        problem.bold(),
    )
}

/// Format a LoadingError with concise single-line output
pub fn concise_loading_error<'i>(error: &LoadingError<'i>) -> String {
    format!(
        "{}: {}: {}",
        "error".bright_red(),
        error
            .filename
            .display(),
        error
            .problem
            .bold()
    )
}
