//! Explaining why a case failed, with the values involved printed out and
//! the point of difference singled out.

use serde::Serialize;
use tinytemplate::TinyTemplate;
use tracing::warn;

use crate::formatting::{value, Render};
use crate::language::Value;
use crate::running::RunError;

static TEMPLATE: &str = r#"{title} failed: {problem}
{{ for section in sections }}
{section.heading}:
{section.body}
{{ endfor }}"#;

#[derive(Serialize)]
struct Section {
    heading: String,
    body: String,
}

#[derive(Serialize)]
struct Context {
    title: String,
    problem: String,
    sections: Vec<Section>,
}

fn section(renderer: &impl Render, heading: &str, value: &Value, highlight: Option<&str>) -> Section {
    Section {
        heading: heading.to_string(),
        body: value::print(renderer, value, highlight),
    }
}

/// The mismatch path as it applies to the actual value. Indices into an
/// unordered array count expected elements, so past one of those the path
/// says nothing about where the actual value went wrong.
fn actual_path<'p>(expected: &Value, path: &'p str) -> Option<&'p str> {
    let mut value = expected;
    for segment in path.split('.') {
        value = match value {
            Value::Object(map) => match map.get(segment) {
                Some(child) => child,
                None => break,
            },
            Value::Ordered(items) => match segment
                .parse::<usize>()
                .ok()
                .and_then(|i| items.get(i))
            {
                Some(child) => child,
                None => break,
            },
            Value::Array(_) => return None,
            _ => break,
        };
    }
    Some(path)
}

fn sections(renderer: &impl Render, error: &RunError) -> Vec<Section> {
    match error {
        RunError::Status { body, .. } => vec![section(renderer, "Response", body, None)],
        RunError::Output {
            mismatch,
            post,
            actual,
            expected,
        } => vec![
            section(renderer, "Posted", post, None),
            section(renderer, "Received", actual, actual_path(expected, &mismatch.path)),
            section(renderer, "Expected", expected, Some(mismatch.path.as_str())),
        ],
        RunError::FindById {
            mismatch,
            actual,
            expected,
            ..
        } => vec![
            section(renderer, "Stored", actual, actual_path(expected, &mismatch.path)),
            section(renderer, "Expected", expected, Some(mismatch.path.as_str())),
        ],
        RunError::NotFound {
            expected,
            candidates,
            ..
        } => {
            let mut sections = vec![section(renderer, "Expected", expected, None)];
            for (i, (candidate, mismatch)) in candidates
                .iter()
                .enumerate()
            {
                let heading = format!("Candidate {} ({})", i + 1, mismatch.describe());
                sections.push(section(
                    renderer,
                    &heading,
                    candidate,
                    actual_path(expected, &mismatch.path),
                ));
            }
            sections
        }
        _ => Vec::new(),
    }
}

/// Describe a failed case, or a failed setup when the title says so.
pub fn failure_report(title: &str, error: &RunError, renderer: &impl Render) -> String {
    let context = Context {
        title: title.to_string(),
        problem: error.to_string(),
        sections: sections(renderer, error),
    };

    let mut tt = TinyTemplate::new();
    tt.set_default_formatter(&tinytemplate::format_unescaped);

    let rendered = tt
        .add_template("failure", TEMPLATE)
        .and_then(|_| tt.render("failure", &context));

    match rendered {
        Ok(text) => text
            .trim_end()
            .to_string(),
        Err(problem) => {
            warn!(?problem, "report template failed");
            format!("{} failed: {}", title, error)
        }
    }
}
