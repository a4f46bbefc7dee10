//! Checking an actual value against what a template says it should be.
//!
//! Objects are compared key by key, arrays either element by element (when
//! marked ordered) or by claiming, for each expected element in turn, the
//! first unclaimed actual element that matches it. That first-fit matching
//! can miss a pairing an exhaustive search would find.

use thiserror::Error;
use tracing::trace;

use crate::language::{Map, Value};

/// Where and why a comparison failed. The path is empty when the values
/// differ at the root.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct Mismatch {
    pub path: String,
    pub message: String,
}

impl Mismatch {
    fn new(path: &str, message: String) -> Mismatch {
        Mismatch {
            path: path.to_string(),
            message,
        }
    }

    /// The message with the location it applies to, for one line summaries.
    pub fn describe(&self) -> String {
        if self
            .path
            .is_empty()
        {
            self.message
                .clone()
        } else {
            format!("{} (at {})", self.message, self.path)
        }
    }
}

/// Compare an actual value to an expected one. In strict mode objects may
/// not carry keys the expected object doesn't name, apart from the ignored
/// keys at the root, and arrays must be of equal length.
pub fn compare(
    actual: &Value,
    expected: &Value,
    strict: bool,
    ignored: &[String],
) -> Result<(), Mismatch> {
    let comparator = Comparator { strict, ignored };
    comparator.compare(actual, expected, "")
}

struct Comparator<'a> {
    strict: bool,
    ignored: &'a [String],
}

fn join(path: &str, segment: impl std::fmt::Display) -> String {
    if path.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", path, segment)
    }
}

impl<'a> Comparator<'a> {
    fn compare(&self, actual: &Value, expected: &Value, path: &str) -> Result<(), Mismatch> {
        let actual = actual.normalize();
        let expected = expected.normalize();

        match expected.as_ref() {
            Value::Type(kind) => {
                if kind.accepts(&actual) {
                    Ok(())
                } else {
                    Err(Mismatch::new(
                        path,
                        format!("Expected an instance of {} but found {}", kind, describe(&actual)),
                    ))
                }
            }
            Value::Array(items) => {
                let found = self.as_array(&actual, items.len(), path)?;
                self.compare_unordered(found, items, path)
            }
            Value::Ordered(items) => {
                let found = self.as_array(&actual, items.len(), path)?;
                for (i, item) in items
                    .iter()
                    .enumerate()
                {
                    self.compare(&found[i], item, &join(path, i))?;
                }
                Ok(())
            }
            Value::Object(map) => match actual.as_ref() {
                Value::Object(found) => self.compare_objects(found, map, path),
                other => Err(Mismatch::new(
                    path,
                    format!("Expected an object but found {}", describe(other)),
                )),
            },
            scalar => {
                if scalars_equal(&actual, scalar) {
                    Ok(())
                } else {
                    Err(Mismatch::new(
                        path,
                        format!("Expected {} but found {}", describe(scalar), describe(&actual)),
                    ))
                }
            }
        }
    }

    /// Check the actual value is an array of acceptable length.
    fn as_array<'v>(
        &self,
        actual: &'v Value,
        expected: usize,
        path: &str,
    ) -> Result<&'v [Value], Mismatch> {
        let found = match actual {
            Value::Array(found) | Value::Ordered(found) => found,
            other => {
                return Err(Mismatch::new(
                    path,
                    format!("Expected an array but found {}", describe(other)),
                ))
            }
        };

        if self.strict && found.len() != expected {
            return Err(Mismatch::new(
                path,
                format!(
                    "Expected an array with {} elements but found {}",
                    expected,
                    found.len()
                ),
            ));
        }
        if found.len() < expected {
            return Err(Mismatch::new(
                path,
                format!(
                    "Expected an array with at least {} elements but found {}",
                    expected,
                    found.len()
                ),
            ));
        }

        Ok(found)
    }

    fn compare_unordered(
        &self,
        found: &[Value],
        items: &[Value],
        path: &str,
    ) -> Result<(), Mismatch> {
        let mut claimed = vec![false; found.len()];

        for (i, item) in items
            .iter()
            .enumerate()
        {
            let position = found
                .iter()
                .enumerate()
                .position(|(j, candidate)| {
                    !claimed[j]
                        && self
                            .compare(candidate, item, &join(path, j))
                            .is_ok()
                });

            match position {
                Some(j) => {
                    trace!(path, expected = i, actual = j, "claimed");
                    claimed[j] = true;
                }
                None => {
                    return Err(Mismatch::new(
                        &join(path, i),
                        format!(
                            "Unordered array mismatch: nothing matched the expected element {}",
                            i
                        ),
                    ));
                }
            }
        }

        Ok(())
    }

    fn compare_objects(&self, found: &Map, expected: &Map, path: &str) -> Result<(), Mismatch> {
        for (key, value) in expected {
            match found.get(key) {
                Some(actual) => self.compare(actual, value, &join(path, key))?,
                None => {
                    return Err(Mismatch::new(
                        &join(path, key),
                        format!("Missing key \"{}\"", key),
                    ));
                }
            }
        }

        if self.strict {
            let at_root = path.is_empty();
            for key in found.keys() {
                if expected.contains_key(key) {
                    continue;
                }
                if at_root
                    && self
                        .ignored
                        .contains(key)
                {
                    continue;
                }
                return Err(Mismatch::new(
                    &join(path, key),
                    format!("Unexpected key \"{}\"", key),
                ));
            }
        }

        Ok(())
    }
}

fn scalars_equal(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Number(_), Value::Number(_)) => actual.as_f64() == expected.as_f64(),
        _ => actual == expected,
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(number) => number.to_string(),
        Value::String(text) | Value::Id(text) => format!("{:?}", text),
        Value::Type(kind) => format!("type {}", kind),
        other => other
            .type_name()
            .to_string(),
    }
}
