//! Turning templates into values.

use tracing::trace;

use crate::language::{Map, Node, Value};

mod context;
mod error;
mod interpreter;
mod mixin;

pub use context::{Base, Binding, Context, Helper};
pub use error::{EvaluationError, MixinError};
pub use interpreter::Interpreter;

/// The seam where expression source text gets its meaning. The default is
/// the Interpreter; embedders can substitute their own.
pub trait Evaluate {
    fn evaluate(&self, source: &str, context: &Context) -> Result<Value, String>;
}

/// Evaluate a template. The label names where in the document the template
/// came from, and is extended with each key and index on the way down so
/// that failures can say exactly which part was at fault.
pub fn evaluate(
    node: &Node,
    context: &Context,
    evaluator: &dyn Evaluate,
    label: &str,
) -> Result<Value, EvaluationError> {
    match node {
        Node::Expression(source) => {
            trace!(label, source, "evaluating");
            evaluator
                .evaluate(source, context)
                .map_err(|message| EvaluationError::Expression {
                    label: label.to_string(),
                    expression: source.to_string(),
                    message,
                })
        }
        Node::Array(items) => {
            let mut values = Vec::with_capacity(items.len());
            for (i, item) in items
                .iter()
                .enumerate()
            {
                values.push(evaluate(item, context, evaluator, &format!("{}.{}", label, i))?);
            }
            Ok(Value::Array(values))
        }
        Node::Object(entries) => {
            let mut map = Map::new();
            for (key, entry) in entries {
                let value = evaluate(&entry.node, context, evaluator, &format!("{}.{}", label, key))?;
                if entry.optional && value == Value::Null {
                    continue;
                }
                map.insert(key.to_string(), value);
            }
            Ok(Value::Object(map))
        }
        Node::Mixin(mixin) => {
            let failed = |error| EvaluationError::Mixin {
                label: label.to_string(),
                error,
            };

            let (first, rest) = match mixin
                .base
                .0
                .split_first()
            {
                Some(split) => split,
                None => return Err(failed(MixinError::NotNavigable(String::new()))),
            };
            let name = first.key();
            let root = evaluator
                .evaluate(&name, context)
                .map_err(|message| EvaluationError::Expression {
                    label: label.to_string(),
                    expression: name.clone(),
                    message,
                })?;

            let mut value = mixin::navigate(&root, rest, &name)
                .map_err(failed)?
                .clone();
            let walked = mixin
                .base
                .to_string();

            for path in &mixin.removals {
                mixin::remove(&mut value, &path.0, &walked).map_err(failed)?;
            }
            for addition in &mixin.additions {
                let inner = format!("{}.{}", label, addition.path);
                let added = evaluate(&addition.node, context, evaluator, &inner)?;
                if addition.optional && added == Value::Null {
                    continue;
                }
                mixin::add(&mut value, &addition.path.0, &added, &walked).map_err(failed)?;
            }

            Ok(value)
        }
    }
}
