//! Looking for documents in the datastore that match a Find template.

use tracing::debug;

use crate::comparison::compare;
use crate::evaluation::{evaluate, Context, Evaluate};
use crate::language::{Find, Value};
use crate::running::error::RunError;
use crate::running::{Options, Storage};

/// Succeeds if the collection holds a document matching the template. A
/// template naming an `_id` is looked up directly, otherwise every document
/// is tried and the first match wins.
pub async fn resolve<S: Storage>(
    storage: &mut S,
    find: &Find<'_>,
    context: &Context,
    evaluator: &dyn Evaluate,
    options: &Options,
) -> Result<(), RunError> {
    let collection = find.collection;
    let label = format!("<find in {}>", collection);
    let expected = evaluate(&find.template, context, evaluator, &label)?;

    let id = match &expected {
        Value::Object(map) => map.get("_id"),
        _ => None,
    };

    if let Some(id) = id {
        debug!(collection, id = %id.to_text(), "find by id");
        let document = storage
            .find_by_id(collection, &id.to_json())
            .await
            .map_err(RunError::Storage)?;

        return match document {
            None => Err(RunError::Missing {
                collection: collection.to_string(),
                id: id.to_text(),
            }),
            Some(document) => {
                let actual = Value::from(document);
                match compare(&actual, &expected, options.strict, &options.ignored_find_keys) {
                    Ok(()) => Ok(()),
                    Err(mismatch) => Err(RunError::FindById {
                        collection: collection.to_string(),
                        mismatch,
                        actual,
                        expected,
                    }),
                }
            }
        };
    }

    let documents = storage
        .find_all(collection)
        .await
        .map_err(RunError::Storage)?;
    debug!(collection, count = documents.len(), "find among documents");

    let mut candidates = Vec::new();
    for document in documents {
        let actual = Value::from(document);
        match compare(&actual, &expected, options.strict, &options.ignored_find_keys) {
            Ok(()) => return Ok(()),
            Err(mismatch) => candidates.push((actual, mismatch)),
        }
    }

    Err(RunError::NotFound {
        collection: collection.to_string(),
        expected,
        candidates,
    })
}
