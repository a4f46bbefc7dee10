use thiserror::Error;

use crate::comparison::Mismatch;
use crate::evaluation::EvaluationError;
use crate::language::Value;
use crate::running::Failure;

/// Why a setup step or a case failed.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
    #[error("Expected status code {expected} but received {actual}")]
    Status {
        expected: u16,
        actual: u16,
        body: Value,
    },
    #[error("Unexpected response: {}", .mismatch.describe())]
    Output {
        mismatch: Mismatch,
        post: Value,
        actual: Value,
        expected: Value,
    },
    #[error("No document with _id {id} in {collection}")]
    Missing { collection: String, id: String },
    #[error("Document in {collection} does not match: {}", .mismatch.describe())]
    FindById {
        collection: String,
        mismatch: Mismatch,
        actual: Value,
        expected: Value,
    },
    #[error("No matching document in {collection} ({} examined)", .candidates.len())]
    NotFound {
        collection: String,
        expected: Value,
        candidates: Vec<(Value, Mismatch)>,
    },
    #[error("Storage failed: {0}")]
    Storage(Failure),
    #[error("Request failed: {0}")]
    Transport(Failure),
}

/// Problems reading runner options.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed reading options: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid options: {0}")]
    Json(#[from] serde_json::Error),
}
