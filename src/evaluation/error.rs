use thiserror::Error;

/// Structural problems applying a mixin. Paths are rendered dotted, starting
/// from the base the mixin was applied to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MixinError {
    #[error("Cannot navigate into {0}, it is neither an object nor an array")]
    NotNavigable(String),
    #[error("There is no {0} to remove or descend into")]
    MissingKey(String),
    #[error("Index {1} is out of bounds for {0}, which has {2} elements")]
    IndexOutOfBounds(String, usize, usize),
    #[error("Expected a numeric index into the array {0}")]
    NotAnIndex(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationError {
    #[error("Could not evaluate {label}: {message}")]
    Expression {
        label: String,
        expression: String,
        message: String,
    },
    #[error("Could not apply mixin in {label}: {error}")]
    Mixin { label: String, error: MixinError },
}

impl EvaluationError {
    pub fn label(&self) -> &str {
        match self {
            EvaluationError::Expression { label, .. } => label,
            EvaluationError::Mixin { label, .. } => label,
        }
    }
}
