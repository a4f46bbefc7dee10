use thiserror::Error;

use crate::language::Span;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParsingError {
    #[error("Expected a header")]
    ExpectedHeader(Span),
    #[error("Test cases must follow a \"## Setup\" header")]
    MissingSetup(Span),
    #[error("Expected at least one test case")]
    MissingCases(Span),
    #[error("Expected {1}")]
    Expected(Span, &'static str),
    #[error("Expected a tab indented block")]
    ExpectedBlock(Span),
    #[error("Unexpected block")]
    UnexpectedBlock(Span),
    #[error("No need to clear the same collection twice")]
    ClearedTwice(Span, Span),
    #[error("Clearing the collection after insertion is not a good idea")]
    ClearedAfterInsertion(Span, Span),
    #[error("You can't do a find in {1}, a collection that wasn't cleared in the setup")]
    UnknownCollection(Span, String),
    #[error("Expected a tab after *")]
    ExpectedTab(Span),
    #[error("Duplicate key \"{2}\"")]
    DuplicateKey(Span, Span, String),
    #[error("Invalid path \"{1}\"")]
    InvalidPath(Span, String),
    #[error("Unexpected \"{1}\" after the mixin")]
    TrailingText(Span, String),
    #[error("Expected a value")]
    EmptyValue(Span),
    #[error("Invalid syntax")]
    InvalidSyntax(Span),
}

impl ParsingError {
    /// The source regions implicated, in the order they should be shown.
    pub fn spans(&self) -> Vec<Span> {
        match self {
            ParsingError::ExpectedHeader(span) => vec![*span],
            ParsingError::MissingSetup(span) => vec![*span],
            ParsingError::MissingCases(span) => vec![*span],
            ParsingError::Expected(span, _) => vec![*span],
            ParsingError::ExpectedBlock(span) => vec![*span],
            ParsingError::UnexpectedBlock(span) => vec![*span],
            ParsingError::ClearedTwice(first, second) => vec![*first, *second],
            ParsingError::ClearedAfterInsertion(first, second) => vec![*first, *second],
            ParsingError::UnknownCollection(span, _) => vec![*span],
            ParsingError::ExpectedTab(span) => vec![*span],
            ParsingError::DuplicateKey(first, second, _) => vec![*first, *second],
            ParsingError::InvalidPath(span, _) => vec![*span],
            ParsingError::TrailingText(span, _) => vec![*span],
            ParsingError::EmptyValue(span) => vec![*span],
            ParsingError::InvalidSyntax(span) => vec![*span],
        }
    }

    /// The principal location, used for one line summaries.
    pub fn span(&self) -> Span {
        match self {
            // point at the second occurrence, that's the one to fix
            ParsingError::ClearedTwice(_, span) => *span,
            ParsingError::ClearedAfterInsertion(_, span) => *span,
            ParsingError::DuplicateKey(_, span, _) => *span,
            _ => self.spans()[0],
        }
    }
}
