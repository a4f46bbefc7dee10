//! parser for test documents

use std::path::Path;
use tracing::debug;

use crate::language::{LoadingError, Test};
use crate::parsing::error::ParsingError;

pub mod error;
pub mod parser;
pub mod template;
pub mod tokens;

/// Read a file and return an owned String. We pass that ownership back to the
/// caller so that the Test object created by parse() below can borrow from
/// it.
pub fn load(filename: &Path) -> Result<String, LoadingError<'_>> {
    match std::fs::read_to_string(filename) {
        Ok(content) => Ok(content),
        Err(error) => {
            debug!(?error);
            match error.kind() {
                std::io::ErrorKind::NotFound => Err(LoadingError {
                    problem: "File not found".to_string(),
                    details: String::new(),
                    filename,
                }),
                _ => Err(LoadingError {
                    problem: "Failed reading".to_string(),
                    details: error
                        .kind()
                        .to_string(),
                    filename,
                }),
            }
        }
    }
}

/// Parse text into a Test object, or return the first problem encountered.
pub fn parse(content: &str) -> Result<Test<'_>, ParsingError> {
    match parser::parse_test(content) {
        Ok(test) => {
            debug!(
                "Found {} case{} in {} collection{}",
                test.cases
                    .len(),
                if test.cases.len() == 1 { "" } else { "s" },
                test.collections
                    .len(),
                if test.collections.len() == 1 { "" } else { "s" }
            );
            Ok(test)
        }
        Err(error) => {
            debug!(?error);
            Err(error)
        }
    }
}
