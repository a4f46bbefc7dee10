#[macro_use]
mod regex;

pub mod comparison;
pub mod evaluation;
pub mod formatting;
pub mod language;
pub mod parsing;
pub mod problem;
pub mod running;
