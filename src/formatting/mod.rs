//! Rendering test documents and values back to text

pub mod formatter;
mod syntax;
mod terminal;
pub mod value;

pub use syntax::*;
pub use terminal::Terminal;

use crate::language::Test;

/// We do the code formatting in two passes. First we convert from our
/// Abstract Syntax Tree types into a Vec of "fragments" (Syntax tag, String
/// pairs). Then second we apply the specified renderer to each pair to result
/// in an embellished/highlighted/marked-up String.
pub fn render(renderer: &impl Render, test: &Test) -> String {
    let fragments = formatter::format_with_renderer(test);

    let mut output = String::new();
    for (syntax, content) in fragments {
        output.push_str(&renderer.style(syntax, &content));
    }

    if !output.is_empty() && !output.ends_with('\n') {
        output.push('\n');
    }

    output
}
