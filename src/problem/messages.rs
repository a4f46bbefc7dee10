use crate::formatting::{Render, Syntax};
use crate::parsing::error::ParsingError;

/// Render a small example document fragment, one line per entry, as it
/// would be highlighted in the source.
fn example(renderer: &dyn Render, lines: &[&[(Syntax, &str)]]) -> String {
    lines
        .iter()
        .map(|line| {
            line.iter()
                .map(|(syntax, content)| renderer.style(*syntax, content))
                .collect::<String>()
        })
        .map(|line| format!("    {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Generate problem and detail messages for parsing errors
pub fn generate_error_message(error: &ParsingError, renderer: &dyn Render) -> (String, String) {
    match error {
        ParsingError::ExpectedHeader(_) => (
            "Expected a header".to_string(),
            format!(
                r#"
A test document starts with a level one header naming the endpoint being
exercised, for example:

{}

Append {} to the title to skip every case in the document.
                "#,
                example(
                    renderer,
                    &[&[(Syntax::Header, "# "), (Syntax::Title, "user/login")]]
                ),
                renderer.style(Syntax::Keyword, "(skip)")
            )
            .trim_ascii()
            .to_string(),
        ),
        ParsingError::MissingSetup(_) => (
            "Missing setup section".to_string(),
            format!(
                r#"
Test cases must follow a {} section, even an empty one. Anything between
the title and the setup is documentation and is ignored.
                "#,
                renderer.style(Syntax::Section, "## Setup")
            )
            .trim_ascii()
            .to_string(),
        ),
        ParsingError::MissingCases(_) => (
            "Expected at least one test case".to_string(),
            format!(
                r#"
After the setup section, each test case is introduced by a level two
header naming it, followed by what to post and what to expect back:

{}
                "#,
                example(
                    renderer,
                    &[
                        &[(Syntax::Header, "## "), (Syntax::Section, "Success")],
                        &[(Syntax::Header, "### "), (Syntax::Keyword, "Post")],
                        &[
                            (Syntax::Indent, "\t"),
                            (Syntax::Key, "name"),
                            (Syntax::Operator, ":"),
                            (Syntax::Neutral, " "),
                            (Syntax::String, "\"John\"")
                        ],
                        &[(Syntax::Header, "### "), (Syntax::Keyword, "Out")],
                        &[
                            (Syntax::Indent, "\t"),
                            (Syntax::Key, "token"),
                            (Syntax::Operator, ":"),
                            (Syntax::Neutral, " "),
                            (Syntax::Expression, "String")
                        ],
                    ]
                )
            )
            .trim_ascii()
            .to_string(),
        ),
        ParsingError::Expected(_, value) => (
            format!("Expected {}", value),
            format!(
                "The parser was looking for {} but found something else.",
                value
            ),
        ),
        ParsingError::ExpectedBlock(_) => (
            "Expected a tab indented block".to_string(),
            r#"
This section describes a value, which must be written on the lines
immediately following the header, each indented by a tab.
            "#
            .trim_ascii()
            .to_string(),
        ),
        ParsingError::UnexpectedBlock(_) => (
            "Unexpected block".to_string(),
            format!(
                r#"
Only sections describing a value are followed by a tab indented block.
{} takes none.
                "#,
                renderer.style(Syntax::Keyword, "Clear")
            )
            .trim_ascii()
            .to_string(),
        ),
        ParsingError::ClearedTwice(_, _) => (
            "Collection cleared twice".to_string(),
            "There is no need to clear the same collection twice; remove the second one."
                .to_string(),
        ),
        ParsingError::ClearedAfterInsertion(_, _) => (
            "Collection cleared after insertion".to_string(),
            r#"
Clearing a collection after inserting into it would throw the inserted
documents away. Inserting into a collection clears it first anyway, so the
explicit clear can go before the insertion or be removed.
            "#
            .trim_ascii()
            .to_string(),
        ),
        ParsingError::UnknownCollection(_, collection) => (
            format!("Unknown collection {}", collection),
            format!(
                r#"
Finds may only look in collections the setup clears or inserts into, so
that the documents found are known to come from this test. Add

{}

to the setup section.
                "#,
                example(
                    renderer,
                    &[&[
                        (Syntax::Header, "### "),
                        (Syntax::Keyword, "Clear"),
                        (Syntax::Neutral, " "),
                        (Syntax::Collection, collection.as_str())
                    ]]
                )
            )
            .trim_ascii()
            .to_string(),
        ),
        ParsingError::ExpectedTab(_) => (
            "Expected a tab after *".to_string(),
            format!(
                "Array elements are written as {} followed by a tab and then the value.",
                renderer.style(Syntax::Bullet, "*")
            ),
        ),
        ParsingError::DuplicateKey(_, _, key) => (
            format!("Duplicate key \"{}\"", key),
            "Each key may appear only once in an object.".to_string(),
        ),
        ParsingError::InvalidPath(_, path) => (
            format!("Invalid path \"{}\"", path),
            format!(
                r#"
Paths are dot separated identifiers and array indices, such as
{} or {}.
                "#,
                renderer.style(Syntax::Key, "items.0.name"),
                renderer.style(Syntax::Key, "user.password")
            )
            .trim_ascii()
            .to_string(),
        ),
        ParsingError::TrailingText(_, text) => (
            format!("Unexpected \"{}\"", text),
            format!(
                r#"
The list of paths to remove can only be followed by {} and the values to
add, for example:

{}
                "#,
                renderer.style(Syntax::Keyword, "; with"),
                example(
                    renderer,
                    &[&[
                        (Syntax::Variable, "user"),
                        (Syntax::Neutral, " "),
                        (Syntax::Keyword, "without"),
                        (Syntax::Neutral, " "),
                        (Syntax::Key, "name"),
                        (Syntax::Operator, ";"),
                        (Syntax::Neutral, " "),
                        (Syntax::Keyword, "with"),
                        (Syntax::Neutral, " "),
                        (Syntax::Key, "age"),
                        (Syntax::Operator, ":"),
                        (Syntax::Neutral, " "),
                        (Syntax::Numeric, "36")
                    ]]
                )
            )
            .trim_ascii()
            .to_string(),
        ),
        ParsingError::EmptyValue(_) => (
            "Expected a value".to_string(),
            "A key or array element was given nothing to hold.".to_string(),
        ),
        ParsingError::InvalidSyntax(_) => (
            "Invalid syntax".to_string(),
            r#"
A block is either an array of "*" elements, an object of "key:" entries, a
mixin such as "user with name: 1", or a single line expression.
            "#
            .trim_ascii()
            .to_string(),
        ),
    }
}
