//! Pretty printing runtime values, for reports. Keys come out sorted and
//! nesting is indented by two spaces. The value at one path can be singled
//! out so that a reader's eye goes straight to where a comparison failed.

use crate::formatting::*;
use crate::language::Value;

pub fn print(renderer: &impl Render, value: &Value, highlight: Option<&str>) -> String {
    let mut printer = Printer {
        fragments: Vec::new(),
        highlight,
    };
    printer.write(value, "", 0, false);

    printer
        .fragments
        .into_iter()
        .map(|(syntax, content)| renderer.style(syntax, &content))
        .collect()
}

struct Printer<'h> {
    fragments: Vec<(Syntax, String)>,
    highlight: Option<&'h str>,
}

fn join(path: &str, segment: impl std::fmt::Display) -> String {
    if path.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", path, segment)
    }
}

fn quote(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| format!("\"{}\"", text))
}

impl<'h> Printer<'h> {
    fn append(&mut self, syntax: Syntax, marked: bool, content: &str) {
        let syntax = if marked { Syntax::Highlight } else { syntax };
        self.fragments
            .push((syntax, content.to_string()));
    }

    fn indent(&mut self, depth: usize) {
        if depth > 0 {
            self.fragments
                .push((Syntax::Indent, "  ".repeat(depth)));
        }
    }

    fn is_highlighted(&self, path: &str) -> bool {
        self.highlight == Some(path)
    }

    fn write(&mut self, value: &Value, path: &str, depth: usize, marked: bool) {
        let marked = marked || self.is_highlighted(path);

        match value {
            Value::Null => self.append(Syntax::Keyword, marked, "null"),
            Value::Bool(b) => self.append(Syntax::Keyword, marked, &b.to_string()),
            Value::Number(number) => self.append(Syntax::Numeric, marked, &number.to_string()),
            Value::String(text) => self.append(Syntax::String, marked, &quote(text)),
            Value::Id(id) => {
                self.append(Syntax::Expression, marked, "ObjectId(");
                self.append(Syntax::String, marked, &quote(id));
                self.append(Syntax::Expression, marked, ")");
            }
            Value::Type(kind) => self.append(Syntax::Expression, marked, kind.name()),
            Value::Array(items) | Value::Ordered(items) if items.is_empty() => {
                self.append(Syntax::Structure, marked, "[]")
            }
            Value::Object(map) if map.is_empty() => self.append(Syntax::Structure, marked, "{}"),
            Value::Array(items) | Value::Ordered(items) => {
                if let Value::Ordered(_) = value {
                    self.append(Syntax::Expression, marked, "ordered(");
                }
                self.append(Syntax::Structure, marked, "[");
                self.fragments
                    .push((Syntax::Newline, "\n".to_string()));
                for (i, item) in items
                    .iter()
                    .enumerate()
                {
                    self.indent(depth + 1);
                    self.write(item, &join(path, i), depth + 1, marked);
                    if i + 1 < items.len() {
                        self.append(Syntax::Structure, marked, ",");
                    }
                    self.fragments
                        .push((Syntax::Newline, "\n".to_string()));
                }
                self.indent(depth);
                self.append(Syntax::Structure, marked, "]");
                if let Value::Ordered(_) = value {
                    self.append(Syntax::Expression, marked, ")");
                }
            }
            Value::Object(map) => {
                self.append(Syntax::Structure, marked, "{");
                self.fragments
                    .push((Syntax::Newline, "\n".to_string()));
                for (i, (key, item)) in map
                    .iter()
                    .enumerate()
                {
                    let inner = join(path, key);
                    let inner_marked = marked || self.is_highlighted(&inner);
                    self.indent(depth + 1);
                    self.append(Syntax::Key, inner_marked, &quote(key));
                    self.append(Syntax::Structure, inner_marked, ": ");
                    self.write(item, &inner, depth + 1, marked);
                    if i + 1 < map.len() {
                        self.append(Syntax::Structure, marked, ",");
                    }
                    self.fragments
                        .push((Syntax::Newline, "\n".to_string()));
                }
                self.indent(depth);
                self.append(Syntax::Structure, marked, "}");
            }
        }
    }
}
