//! Code formatter for test documents

use crate::formatting::*;
use crate::language::*;

type Fragments = Vec<(Syntax, String)>;

/// Convert a Test into tagged fragments, in canonical layout. Parsing the
/// plain text of the result yields the same Test.
pub fn format_with_renderer(test: &Test) -> Fragments {
    let mut output = Formatter::new();

    output.format_title(test);
    output.format_setups(&test.setups);
    for case in &test.cases {
        output.format_case(case);
    }

    output.fragments
}

struct Formatter {
    fragments: Fragments,
}

impl Formatter {
    fn new() -> Formatter {
        Formatter {
            fragments: Vec::new(),
        }
    }

    fn append(&mut self, syntax: Syntax, content: &str) {
        self.fragments
            .push((syntax, content.to_string()));
    }

    fn append_char(&mut self, c: char) {
        self.fragments
            .push((Syntax::Neutral, c.to_string()));
    }

    fn newline(&mut self) {
        self.append(Syntax::Newline, "\n");
    }

    /// Blank line between sections, but never at the very start.
    fn separate(&mut self) {
        if !self
            .fragments
            .is_empty()
        {
            self.newline();
        }
    }

    fn header(&mut self, level: usize) {
        self.append(Syntax::Header, &"#".repeat(level));
        self.append_char(' ');
    }

    fn format_title(&mut self, test: &Test) {
        self.header(1);
        self.append(Syntax::Title, test.name);
        if test.skip {
            self.append(Syntax::Keyword, " (skip)");
        }
        self.newline();
    }

    fn format_setups(&mut self, setups: &[Setup]) {
        self.separate();
        self.header(2);
        self.append(Syntax::Section, "Setup");
        self.newline();

        for setup in setups {
            match setup {
                Setup::Clear { collection } => {
                    self.separate();
                    self.header(3);
                    self.append(Syntax::Keyword, "Clear");
                    self.append_char(' ');
                    self.append(Syntax::Collection, collection);
                    self.newline();
                }
                Setup::Insertion {
                    name,
                    collection,
                    template,
                } => {
                    self.separate();
                    self.header(3);
                    self.append(Syntax::Variable, name);
                    self.append_char(' ');
                    self.append(Syntax::Keyword, "in");
                    self.append_char(' ');
                    self.append(Syntax::Collection, collection);
                    self.newline();
                    self.format_block(template);
                }
                Setup::Declaration { name, template } => {
                    self.separate();
                    self.header(3);
                    self.append(Syntax::Variable, name);
                    self.append_char(' ');
                    self.append(Syntax::Keyword, "is");
                    self.newline();
                    self.format_block(template);
                }
            }
        }
    }

    fn format_case(&mut self, case: &Case) {
        self.separate();
        self.header(2);
        self.append(Syntax::Section, case.name);
        if case.skip {
            self.append(Syntax::Keyword, " (skip)");
        }
        self.newline();

        if case.url.is_some() || !case.post.is_empty() {
            self.header(3);
            self.append(Syntax::Keyword, "Post");
            if let Some(url) = case.url {
                self.append_char(' ');
                self.append(Syntax::Url, url);
            }
            self.newline();
            self.format_block(&case.post);
        }

        if let Some(out) = &case.out {
            self.header(3);
            self.append(Syntax::Keyword, "Out");
            if case.status != 200 {
                self.append_char(' ');
                self.append(Syntax::Numeric, &case.status.to_string());
            }
            self.newline();
            self.format_block(out);
        }

        for find in &case.finds {
            self.header(3);
            self.append(Syntax::Keyword, "Find in");
            self.append_char(' ');
            self.append(Syntax::Collection, find.collection);
            self.newline();
            self.format_block(&find.template);
        }
    }

    fn format_block(&mut self, node: &Node) {
        for line in node_lines(node) {
            self.append(Syntax::Indent, "\t");
            self.fragments
                .extend(line);
            self.newline();
        }
    }
}

/// The lines of a template, without the leading tab that makes them a
/// block.
fn node_lines(node: &Node) -> Vec<Fragments> {
    match node {
        Node::Expression(source) => vec![vec![(classify(source), source.to_string())]],
        Node::Array(items) if items.is_empty() => {
            vec![vec![(Syntax::Structure, "[]".to_string())]]
        }
        Node::Object(entries) if entries.is_empty() => {
            vec![vec![(Syntax::Structure, "{}".to_string())]]
        }
        Node::Array(items) => {
            let mut lines = Vec::new();
            for item in items {
                let mut first = true;
                for line in node_lines(item) {
                    let mut prefixed = if first {
                        vec![(Syntax::Bullet, "*".to_string()), (Syntax::Indent, "\t".to_string())]
                    } else if let Node::Mixin(_) = item {
                        // additions already sit one level in
                        Vec::new()
                    } else {
                        vec![(Syntax::Indent, "\t".to_string())]
                    };
                    prefixed.extend(line);
                    lines.push(prefixed);
                    first = false;
                }
            }
            lines
        }
        Node::Object(entries) => {
            let mut lines = Vec::new();
            for (key, entry) in entries {
                entry_lines(&mut lines, (Syntax::Key, key.to_string()), entry.optional, &entry.node);
            }
            lines
        }
        Node::Mixin(mixin) => {
            let mut first = vec![(Syntax::Variable, mixin.base.to_string())];
            if !mixin
                .removals
                .is_empty()
            {
                first.push((Syntax::Neutral, " ".to_string()));
                first.push((Syntax::Keyword, "without".to_string()));
                first.push((Syntax::Neutral, " ".to_string()));
                let removals = mixin
                    .removals
                    .iter()
                    .map(|path| path.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                first.push((Syntax::Key, removals));
            }
            if !mixin
                .additions
                .is_empty()
            {
                if !mixin
                    .removals
                    .is_empty()
                {
                    first.push((Syntax::Operator, ";".to_string()));
                }
                first.push((Syntax::Neutral, " ".to_string()));
                first.push((Syntax::Keyword, "with".to_string()));
            }

            let mut additions = Vec::new();
            for addition in &mixin.additions {
                entry_lines(
                    &mut additions,
                    (Syntax::Key, addition.path.to_string()),
                    addition.optional,
                    &addition.node,
                );
            }

            // a lone short addition stays on the mixin's line
            if additions.len() == 1 {
                first.push((Syntax::Neutral, " ".to_string()));
                first.extend(additions.remove(0));
                return vec![first];
            }

            let mut lines = vec![first];
            for line in additions {
                let mut indented = vec![(Syntax::Indent, "\t".to_string())];
                indented.extend(line);
                lines.push(indented);
            }
            lines
        }
    }
}

/// A `key:` line, with the value inline when it fits on one line and
/// indented beneath otherwise.
fn entry_lines(lines: &mut Vec<Fragments>, key: (Syntax, String), optional: bool, node: &Node) {
    let mut first = vec![key];
    if optional {
        first.push((Syntax::Operator, "?".to_string()));
    }
    first.push((Syntax::Operator, ":".to_string()));

    let mut inner = node_lines(node).into_iter();
    let mixin = matches!(node, Node::Mixin(_));
    if inner.len() == 1 || mixin {
        if let Some(line) = inner.next() {
            first.push((Syntax::Neutral, " ".to_string()));
            first.extend(line);
        }
    }
    lines.push(first);

    if mixin {
        // a mixin's additions are already indented beneath its first line
        lines.extend(inner);
        return;
    }

    for line in inner {
        let mut indented = vec![(Syntax::Indent, "\t".to_string())];
        indented.extend(line);
        lines.push(indented);
    }
}

fn classify(source: &str) -> Syntax {
    if source.starts_with('"') || source.starts_with('\'') {
        Syntax::String
    } else if source
        .parse::<f64>()
        .is_ok()
    {
        Syntax::Numeric
    } else {
        Syntax::Expression
    }
}
