//! Splitting a document into header lines and tab indented blocks. Anything
//! else is prose, there for the benefit of human readers, and dropped.

use crate::language::Span;

/// One source line, with its zero-origin line number retained so that
/// problems found deep inside a template can still be located.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'i> {
    pub number: usize,
    pub text: &'i str,
}

impl<'i> Line<'i> {
    pub fn span(&self) -> Span {
        Span::line(self.number)
    }

    /// Remove one leading tab, if present.
    pub fn dedent(&self) -> Option<Line<'i>> {
        self.text
            .strip_prefix('\t')
            .map(|text| Line {
                number: self.number,
                text,
            })
    }
}

/// The span covering a run of lines.
pub fn span_of(lines: &[Line]) -> Option<Span> {
    let first = lines.first()?;
    let last = lines.last()?;
    Some(Span {
        begin: first.number,
        end: last.number + 1,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'i> {
    Header {
        level: usize,
        text: &'i str,
        span: Span,
    },
    Block {
        lines: Vec<Line<'i>>,
        span: Span,
    },
}

impl<'i> Token<'i> {
    pub fn span(&self) -> Span {
        match self {
            Token::Header { span, .. } => *span,
            Token::Block { span, .. } => *span,
        }
    }
}

pub fn tokenize(content: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut open = false;

    for (number, line) in content
        .lines()
        .enumerate()
    {
        if line.starts_with('#') {
            let level = line
                .bytes()
                .take_while(|&b| b == b'#')
                .count();
            tokens.push(Token::Header {
                level,
                text: line[level..].trim(),
                span: Span::line(number),
            });
            open = false;
        } else if let Some(text) = line.strip_prefix('\t') {
            let line = Line { number, text };
            match tokens.last_mut() {
                Some(Token::Block { lines, span }) if open => {
                    lines.push(line);
                    span.end = number + 1;
                }
                _ => {
                    tokens.push(Token::Block {
                        lines: vec![line],
                        span: Span::line(number),
                    });
                    open = true;
                }
            }
        } else {
            // blank lines, // comments, and paragraph text all close the
            // current block without contributing to it.
            open = false;
        }
    }

    tokens
}
