//! Types representing an Abstract Syntax Tree for test documents

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A range of source lines, zero-origin, end exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub begin: usize,
    pub end: usize,
}

impl Span {
    pub fn line(number: usize) -> Span {
        Span {
            begin: number,
            end: number + 1,
        }
    }

    pub fn join(self, other: Span) -> Span {
        Span {
            begin: self
                .begin
                .min(other.begin),
            end: self
                .end
                .max(other.end),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct Test<'i> {
    pub name: &'i str,
    pub skip: bool,
    pub setups: Vec<Setup<'i>>,
    pub cases: Vec<Case<'i>>,
    /// Collections cleared or inserted into during setup; the only ones a
    /// Find may look in.
    pub collections: BTreeSet<&'i str>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Setup<'i> {
    Clear {
        collection: &'i str,
    },
    Insertion {
        name: &'i str,
        collection: &'i str,
        template: Node<'i>,
    },
    Declaration {
        name: &'i str,
        template: Node<'i>,
    },
}

#[derive(Debug, PartialEq, Eq)]
pub struct Case<'i> {
    pub name: &'i str,
    pub skip: bool,
    /// Overrides the endpoint, which is otherwise the name of the Test.
    pub url: Option<&'i str>,
    pub post: Node<'i>,
    pub status: u16,
    /// Without an Out section the response body is not checked.
    pub out: Option<Node<'i>>,
    pub finds: Vec<Find<'i>>,
}

impl<'i> Case<'i> {
    pub fn endpoint(&self, test: &Test<'i>) -> &'i str {
        self.url
            .unwrap_or(test.name)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct Find<'i> {
    pub collection: &'i str,
    pub template: Node<'i>,
}

// templates, as parsed from the tab indented blocks

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node<'i> {
    Array(Vec<Node<'i>>),
    Object(BTreeMap<&'i str, Entry<'i>>),
    Expression(&'i str),
    Mixin(Mixin<'i>),
}

impl<'i> Node<'i> {
    pub fn empty() -> Node<'i> {
        Node::Object(BTreeMap::new())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Node::Object(entries) if entries.is_empty())
    }
}

/// A key written as `key?:` is optional and gets dropped from the evaluated
/// object when its value is null.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<'i> {
    pub optional: bool,
    pub node: Node<'i>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mixin<'i> {
    pub base: Path<'i>,
    pub removals: Vec<Path<'i>>,
    pub additions: Vec<Addition<'i>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Addition<'i> {
    pub path: Path<'i>,
    pub optional: bool,
    pub node: Node<'i>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path<'i>(pub Vec<Segment<'i>>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'i> {
    Key(&'i str),
    Index(usize),
}

impl<'i> Segment<'i> {
    /// The segment used as an object key; indices become their decimal text.
    pub fn key(&self) -> String {
        match self {
            Segment::Key(key) => key.to_string(),
            Segment::Index(index) => index.to_string(),
        }
    }
}

impl fmt::Display for Segment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => write!(f, "{}", key),
            Segment::Index(index) => write!(f, "{}", index),
        }
    }
}

impl fmt::Display for Path<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self
            .0
            .iter()
            .enumerate()
        {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

// the validate functions all need to have start and end anchors.

pub fn validate_identifier(input: &str) -> Option<&str> {
    let re = regex!(r"^[A-Za-z_$][A-Za-z0-9_$]*$");

    if re.is_match(input) {
        Some(input)
    } else {
        None
    }
}

/// A path is a dot separated chain of identifiers and decimal integers, the
/// latter meaning array indices.
pub fn validate_path(input: &str) -> Option<Path<'_>> {
    if input.is_empty() {
        return None;
    }

    let mut segments = Vec::new();
    for text in input.split('.') {
        if !text.is_empty()
            && text
                .bytes()
                .all(|b| b.is_ascii_digit())
        {
            let index = text
                .parse()
                .ok()?;
            segments.push(Segment::Index(index));
        } else {
            let key = validate_identifier(text)?;
            segments.push(Segment::Key(key));
        }
    }

    Some(Path(segments))
}
