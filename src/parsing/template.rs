//! Parser for the tab indented blocks describing documents. A block is one
//! of four shapes, tried in this order: an array of `*` items, an object of
//! `key:` entries, a mixin patching an existing value, or a single line
//! expression left for evaluation later.

use std::collections::BTreeMap;

use tracing::trace;

use crate::language::*;
use crate::parsing::error::ParsingError;
use crate::parsing::tokens::{span_of, Line};

/// Parse the lines of a block into a template. The origin is reported if
/// the block turns out to have no content at all.
pub fn parse_block<'i>(lines: &[Line<'i>], origin: Span) -> Result<Node<'i>, ParsingError> {
    parse_node(lines, origin, false)
}

/// When `inline` the first line followed a `key:` or `*` marker, and the
/// remaining lines are already at the level of that entry's continuation.
fn parse_node<'i>(lines: &[Line<'i>], origin: Span, inline: bool) -> Result<Node<'i>, ParsingError> {
    let first = match lines.first() {
        Some(line) => line,
        None => return Err(ParsingError::EmptyValue(origin)),
    };
    let span = span_of(lines).unwrap_or(origin);

    if first
        .text
        .starts_with('*')
    {
        read_array(lines)
    } else if is_key(first.text) {
        read_object(lines)
    } else if let Some(mixin) = read_mixin(lines, inline)? {
        Ok(Node::Mixin(mixin))
    } else if lines.len() == 1 {
        let text = first
            .text
            .trim();
        match text {
            "" => Err(ParsingError::EmptyValue(span)),
            "{}" => Ok(Node::empty()),
            "[]" => Ok(Node::Array(Vec::new())),
            _ => Ok(Node::Expression(text)),
        }
    } else {
        Err(ParsingError::InvalidSyntax(span))
    }
}

/// Lines belonging to one array element or one object entry: the remainder
/// of the line that started it, followed by its tab indented continuation.
struct Group<'i> {
    key: &'i str,
    optional: bool,
    origin: Span,
    inline: bool,
    lines: Vec<Line<'i>>,
}

impl<'i> Group<'i> {
    fn start(key: &'i str, optional: bool, line: &Line<'i>, rest: &'i str) -> Group<'i> {
        let inline = !rest
            .trim()
            .is_empty();
        let mut lines = Vec::new();
        if inline {
            lines.push(Line {
                number: line.number,
                text: rest,
            });
        }
        Group {
            key,
            optional,
            origin: line.span(),
            inline,
            lines,
        }
    }

    fn parse(&self) -> Result<Node<'i>, ParsingError> {
        parse_node(&self.lines, self.origin, self.inline)
    }
}

fn read_array<'i>(lines: &[Line<'i>]) -> Result<Node<'i>, ParsingError> {
    let mut groups: Vec<Group<'i>> = Vec::new();

    for line in lines {
        if let Some(rest) = line
            .text
            .strip_prefix('*')
        {
            let rest = match rest.strip_prefix('\t') {
                Some(rest) => rest,
                None => return Err(ParsingError::ExpectedTab(line.span())),
            };
            groups.push(Group::start("", false, line, rest));
        } else if let (Some(inner), Some(group)) = (line.dedent(), groups.last_mut()) {
            group
                .lines
                .push(inner);
        } else {
            return Err(ParsingError::InvalidSyntax(line.span()));
        }
    }

    let mut items = Vec::new();
    for group in &groups {
        items.push(group.parse()?);
    }

    trace!("array of {} items", items.len());
    Ok(Node::Array(items))
}

/// Split lines into keyed groups. The pattern captures the key, the
/// optional marker, and the remainder of the line.
fn read_entries<'i>(
    lines: &[Line<'i>],
    pattern: &::regex::Regex,
) -> Result<Vec<Group<'i>>, ParsingError> {
    let mut groups: Vec<Group<'i>> = Vec::new();

    for line in lines {
        if let Some(cap) = pattern.captures(line.text) {
            let key = cap
                .get(1)
                .map(|m| m.as_str())
                .ok_or(ParsingError::InvalidSyntax(line.span()))?;
            let optional = cap
                .get(2)
                .is_some();
            let rest = cap
                .get(3)
                .map_or("", |m| m.as_str());

            if let Some(previous) = groups
                .iter()
                .find(|group| group.key == key)
            {
                return Err(ParsingError::DuplicateKey(
                    previous.origin,
                    line.span(),
                    key.to_string(),
                ));
            }

            groups.push(Group::start(key, optional, line, rest));
        } else if let (Some(inner), Some(group)) = (line.dedent(), groups.last_mut()) {
            group
                .lines
                .push(inner);
        } else if groups.is_empty() {
            return Err(ParsingError::InvalidSyntax(line.span()));
        } else {
            return Err(ParsingError::Expected(line.span(), "a \"key:\" line"));
        }
    }

    Ok(groups)
}

fn read_object<'i>(lines: &[Line<'i>]) -> Result<Node<'i>, ParsingError> {
    let re = regex!(r"^([A-Za-z_$][A-Za-z0-9_$]*)(\?)?:(?:[ \t]+(.*))?$");

    let mut entries = BTreeMap::new();
    for group in read_entries(lines, re)? {
        let node = group.parse()?;
        entries.insert(
            group.key,
            Entry {
                optional: group.optional,
                node,
            },
        );
    }

    trace!("object with {} entries", entries.len());
    Ok(Node::Object(entries))
}

/// Returns None if the block doesn't start like a mixin at all, so that the
/// caller can carry on trying other syntaxes.
fn read_mixin<'i>(lines: &[Line<'i>], inline: bool) -> Result<Option<Mixin<'i>>, ParsingError> {
    let re = regex!(
        r"^([A-Za-z_$][A-Za-z0-9_$]*(?:\.(?:[A-Za-z_$][A-Za-z0-9_$]*|[0-9]+))*)\s+(with|without)\b(.*)$"
    );

    let first = match lines.first() {
        Some(line) => line,
        None => return Ok(None),
    };
    let cap = match re.captures(first.text) {
        Some(cap) => cap,
        None => return Ok(None),
    };
    let span = first.span();

    let (base, keyword, rest) = match (cap.get(1), cap.get(2), cap.get(3)) {
        (Some(one), Some(two), Some(three)) => (one.as_str(), two.as_str(), three.as_str()),
        _ => return Err(ParsingError::InvalidSyntax(span)),
    };
    let base = validate_path(base)
        .ok_or_else(|| ParsingError::InvalidPath(span, base.to_string()))?;

    let mut rest = rest.trim();
    let mut with = keyword == "with";
    let mut removals = Vec::new();

    if keyword == "without" {
        let (list, tail) = match rest.split_once(';') {
            Some((list, tail)) => (list, tail.trim()),
            None => (rest, ""),
        };

        for item in list.split(',') {
            let item = item.trim();
            let path = validate_path(item)
                .ok_or_else(|| ParsingError::InvalidPath(span, item.to_string()))?;
            removals.push(path);
        }

        if tail.is_empty() {
            rest = "";
        } else {
            let re = regex!(r"^with\b(.*)$");
            match re
                .captures(tail)
                .and_then(|cap| cap.get(1))
            {
                Some(m) => {
                    with = true;
                    rest = m
                        .as_str()
                        .trim();
                }
                None => return Err(ParsingError::TrailingText(span, tail.to_string())),
            }
        }
    }

    let mut additions = Vec::new();

    if with {
        let mut block = Vec::new();
        if !rest.is_empty() {
            block.push(Line {
                number: first.number,
                text: rest,
            });
        }
        for line in &lines[1..] {
            if inline {
                block.push(*line);
                continue;
            }
            match line.dedent() {
                Some(inner) => block.push(inner),
                None => return Err(ParsingError::InvalidSyntax(line.span())),
            }
        }
        if block.is_empty() {
            return Err(ParsingError::EmptyValue(span));
        }

        let re = regex!(
            r"^((?:[A-Za-z_$][A-Za-z0-9_$]*|[0-9]+)(?:\.(?:[A-Za-z_$][A-Za-z0-9_$]*|[0-9]+))*)(\?)?:(?:[ \t]+(.*))?$"
        );
        for group in read_entries(&block, re)? {
            let path = validate_path(group.key)
                .ok_or_else(|| ParsingError::InvalidPath(group.origin, group.key.to_string()))?;
            additions.push(Addition {
                path,
                optional: group.optional,
                node: group.parse()?,
            });
        }
    } else if lines.len() > 1 {
        let span = span_of(lines).unwrap_or(span);
        return Err(ParsingError::Expected(
            span,
            "a single line for a mixin without additions",
        ));
    }

    trace!(
        "mixin of {} removing {} and adding {}",
        base,
        removals.len(),
        additions.len()
    );
    Ok(Some(Mixin {
        base,
        removals,
        additions,
    }))
}

fn is_key(content: &str) -> bool {
    let re = regex!(r"^[A-Za-z_$][A-Za-z0-9_$]*\??:(?:[ \t]|$)");
    re.is_match(content)
}
