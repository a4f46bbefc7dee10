use std::collections::BTreeMap;

use tracing::debug;

use crate::language::*;
use crate::parsing::error::ParsingError;
use crate::parsing::template::parse_block;
use crate::parsing::tokens::{tokenize, Token};

pub fn parse_test(content: &str) -> Result<Test<'_>, ParsingError> {
    let mut input = Parser::new(tokenize(content));
    input.read_test()
}

/// How a collection came to be known, and where, for the benefit of error
/// messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Registration {
    Cleared(Span),
    Inserted(Span),
}

#[derive(Debug)]
struct Parser<'i> {
    tokens: Vec<Token<'i>>,
    position: usize,
    collections: BTreeMap<&'i str, Registration>,
}

impl<'i> Parser<'i> {
    fn new(tokens: Vec<Token<'i>>) -> Parser<'i> {
        Parser {
            tokens,
            position: 0,
            collections: BTreeMap::new(),
        }
    }

    fn is_finished(&self) -> bool {
        self.position >= self
            .tokens
            .len()
    }

    fn peek(&self) -> Option<&Token<'i>> {
        self.tokens
            .get(self.position)
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    /// The text and span of the current token if it is a header at exactly
    /// the given level.
    fn peek_header(&self, expected: usize) -> Option<(&'i str, Span)> {
        match self.peek() {
            Some(Token::Header { level, text, span }) if *level == expected => Some((*text, *span)),
            _ => None,
        }
    }

    /// Where to point when something is missing: the current token, or the
    /// last one if we ran out.
    fn here(&self) -> Span {
        self.peek()
            .or(self
                .tokens
                .last())
            .map_or(Span::line(0), Token::span)
    }

    fn read_test(&mut self) -> Result<Test<'i>, ParsingError> {
        let (name, skip) = self.read_title()?;

        let setup = self.skip_to_setup()?;
        let setups = self.read_setups()?;

        let mut cases = Vec::new();
        while !self.is_finished() {
            cases.push(self.read_case()?);
        }
        if cases.is_empty() {
            return Err(ParsingError::MissingCases(setup));
        }

        debug!(
            "Parsed \"{}\" with {} setup item{} and {} case{}",
            name,
            setups.len(),
            if setups.len() == 1 { "" } else { "s" },
            cases.len(),
            if cases.len() == 1 { "" } else { "s" }
        );

        Ok(Test {
            name,
            skip,
            setups,
            cases,
            collections: self
                .collections
                .keys()
                .copied()
                .collect(),
        })
    }

    fn read_title(&mut self) -> Result<(&'i str, bool), ParsingError> {
        match self.peek_header(1) {
            Some((text, _)) => {
                self.advance();
                Ok(split_skip(text))
            }
            None => Err(ParsingError::ExpectedHeader(self.here())),
        }
    }

    /// Anything between the title and the Setup section is documentation.
    fn skip_to_setup(&mut self) -> Result<Span, ParsingError> {
        let title = self.here();
        while !self.is_finished() {
            if let Some(("Setup", span)) = self.peek_header(2) {
                self.advance();
                return Ok(span);
            }
            self.advance();
        }
        Err(ParsingError::MissingSetup(title))
    }

    fn read_setups(&mut self) -> Result<Vec<Setup<'i>>, ParsingError> {
        let mut setups = Vec::new();

        loop {
            match self.peek() {
                None => break,
                Some(Token::Header { level: 2, .. }) => break,
                Some(Token::Header {
                    level: 3,
                    text,
                    span,
                }) => {
                    let (text, span) = (*text, *span);
                    self.advance();
                    self.read_setup_item(text, span, &mut setups)?;
                }
                Some(Token::Block { span, .. }) => {
                    return Err(ParsingError::UnexpectedBlock(*span));
                }
                Some(Token::Header { span, .. }) => {
                    return Err(ParsingError::Expected(*span, "\"### ...\""));
                }
            }
        }

        Ok(setups)
    }

    fn read_setup_item(
        &mut self,
        text: &'i str,
        span: Span,
        setups: &mut Vec<Setup<'i>>,
    ) -> Result<(), ParsingError> {
        if let Some(collection) = parse_clear(text) {
            match self
                .collections
                .get(collection)
            {
                Some(Registration::Cleared(previous)) => {
                    return Err(ParsingError::ClearedTwice(*previous, span));
                }
                Some(Registration::Inserted(previous)) => {
                    return Err(ParsingError::ClearedAfterInsertion(*previous, span));
                }
                None => {}
            }
            if let Some(Token::Block { span, .. }) = self.peek() {
                return Err(ParsingError::UnexpectedBlock(*span));
            }
            self.collections
                .insert(collection, Registration::Cleared(span));
            setups.push(Setup::Clear { collection });
        } else if let Some(name) = parse_declaration(text) {
            let template = self.read_block(span)?;
            setups.push(Setup::Declaration { name, template });
        } else if let Some((name, collection)) = parse_insertion(text) {
            let template = self.read_block(span)?;
            if !self
                .collections
                .contains_key(collection)
            {
                // inserting implies starting from an empty collection
                setups.push(Setup::Clear { collection });
            }
            self.collections
                .insert(collection, Registration::Inserted(span));
            setups.push(Setup::Insertion {
                name,
                collection,
                template,
            });
        } else {
            return Err(ParsingError::Expected(
                span,
                "either \"### _docName_ in _collection_\", \"### Clear _collection_\" or \"### _varName_ is\"",
            ));
        }

        Ok(())
    }

    fn read_block(&mut self, header: Span) -> Result<Node<'i>, ParsingError> {
        let result = match self.peek() {
            Some(Token::Block { lines, span }) => parse_block(lines, *span),
            _ => return Err(ParsingError::ExpectedBlock(header)),
        };
        self.advance();
        result
    }

    fn read_case(&mut self) -> Result<Case<'i>, ParsingError> {
        let (text, _) = match self.peek_header(2) {
            Some(header) => header,
            None => {
                return Err(ParsingError::Expected(
                    self.here(),
                    "\"## _caseName_\"",
                ))
            }
        };
        self.advance();
        let (name, skip) = split_skip(text);

        let mut url = None;
        let mut post = Node::empty();
        if let Some((text, span)) = self.peek_header(3) {
            if let Some(target) = parse_post(text) {
                self.advance();
                url = target;
                post = self.read_block(span)?;
            }
        }

        let mut status = 200;
        let mut out = None;
        if let Some((text, span)) = self.peek_header(3) {
            if let Some(code) = parse_out(text) {
                self.advance();
                status = code.unwrap_or(200);
                out = Some(self.read_block(span)?);
            }
        }

        let mut finds = Vec::new();
        loop {
            match self.peek() {
                None | Some(Token::Header { level: 2, .. }) => break,
                Some(Token::Header {
                    level: 3,
                    text,
                    span,
                }) => {
                    let (text, span) = (*text, *span);
                    let collection = parse_find(text).ok_or(ParsingError::Expected(
                        span,
                        "\"### Find in _collection_\"",
                    ))?;
                    if !self
                        .collections
                        .contains_key(collection)
                    {
                        return Err(ParsingError::UnknownCollection(
                            span,
                            collection.to_string(),
                        ));
                    }
                    self.advance();
                    let template = self.read_block(span)?;
                    finds.push(Find {
                        collection,
                        template,
                    });
                }
                Some(token) => {
                    return Err(ParsingError::Expected(
                        token.span(),
                        "\"### Find in _collection_\"",
                    ));
                }
            }
        }

        Ok(Case {
            name,
            skip,
            url,
            post,
            status,
            out,
            finds,
        })
    }
}

fn split_skip(text: &str) -> (&str, bool) {
    match text.strip_suffix(" (skip)") {
        Some(name) => (name.trim_end(), true),
        None => (text, false),
    }
}

fn parse_clear(content: &str) -> Option<&str> {
    let re = regex!(r"^Clear ([A-Za-z_$][A-Za-z0-9_$]*)$");
    re.captures(content)?
        .get(1)
        .map(|m| m.as_str())
}

fn parse_declaration(content: &str) -> Option<&str> {
    let re = regex!(r"^([A-Za-z_$][A-Za-z0-9_$]*) is$");
    re.captures(content)?
        .get(1)
        .map(|m| m.as_str())
}

fn parse_insertion(content: &str) -> Option<(&str, &str)> {
    let re = regex!(r"^([A-Za-z_$][A-Za-z0-9_$]*) in ([A-Za-z_$][A-Za-z0-9_$]*)$");
    let cap = re.captures(content)?;
    Some((
        cap.get(1)?
            .as_str(),
        cap.get(2)?
            .as_str(),
    ))
}

/// Some(None) for a plain "Post", Some(Some(url)) when overridden.
fn parse_post(content: &str) -> Option<Option<&str>> {
    let re = regex!(r"^Post(?:\s+(.*))?$");
    let cap = re.captures(content)?;
    Some(
        cap.get(1)
            .map(|m| m.as_str())
            .filter(|url| !url.is_empty()),
    )
}

fn parse_out(content: &str) -> Option<Option<u16>> {
    let re = regex!(r"^Out(?: ([0-9]{3}))?$");
    let cap = re.captures(content)?;
    Some(
        cap.get(1)
            .and_then(|m| {
                m.as_str()
                    .parse()
                    .ok()
            }),
    )
}

fn parse_find(content: &str) -> Option<&str> {
    let re = regex!(r"^Find in ([A-Za-z_$][A-Za-z0-9_$]*)$");
    re.captures(content)?
        .get(1)
        .map(|m| m.as_str())
}
