//! Suites: the body that follows a declaration header's colon
//!
//! A suite is either inline (`def f(): pass`) or an indented block. Blocks may
//! open with a docstring. Class bodies are parsed for nested declarations and
//! everything else in them is skipped line by line (with any nested block
//! hanging off a skipped line). Enum and dataclass bodies are instead captured
//! verbatim as source lines.

use chumsky::prelude::*;
use std::ops::Range;
use std::sync::Arc;
use tracing::trace;

use crate::pyx::ast::{Construct, Docstring};
use crate::pyx::lexer::{Token, TokenSpan};
use crate::pyx::parser::combinators::{lead, line_end, rest_of_line, token, ParserError};
use crate::pyx::parser::declarations::member_construct;

/// A parsed suite: optional docstring plus nested declarations
#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct Suite {
    pub docstring: Option<Docstring>,
    pub members: Vec<Construct>,
}

/// A verbatim suite: optional docstring plus the body's source lines
#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct RawSuite {
    pub docstring: Option<Docstring>,
    pub lines: Vec<String>,
}

/// Split a triple-quoted string token into prefix and inner text
pub(crate) fn split_docstring(literal: &str) -> Option<Docstring> {
    let quote_at = literal.find("\"\"\"")?;
    let prefix = &literal[..quote_at];
    if !prefix.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let inner = literal.get(quote_at + 3..literal.len().checked_sub(3)?)?;
    Some(Docstring {
        prefix: prefix.to_string(),
        text: inner.to_string(),
    })
}

/// A `"""..."""` string token
pub(crate) fn docstring() -> impl Parser<TokenSpan, Docstring, Error = ParserError> + Clone {
    filter_map(|span, (tok, range): TokenSpan| {
        let parsed = match &tok {
            Token::LongStr(literal) => split_docstring(literal),
            _ => None,
        };
        parsed.ok_or_else(|| ParserError::expected_input_found(span, None, Some((tok, range))))
    })
}

/// Block-opening prefix: end of header line, indent, optional docstring line
fn block_opening() -> impl Parser<TokenSpan, Option<Docstring>, Error = ParserError> + Clone {
    line_end()
        .ignore_then(token(Token::Indent))
        .ignore_then(docstring().then_ignore(line_end()).or_not())
}

/// Inline suite: whatever follows the colon on the header line
fn inline_suite() -> impl Parser<TokenSpan, Option<Docstring>, Error = ParserError> + Clone {
    let with_docstring = lead(docstring())
        .then_ignore(rest_of_line())
        .then_ignore(token(Token::Newline))
        .map(Some);
    let plain = lead(
        filter(|(tok, _): &TokenSpan| {
            !matches!(tok, Token::Whitespace | Token::Newline | Token::Indent | Token::Dedent)
        })
        .then(rest_of_line()),
    )
    .then_ignore(token(Token::Newline))
    .to(None);

    with_docstring.or(plain)
}

/// Suite whose body is scanned for nested declarations
pub(crate) fn suite<M>(members: M) -> impl Parser<TokenSpan, Suite, Error = ParserError> + Clone
where
    M: Parser<TokenSpan, Vec<Construct>, Error = ParserError> + Clone,
{
    let block = block_opening()
        .then(members)
        .then_ignore(token(Token::Dedent))
        .map(|(docstring, members)| Suite { docstring, members });
    let inline = inline_suite().map(|docstring| Suite {
        docstring,
        members: Vec::new(),
    });

    block.or(inline)
}

/// Byte ranges of every token in a block body, nested blocks included
fn raw_block() -> impl Parser<TokenSpan, Vec<Range<usize>>, Error = ParserError> + Clone {
    recursive(|raw| {
        let plain = filter(|(tok, _): &TokenSpan| !tok.is_synthetic()).map(|(_, range)| vec![range]);
        let nested = token(Token::Indent)
            .ignore_then(raw)
            .then_ignore(token(Token::Dedent));
        plain
            .or(nested)
            .repeated()
            .map(|chunks: Vec<Vec<Range<usize>>>| chunks.into_iter().flatten().collect())
    })
}

/// Suite whose body is kept as verbatim source lines
pub(crate) fn raw_suite(source: Arc<String>) -> impl Parser<TokenSpan, RawSuite, Error = ParserError> + Clone {
    block_opening()
        .then(raw_block())
        .then_ignore(token(Token::Dedent))
        .map(move |(docstring, ranges)| RawSuite {
            docstring,
            lines: verbatim_lines(&source, &ranges),
        })
}

/// Source lines covered by `ranges`, blank lines dropped, common indentation removed
pub(crate) fn verbatim_lines(source: &str, ranges: &[Range<usize>]) -> Vec<String> {
    let (Some(first), Some(last)) = (ranges.first(), ranges.last()) else {
        return Vec::new();
    };
    let line_start = source[..first.start].rfind('\n').map_or(0, |at| at + 1);
    let Some(text) = source.get(line_start..last.end) else {
        return Vec::new();
    };

    let lines: Vec<&str> = text
        .lines()
        .map(|line| line.trim_end())
        .filter(|line| !line.is_empty())
        .collect();
    let margin = lines
        .iter()
        .map(|line| leading_whitespace(line))
        .min()
        .unwrap_or(0);

    lines
        .into_iter()
        .map(|line| line[margin..].to_string())
        .collect()
}

/// Byte length of a line's leading spaces and tabs
pub(crate) fn leading_whitespace(line: &str) -> usize {
    line.len() - line.trim_start_matches([' ', '\t']).len()
}

/// Declarations inside a block, skipping anything unrecognized
pub(crate) fn members(source: Arc<String>) -> impl Parser<TokenSpan, Vec<Construct>, Error = ParserError> + Clone {
    recursive(move |members| {
        let nested = token(Token::Indent)
            .ignore_then(members.clone())
            .then_ignore(token(Token::Dedent))
            .ignored();

        let skipped_line = filter(|(tok, _): &TokenSpan| {
            !matches!(tok, Token::Newline | Token::Indent | Token::Dedent)
        })
        .repeated()
        .at_least(1)
        .then_ignore(token(Token::Newline))
        .then_ignore(nested.clone().or_not())
        .map_with_span(|_, span: Range<usize>| trace!(?span, "skipped body line"));

        choice((
            member_construct(members.clone(), source.clone()).map(Some),
            skipped_line.to(None),
            nested.to(None),
        ))
        .repeated()
        .map(|items: Vec<Option<Construct>>| items.into_iter().flatten().collect())
    })
}
