//! Source scanning
//!
//! The scanner runs one parse over the whole token stream. At every token that
//! can open a declaration it tries the top-level grammar; a successful parse
//! records the construct with its byte span and resumes after it, anything else
//! moves on by a single token. Whatever never ends up inside a span is the unparsed
//! remainder.

use chumsky::prelude::*;
use chumsky::Stream;
use std::ops::Range;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::pyx::ast::{Construct, Span};
use crate::pyx::lexer::{lex_with_spans, TokenSpan};
use crate::pyx::parser::blocks::members;
use crate::pyx::parser::combinators::ParserError;
use crate::pyx::parser::declarations::{dataclass, member_construct};
use crate::pyx::parser::imports::import_section;

/// A recognized construct and the byte range of source it was parsed from
#[derive(Debug, Clone, PartialEq)]
pub struct ScannedConstruct {
    pub construct: Construct,
    pub span: Span,
}

/// Any construct that may appear at the top level of a file
pub(crate) fn top_level_construct(
    source: Arc<String>,
) -> impl Parser<TokenSpan, Construct, Error = ParserError> + Clone {
    choice((
        member_construct(members(source.clone()), source.clone()),
        dataclass(source),
        import_section(),
    ))
}

/// Scan `source` for constructs, in source order, with non-overlapping spans
///
/// One left-to-right parse over the token stream: at a token that can open a
/// declaration the top-level grammar is tried, and wherever it fails a single
/// token is skipped.
pub fn scan(source: &str) -> Vec<ScannedConstruct> {
    let tokens = lex_with_spans(source);

    let candidate = filter(|(token, _): &TokenSpan| token.starts_construct())
        .rewind()
        .ignore_then(top_level_construct(Arc::new(source.to_string())))
        .map_with_span(|construct, span: Range<usize>| Some((construct, span)));
    let skipped = any().map(|(token, range): TokenSpan| {
        if token.starts_construct() {
            trace!(token = %token, offset = range.start, "no construct here");
        }
        None::<(Construct, Range<usize>)>
    });
    let parser = candidate.or(skipped).repeated();

    let end_of_input = tokens.len()..tokens.len() + 1;
    let stream = Stream::from_iter(
        end_of_input,
        tokens
            .iter()
            .cloned()
            .enumerate()
            .map(|(index, item)| (item, index..index + 1)),
    );
    let items = parser.parse(stream).unwrap_or_default();

    items
        .into_iter()
        .flatten()
        .map(|(construct, consumed)| {
            let span = byte_span(&tokens, consumed);
            debug!(
                kind = %construct.kind(),
                name = construct.name().unwrap_or(""),
                start = span.start,
                end = span.end,
                "recognized construct"
            );
            ScannedConstruct { construct, span }
        })
        .collect()
}

/// Byte span from the first consumed token to the last one that carries text
///
/// Trailing newlines, whitespace and dedents stay outside the span, so the text
/// between two constructs belongs to neither.
fn byte_span(tokens: &[TokenSpan], consumed: Range<usize>) -> Span {
    let consumed = consumed.start..consumed.end.min(tokens.len());
    let start = tokens
        .get(consumed.start)
        .map(|(_, range)| range.start)
        .unwrap_or(0);
    let end = tokens[consumed]
        .iter()
        .rev()
        .find(|(token, _)| !token.is_layout())
        .map(|(_, range)| range.end)
        .unwrap_or(start);
    Span::new(start, end)
}
