//! Parser combinator helpers shared by the grammar modules.

use chumsky::prelude::*;
use std::ops::Range;

use crate::pyx::lexer::{Token, TokenSpan};

/// Type alias for parser error
pub(crate) type ParserError = Simple<TokenSpan>;

/// Helper: match a specific token type, ignoring the span
pub(crate) fn token(t: Token) -> impl Parser<TokenSpan, (), Error = ParserError> + Clone {
    filter(move |(tok, _): &TokenSpan| tok == &t).ignored()
}

/// Any amount of inline whitespace, including none
pub(crate) fn ws() -> impl Parser<TokenSpan, (), Error = ParserError> + Clone {
    token(Token::Whitespace).repeated().ignored()
}

/// At least one whitespace token
pub(crate) fn ws1() -> impl Parser<TokenSpan, (), Error = ParserError> + Clone {
    token(Token::Whitespace).repeated().at_least(1).ignored()
}

/// Skip leading whitespace, then run `parser`
pub(crate) fn lead<O, P>(parser: P) -> impl Parser<TokenSpan, O, Error = ParserError> + Clone
where
    P: Parser<TokenSpan, O, Error = ParserError> + Clone,
{
    ws().ignore_then(parser)
}

/// Skip whitespace on both sides of `parser`
pub(crate) fn padded<O, P>(parser: P) -> impl Parser<TokenSpan, O, Error = ParserError> + Clone
where
    P: Parser<TokenSpan, O, Error = ParserError> + Clone,
{
    ws().ignore_then(parser).then_ignore(ws())
}

/// Negative lookahead: succeed without consuming when `parser` does not match here
pub(crate) fn not_followed_by<O, P>(parser: P) -> impl Parser<TokenSpan, (), Error = ParserError> + Clone
where
    O: Clone,
    P: Parser<TokenSpan, O, Error = ParserError> + Clone,
{
    parser.not().ignored().rewind().or(end())
}

/// Positive lookahead: succeed without consuming when `parser` matches here
pub(crate) fn followed_by<O, P>(parser: P) -> impl Parser<TokenSpan, (), Error = ParserError> + Clone
where
    P: Parser<TokenSpan, O, Error = ParserError> + Clone,
{
    parser.ignored().rewind()
}

/// Adjacent name, number, `.` and `*` pieces glued together
///
/// Covers dotted names (`os.path`), C pointer types (`char*`) and star
/// parameters (`*args`, `**kwargs`).
pub(crate) fn word() -> impl Parser<TokenSpan, String, Error = ParserError> + Clone {
    filter_map(|span, (tok, range): TokenSpan| {
        let piece = tok.word_piece().map(str::to_string);
        match piece {
            Some(piece) => Ok(piece),
            None => Err(ParserError::expected_input_found(span, None, Some((tok, range)))),
        }
    })
    .repeated()
    .at_least(1)
    .map(|pieces: Vec<String>| pieces.concat())
}

/// Everything up to (not including) the end of the logical line
pub(crate) fn rest_of_line() -> impl Parser<TokenSpan, Vec<TokenSpan>, Error = ParserError> + Clone {
    filter(|(tok, _): &TokenSpan| !matches!(tok, Token::Newline | Token::Indent | Token::Dedent))
        .repeated()
}

/// Trailing whitespace and the logical line end
pub(crate) fn line_end() -> impl Parser<TokenSpan, (), Error = ParserError> + Clone {
    ws().ignore_then(token(Token::Newline))
}

/// A balanced bracket group, returned as the byte ranges of its tokens
pub(crate) fn balanced_group() -> impl Parser<TokenSpan, Vec<Range<usize>>, Error = ParserError> + Clone {
    recursive(|group| {
        let open = filter(|(tok, _): &TokenSpan| tok.bracket_delta() > 0).map(|(_, range)| range);
        let close = filter(|(tok, _): &TokenSpan| tok.bracket_delta() < 0).map(|(_, range)| range);
        let inner = filter(|(tok, _): &TokenSpan| {
            tok.bracket_delta() == 0 && !matches!(tok, Token::Newline | Token::Indent | Token::Dedent)
        })
        .map(|(_, range)| vec![range]);

        open.then(inner.or(group).repeated())
            .then(close)
            .map(|((open, inner), close)| {
                let mut ranges = vec![open];
                ranges.extend(inner.into_iter().flatten());
                ranges.push(close);
                ranges
            })
    })
}

/// Source text from the start of the first range to the end of the last
pub(crate) fn source_text(source: &str, ranges: &[Range<usize>]) -> String {
    match (ranges.first(), ranges.last()) {
        (Some(first), Some(last)) if first.start <= last.end => source
            .get(first.start..last.end)
            .unwrap_or_default()
            .to_string(),
        _ => String::new(),
    }
}
