//! Import statements, grouped into sections

use chumsky::prelude::*;

use crate::pyx::ast::{Construct, Import, ImportName};
use crate::pyx::lexer::{Token, TokenSpan};
use crate::pyx::parser::combinators::{lead, padded, token, word, ws, ParserError};

/// `name [as alias]`
fn import_name() -> impl Parser<TokenSpan, ImportName, Error = ParserError> + Clone {
    word()
        .then(lead(token(Token::As)).ignore_then(lead(word())).or_not())
        .map(|(name, alias)| ImportName::new(name, alias))
}

fn bare_names() -> impl Parser<TokenSpan, Vec<ImportName>, Error = ParserError> + Clone {
    padded(import_name())
        .separated_by(token(Token::Comma))
        .at_least(1)
}

/// `(a, b as c,)`, which may span lines and end with a comma
fn parenthesized_names() -> impl Parser<TokenSpan, Vec<ImportName>, Error = ParserError> + Clone {
    padded(import_name())
        .separated_by(token(Token::Comma))
        .allow_trailing()
        .at_least(1)
        .then_ignore(ws())
        .delimited_by(token(Token::LParen), token(Token::RParen))
}

/// A single `import ...` or `from ... import ...` statement
pub(crate) fn import_statement() -> impl Parser<TokenSpan, Import, Error = ParserError> + Clone {
    let plain = token(Token::Import)
        .ignore_then(bare_names())
        .map(Import::Plain);

    let from = token(Token::From)
        .ignore_then(lead(word()))
        .then_ignore(lead(token(Token::Import)))
        .then(lead(parenthesized_names()).or(bare_names()))
        .map(|(module, names)| Import::From { module, names });

    from.or(plain)
}

/// One or more import statements, each ended by a newline or `;`
pub(crate) fn import_section() -> impl Parser<TokenSpan, Construct, Error = ParserError> + Clone {
    import_statement()
        .then_ignore(ws())
        .then_ignore(token(Token::Newline).or(token(Token::Semicolon)))
        .then_ignore(ws())
        .repeated()
        .at_least(1)
        .map(Construct::ImportSection)
}
