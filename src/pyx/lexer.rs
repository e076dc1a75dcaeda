//! Lexer module for pyx sources
//!
//! Lexing runs in two passes. logos classifies the raw text, then the
//! indentation transform rewrites line structure into what the parser needs:
//! comments and blank lines disappear, line breaks inside brackets become plain
//! whitespace, and changes in leading indentation become `Indent`/`Dedent`
//! tokens. Keeping the block structure out of the logos pass keeps the raw
//! lexer free of custom code, and lets the parser treat indented suites like
//! braces in a C-like grammar.

pub mod indentation_transform;
pub mod lexer_impl;
pub mod tokens;

pub use indentation_transform::transform_indentation;
pub use lexer_impl::tokenize_with_spans;
pub use tokens::{RawToken, Token};

/// A token paired with the byte range it covers in the source
pub type TokenSpan = (Token, std::ops::Range<usize>);

/// Tokenize and apply the indentation transform
///
/// Synthetic tokens (`Indent`, `Dedent`, and the `Newline` closing an unterminated
/// last line) carry empty ranges positioned where they were inserted.
pub fn lex_with_spans(source: &str) -> Vec<TokenSpan> {
    let raw_tokens = tokenize_with_spans(source);
    transform_indentation(source, raw_tokens)
}

/// Token kinds only, handy for tests and debugging
pub fn lex(source: &str) -> Vec<Token> {
    lex_with_spans(source)
        .into_iter()
        .map(|(token, _)| token)
        .collect()
}
