//! Raw tokenization
//!
//! Classification is handled entirely by logos; this module only lifts the
//! matches into [`Token`]s and keeps their byte ranges.

use crate::pyx::lexer::tokens::{RawToken, Token};
use crate::pyx::lexer::TokenSpan;
use logos::Logos;

/// Tokenize a string and collect tokens with their spans
///
/// Text logos cannot classify becomes `Token::Unknown` so that spans stay
/// contiguous and the parser can still skip over it.
pub fn tokenize_with_spans(source: &str) -> Vec<TokenSpan> {
    let mut lexer = RawToken::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let text = source.get(span.clone()).unwrap_or_default();
        let token = match result {
            Ok(raw) => Token::from_raw(raw, text),
            Err(()) => Token::Unknown(text.to_string()),
        };
        tokens.push((token, span));
    }

    tokens
}
