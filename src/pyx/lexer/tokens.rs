//! Token definitions for pyx sources
//!
//! `RawToken` is the logos-driven classification of the source text. The lexer
//! then lifts each raw match into a [`Token`], which carries the matched text for
//! the token kinds whose text matters (names, numbers, strings) and adds the
//! synthetic `Indent`/`Dedent` markers produced by the indentation transform.
use logos::{Lexer, Logos};
use std::fmt;

/// Raw lexical classes recognized by logos
#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
pub enum RawToken {
    // Layout
    #[regex(r"[ \t\x0C]+")]
    Whitespace,
    #[regex(r"\r?\n")]
    Newline,
    #[regex(r"\\\r?\n")]
    LineContinuation,
    #[regex(r"#[^\r\n]*")]
    Comment,

    // Keywords
    #[token("def")]
    Def,
    #[token("cpdef")]
    Cpdef,
    #[token("cdef")]
    Cdef,
    #[token("class")]
    Class,
    #[token("struct")]
    Struct,
    #[token("import")]
    Import,
    #[token("from")]
    From,
    #[token("as")]
    As,

    // Words and literals
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Name,
    #[regex(r"[0-9]+")]
    Int,
    #[regex(r"[0-9]+\.[0-9]+")]
    Float,
    #[regex(r#"[rRbBuUfF]?[rRbBuUfF]?"([^"\\\r\n]|\\.)*""#)]
    #[regex(r#"[rRbBuUfF]?[rRbBuUfF]?'([^'\\\r\n]|\\.)*'"#)]
    Str,
    /// Triple-quoted string; the regex only matches the opening quotes and
    /// the callback consumes the body and the closing quotes
    #[regex(r#"[rRbBuUfF]?[rRbBuUfF]?""""#, long_string)]
    #[regex(r#"[rRbBuUfF]?[rRbBuUfF]?'''"#, long_string)]
    LongStr,

    // Punctuation
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token(";")]
    Semicolon,
    #[token("=")]
    Equals,
    #[token("->")]
    Arrow,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token(".")]
    Dot,
    #[token("@")]
    At,
    #[regex(r"[<>!%&|^~?`$]")]
    Symbol,
}

/// Extend a triple-quote opener over its body and closing quotes
///
/// An unterminated string is a lexing error.
fn long_string(lex: &mut Lexer<RawToken>) -> bool {
    let Some(&quote) = lex.slice().as_bytes().last() else {
        return false;
    };
    match closing_delimiter(lex.remainder().as_bytes(), quote) {
        Some(end) => {
            lex.bump(end);
            true
        }
        None => false,
    }
}

/// Byte offset just past the closing triple quote in `body`
///
/// A backslash escapes the next byte. A run of four or more quotes is the
/// `""""` escape when the string closes further on; otherwise the run ends the
/// string and its extra quotes belong to the body.
fn closing_delimiter(body: &[u8], quote: u8) -> Option<usize> {
    let delimiter = [quote; 3];
    let mut at = 0;
    while at < body.len() {
        if body[at] == b'\\' {
            at += 2;
            continue;
        }
        if body[at..].starts_with(&delimiter) {
            let run = body[at..].iter().take_while(|&&byte| byte == quote).count();
            if run >= 4 {
                if let Some(end) = closing_delimiter(&body[at + 4..], quote) {
                    return Some(at + 4 + end);
                }
            }
            return Some(at + run);
        }
        at += 1;
    }
    None
}

/// Tokens handed to the parser
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    // Layout
    Whitespace,
    Newline,
    LineContinuation,
    Comment,
    Indent,
    Dedent,

    // Keywords
    Def,
    Cpdef,
    Cdef,
    Class,
    Struct,
    Import,
    From,
    As,

    // Words and literals
    Name(String),
    Int(String),
    Float(String),
    Str(String),
    LongStr(String),

    // Punctuation
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Colon,
    Semicolon,
    Equals,
    Arrow,
    Plus,
    Minus,
    Star,
    Slash,
    Dot,
    At,
    Symbol(String),

    /// Text logos could not classify
    Unknown(String),
}

impl Token {
    /// Lift a raw logos match into a parser token
    pub fn from_raw(raw: RawToken, text: &str) -> Self {
        match raw {
            RawToken::Whitespace => Token::Whitespace,
            RawToken::Newline => Token::Newline,
            RawToken::LineContinuation => Token::LineContinuation,
            RawToken::Comment => Token::Comment,
            RawToken::Def => Token::Def,
            RawToken::Cpdef => Token::Cpdef,
            RawToken::Cdef => Token::Cdef,
            RawToken::Class => Token::Class,
            RawToken::Struct => Token::Struct,
            RawToken::Import => Token::Import,
            RawToken::From => Token::From,
            RawToken::As => Token::As,
            RawToken::Name => Token::Name(text.to_string()),
            RawToken::Int => Token::Int(text.to_string()),
            RawToken::Float => Token::Float(text.to_string()),
            RawToken::Str => Token::Str(text.to_string()),
            RawToken::LongStr => Token::LongStr(text.to_string()),
            RawToken::LParen => Token::LParen,
            RawToken::RParen => Token::RParen,
            RawToken::LBracket => Token::LBracket,
            RawToken::RBracket => Token::RBracket,
            RawToken::LBrace => Token::LBrace,
            RawToken::RBrace => Token::RBrace,
            RawToken::Comma => Token::Comma,
            RawToken::Colon => Token::Colon,
            RawToken::Semicolon => Token::Semicolon,
            RawToken::Equals => Token::Equals,
            RawToken::Arrow => Token::Arrow,
            RawToken::Plus => Token::Plus,
            RawToken::Minus => Token::Minus,
            RawToken::Star => Token::Star,
            RawToken::Slash => Token::Slash,
            RawToken::Dot => Token::Dot,
            RawToken::At => Token::At,
            RawToken::Symbol => Token::Symbol(text.to_string()),
        }
    }

    /// Tokens produced by the indentation transform rather than by the source text
    pub fn is_synthetic(&self) -> bool {
        matches!(self, Token::Indent | Token::Dedent)
    }

    /// Tokens that carry no meaning of their own for span computation
    pub fn is_layout(&self) -> bool {
        matches!(
            self,
            Token::Whitespace
                | Token::Newline
                | Token::LineContinuation
                | Token::Comment
                | Token::Indent
                | Token::Dedent
        )
    }

    /// Keywords that can open a top-level construct
    pub fn starts_construct(&self) -> bool {
        matches!(
            self,
            Token::Def
                | Token::Cpdef
                | Token::Cdef
                | Token::Class
                | Token::At
                | Token::Import
                | Token::From
        )
    }

    /// Keywords that reset bracket tracking when they open a physical line
    pub fn opens_declaration(&self) -> bool {
        matches!(
            self,
            Token::Def | Token::Cpdef | Token::Cdef | Token::Class | Token::Import
        )
    }

    /// The text this token contributes to a dotted/starred word, if any
    pub fn word_piece(&self) -> Option<&str> {
        match self {
            Token::Name(text) | Token::Int(text) | Token::Float(text) => Some(text),
            Token::Dot => Some("."),
            Token::Star => Some("*"),
            _ => None,
        }
    }

    /// Change in bracket nesting contributed by this token
    pub fn bracket_delta(&self) -> isize {
        match self {
            Token::LParen | Token::LBracket | Token::LBrace => 1,
            Token::RParen | Token::RBracket | Token::RBrace => -1,
            _ => 0,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Whitespace => write!(f, "<whitespace>"),
            Token::Newline => write!(f, "<newline>"),
            Token::LineContinuation => write!(f, "<line-continuation>"),
            Token::Comment => write!(f, "<comment>"),
            Token::Indent => write!(f, "<indent>"),
            Token::Dedent => write!(f, "<dedent>"),
            Token::Def => write!(f, "def"),
            Token::Cpdef => write!(f, "cpdef"),
            Token::Cdef => write!(f, "cdef"),
            Token::Class => write!(f, "class"),
            Token::Struct => write!(f, "struct"),
            Token::Import => write!(f, "import"),
            Token::From => write!(f, "from"),
            Token::As => write!(f, "as"),
            Token::Name(text)
            | Token::Int(text)
            | Token::Float(text)
            | Token::Str(text)
            | Token::LongStr(text)
            | Token::Symbol(text)
            | Token::Unknown(text) => write!(f, "{}", text),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::Comma => write!(f, ","),
            Token::Colon => write!(f, ":"),
            Token::Semicolon => write!(f, ";"),
            Token::Equals => write!(f, "="),
            Token::Arrow => write!(f, "->"),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Dot => write!(f, "."),
            Token::At => write!(f, "@"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(source: &str) -> Vec<RawToken> {
        RawToken::lexer(source).filter_map(|result| result.ok()).collect()
    }

    #[test]
    fn test_keywords_need_word_boundaries() {
        assert_eq!(raw("def"), vec![RawToken::Def]);
        assert_eq!(raw("define"), vec![RawToken::Name]);
        assert_eq!(raw("cdef"), vec![RawToken::Cdef]);
        assert_eq!(raw("classy"), vec![RawToken::Name]);
        assert_eq!(raw("as_"), vec![RawToken::Name]);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(raw("42"), vec![RawToken::Int]);
        assert_eq!(raw("4.25"), vec![RawToken::Float]);
        assert_eq!(raw("x.y"), vec![RawToken::Name, RawToken::Dot, RawToken::Name]);
    }

    #[test]
    fn test_strings() {
        assert_eq!(raw(r#""a \" b""#), vec![RawToken::Str]);
        assert_eq!(raw("'x'"), vec![RawToken::Str]);
        assert_eq!(raw(r#"b"bytes""#), vec![RawToken::Str]);
        assert_eq!(raw(r#""""doc""""#), vec![RawToken::LongStr]);
        assert_eq!(raw("\"\"\"multi\nline\"\"\""), vec![RawToken::LongStr]);
        assert_eq!(raw(r#"r"""raw""""#), vec![RawToken::LongStr]);
        assert_eq!(raw(r#""""has \""" inside""""#), vec![RawToken::LongStr]);
        assert_eq!(raw(r#""""has """" inside""""#), vec![RawToken::LongStr]);
    }

    #[test]
    fn test_long_string_spans() {
        let spans = |source: &str| {
            RawToken::lexer(source)
                .spanned()
                .map(|(result, span)| (result.ok(), span))
                .collect::<Vec<_>>()
        };
        assert_eq!(
            spans("\"\"\"a\nb\"\"\" x"),
            vec![
                (Some(RawToken::LongStr), 0..9),
                (Some(RawToken::Whitespace), 9..10),
                (Some(RawToken::Name), 10..11),
            ]
        );
        assert_eq!(spans("'''it's'''"), vec![(Some(RawToken::LongStr), 0..10)]);
        assert_eq!(spans(r#""""ends in a quote""""#), vec![(Some(RawToken::LongStr), 0..22)]);
        assert_eq!(raw(r#""" x"#), vec![RawToken::Str, RawToken::Whitespace, RawToken::Name]);
    }

    #[test]
    fn test_unterminated_long_string_is_an_error() {
        let results: Vec<_> = RawToken::lexer("\"\"\"never closed").collect();
        assert!(results.first().is_some_and(|result| result.is_err()));
    }

    #[test]
    fn test_layout() {
        assert_eq!(
            raw("a \\\n b # note\n"),
            vec![
                RawToken::Name,
                RawToken::Whitespace,
                RawToken::LineContinuation,
                RawToken::Whitespace,
                RawToken::Name,
                RawToken::Whitespace,
                RawToken::Comment,
                RawToken::Newline,
            ]
        );
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(
            raw("(x) -> y?"),
            vec![
                RawToken::LParen,
                RawToken::Name,
                RawToken::RParen,
                RawToken::Whitespace,
                RawToken::Arrow,
                RawToken::Whitespace,
                RawToken::Name,
                RawToken::Symbol,
            ]
        );
    }

    #[test]
    fn test_token_predicates() {
        assert!(Token::Indent.is_synthetic());
        assert!(!Token::Newline.is_synthetic());
        assert!(Token::Newline.is_layout());
        assert!(Token::At.starts_construct());
        assert!(!Token::At.opens_declaration());
        assert_eq!(Token::Name("os".into()).word_piece(), Some("os"));
        assert_eq!(Token::Star.word_piece(), Some("*"));
        assert_eq!(Token::Comma.word_piece(), None);
        assert_eq!(Token::LBracket.bracket_delta(), 1);
        assert_eq!(Token::RBrace.bracket_delta(), -1);
    }

    #[test]
    fn test_display() {
        assert_eq!(Token::Newline.to_string(), "<newline>");
        assert_eq!(Token::Name("foo".into()).to_string(), "foo");
        assert_eq!(Token::LBrace.to_string(), "{");
    }
}
