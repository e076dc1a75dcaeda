//! Parser module for pyx sources
//!
//! Grammar pieces are chumsky parsers over the `(Token, Range<usize>)` stream
//! produced by the lexer. The scanner drives them: it does not expect the whole
//! file to parse, only the declarations it can find.
//!
//! ## Testing
//!
//! Grammar tests lex real snippets and run individual parsers on them through
//! [`testing::run_parser`](crate::pyx::testing::run_parser); whole-file cases
//! use the sample sources in `samples/`.

pub mod blocks;
pub mod combinators;
pub mod declarations;
pub mod expressions;
pub mod imports;
pub mod scanner;
pub mod types;

pub use scanner::{scan, ScannedConstruct};
