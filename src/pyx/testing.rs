//! Test helpers
//!
//! - [`run_parser`] lexes a snippet and runs a single grammar piece on it.
//! - [`PyxSources`] gives access to the sample files in `samples/`, which are
//!   the canonical whole-file inputs for tests.
//! - [`assert_scan`] is a small fluent API for asserting on scan results.
//!
//! ```text
//! let scanned = scan(PyxSources::get_string("020-typed-class.pyx").unwrap().as_str());
//! assert_scan(&scanned)
//!     .count(1)
//!     .item(0, ConstructKind::TypedClass, Some("Point"));
//! ```

use chumsky::prelude::*;
use chumsky::Stream;
use std::fs;
use std::path::PathBuf;

use crate::pyx::ast::ConstructKind;
use crate::pyx::lexer::{lex_with_spans, TokenSpan};
use crate::pyx::parser::combinators::ParserError;
use crate::pyx::parser::ScannedConstruct;

/// Lex `source` and run `parser` from its first token
pub fn run_parser<O>(
    parser: impl Parser<TokenSpan, O, Error = ParserError>,
    source: &str,
) -> Result<O, Vec<ParserError>> {
    let tokens = lex_with_spans(source);
    let end = source.len();
    parser.parse(Stream::from_iter(
        end..end + 1,
        tokens
            .into_iter()
            .map(|(token, range)| ((token, range.clone()), range)),
    ))
}

/// Samples shipped in `samples/`
pub const AVAILABLE_SAMPLES: &[&str] = &[
    "010-functions.pyx",
    "020-typed-class.pyx",
    "030-imports.pyx",
    "040-enums-and-dataclasses.pyx",
    "050-structs.pyx",
    "060-mixed-with-junk.pyx",
];

pub struct PyxSources;

impl PyxSources {
    fn sample_path(filename: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("samples")
            .join(filename)
    }

    /// Raw content of a sample file
    pub fn get_string(filename: &str) -> Result<String, String> {
        if !AVAILABLE_SAMPLES.contains(&filename) {
            return Err(format!(
                "Sample '{}' is not available. Available samples: {:?}",
                filename, AVAILABLE_SAMPLES
            ));
        }
        fs::read_to_string(Self::sample_path(filename))
            .map_err(|err| format!("Failed to read sample '{}': {}", filename, err))
    }
}

/// Create an assertion builder for scan results
pub fn assert_scan(scanned: &[ScannedConstruct]) -> ScanAssertion<'_> {
    ScanAssertion { scanned }
}

pub struct ScanAssertion<'a> {
    scanned: &'a [ScannedConstruct],
}

impl<'a> ScanAssertion<'a> {
    /// Assert the number of constructs found
    pub fn count(self, expected: usize) -> Self {
        assert_eq!(
            self.scanned.len(),
            expected,
            "Expected {} constructs, found [{}]",
            expected,
            summarize(self.scanned)
        );
        self
    }

    /// Assert kind and name of the construct at `index`
    pub fn item(self, index: usize, kind: ConstructKind, name: Option<&str>) -> Self {
        let scanned = self.scanned.get(index).unwrap_or_else(|| {
            panic!(
                "Construct index {} out of bounds (found [{}])",
                index,
                summarize(self.scanned)
            )
        });
        assert_eq!(scanned.construct.kind(), kind, "constructs[{}] kind", index);
        assert_eq!(scanned.construct.name(), name, "constructs[{}] name", index);
        self
    }

    /// Assert spans are ordered and do not overlap
    pub fn ordered_spans(self) -> Self {
        for pair in self.scanned.windows(2) {
            assert!(
                pair[0].span.end <= pair[1].span.start,
                "spans out of order: {} then {}",
                pair[0].span,
                pair[1].span
            );
        }
        self
    }
}

fn summarize(scanned: &[ScannedConstruct]) -> String {
    scanned
        .iter()
        .map(|item| format!("{} {}", item.construct.kind(), item.construct.name().unwrap_or("-")))
        .collect::<Vec<_>>()
        .join(", ")
}
