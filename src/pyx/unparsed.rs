//! Unparsed remainder
//!
//! The remainder is the complement of the scanned spans: every byte of input no
//! construct was parsed from, concatenated in order and trimmed. The anchor is
//! the byte offset of its first character in the original input, which is where
//! a diagnostic should point.

use crate::pyx::ast::Span;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Remainder {
    pub text: String,
    pub anchor: Option<usize>,
}

/// Text of `source` outside `spans`
///
/// Spans are expected sorted and disjoint, as the scanner produces them; any
/// span overlapping an earlier one only contributes its uncovered tail.
pub fn remainder(source: &str, spans: &[Span]) -> Remainder {
    let mut gaps: Vec<(usize, &str)> = Vec::new();
    let mut cursor = 0;
    for span in spans {
        if span.start > cursor {
            gaps.push((cursor, slice(source, cursor, span.start)));
        }
        cursor = cursor.max(span.end);
    }
    if cursor < source.len() {
        gaps.push((cursor, slice(source, cursor, source.len())));
    }

    let anchor = gaps.iter().find_map(|(offset, gap)| {
        gap.char_indices()
            .find(|(_, c)| !c.is_whitespace())
            .map(|(at, _)| offset + at)
    });
    let text: String = gaps.into_iter().map(|(_, gap)| gap).collect();

    Remainder {
        text: text.trim().to_string(),
        anchor,
    }
}

fn slice(source: &str, start: usize, end: usize) -> &str {
    source.get(start..end.min(source.len())).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fully_covered_input_has_no_remainder() {
        let source = "def a(): pass\n";
        let remainder = remainder(source, &[Span::new(0, 13)]);
        assert_eq!(remainder, Remainder::default());
    }

    #[test]
    fn test_gap_between_spans() {
        let source = "def a(): pass\nx = = 1\ndef b(): pass\n";
        let remainder = remainder(source, &[Span::new(0, 13), Span::new(22, 35)]);
        assert_eq!(remainder.text, "x = = 1");
        assert_eq!(remainder.anchor, Some(14));
    }

    #[test]
    fn test_leading_and_trailing_gaps_join() {
        let source = "# head\ndef a(): pass\ntail\n";
        let remainder = remainder(source, &[Span::new(7, 20)]);
        assert_eq!(remainder.text, "# head\n\ntail");
        assert_eq!(remainder.anchor, Some(0));
    }

    #[test]
    fn test_whitespace_only_remainder_is_empty() {
        let remainder = remainder("\n\n   \n", &[]);
        assert_eq!(remainder.text, "");
        assert_eq!(remainder.anchor, None);
    }
}
