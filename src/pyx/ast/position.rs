//! Source location utilities for converting byte offsets to line/column positions

use super::span::Position;

/// Provides fast conversion from byte offsets to line/column positions
pub struct SourceLocation {
    /// Byte offsets where each line starts
    line_starts: Vec<usize>,
}

impl SourceLocation {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];

        for (byte_pos, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(byte_pos + 1);
            }
        }

        Self { line_starts }
    }

    /// Convert a byte offset to a line/column position
    pub fn byte_to_position(&self, byte_offset: usize) -> Position {
        let line = self
            .line_starts
            .binary_search(&byte_offset)
            .unwrap_or_else(|i| i.saturating_sub(1));

        let column = byte_offset - self.line_starts.get(line).copied().unwrap_or(0);

        Position::new(line, column)
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets_map_to_lines() {
        let location = SourceLocation::new("ab\ncd\n\nef");
        assert_eq!(location.byte_to_position(0), Position::new(0, 0));
        assert_eq!(location.byte_to_position(1), Position::new(0, 1));
        assert_eq!(location.byte_to_position(3), Position::new(1, 0));
        assert_eq!(location.byte_to_position(7), Position::new(3, 0));
        assert_eq!(location.byte_to_position(8), Position::new(3, 1));
        assert_eq!(location.line_count(), 4);
    }
}
