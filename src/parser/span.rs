//! Source location tracking for level-file error messages.

use std::fmt;

/// A location in source text (byte offset, line, column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Location {
    /// Byte offset from start of file
    pub offset: usize,
    /// Line number (1-indexed)
    pub line: u32,
    /// Column number (1-indexed, in characters not bytes)
    pub column: u32,
}

impl Location {
    pub fn new(offset: usize, line: u32, column: u32) -> Self {
        Self { offset, line, column }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A span in source text (start and end locations).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Start location (inclusive)
    pub start: Location,
    /// End location (exclusive)
    pub end: Location,
}

impl Span {
    pub fn new(start: Location, end: Location) -> Self {
        Self { start, end }
    }

    /// Create a span from byte offsets, calculating line/column from source.
    pub fn from_offsets(source: &str, start_offset: usize, end_offset: usize) -> Self {
        Self {
            start: offset_to_location(source, start_offset),
            end: offset_to_location(source, end_offset),
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.start)
    }
}

/// A value with an associated source span.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub value: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(value: T, span: Span) -> Self {
        Self { value, span }
    }
}

/// Convert a byte offset to a Location (line/column).
pub fn offset_to_location(source: &str, offset: usize) -> Location {
    let mut offset = offset.min(source.len());
    while !source.is_char_boundary(offset) {
        offset -= 1;
    }
    let before = &source[..offset];

    let line = before.bytes().filter(|&b| b == b'\n').count() as u32 + 1;
    let last_newline = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let column = before[last_newline..].chars().count() as u32 + 1;

    Location { offset, line, column }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_to_location_simple() {
        let source = "{'a':\n {}}";

        assert_eq!(offset_to_location(source, 0), Location::new(0, 1, 1));
        assert_eq!(offset_to_location(source, 5), Location::new(5, 1, 6)); // newline
        assert_eq!(offset_to_location(source, 6), Location::new(6, 2, 1));
        assert_eq!(offset_to_location(source, 100), Location::new(10, 2, 5)); // clamped
    }

    #[test]
    fn test_offset_to_location_empty() {
        assert_eq!(offset_to_location("", 0), Location::new(0, 1, 1));
    }

    #[test]
    fn test_offset_inside_multibyte_char() {
        let source = "'é'";
        // byte 2 is inside 'é'; snaps back to its start
        assert_eq!(offset_to_location(source, 2), Location::new(1, 1, 2));
    }

    #[test]
    fn test_span_display() {
        let source = "(1, 2)";
        let span = Span::from_offsets(source, 1, 2);
        assert_eq!(span.to_string(), "1:2");
        assert_eq!(span.end, Location::new(2, 1, 3));
    }
}
