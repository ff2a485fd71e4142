//! Source location tracking for logic expressions
//!
//! Expressions are single-line, so a span is a pair of byte offsets into the
//! normalized expression. Columns shown to users are 1-based.
use serde::{Deserialize, Serialize};
use std::fmt;

/// A span of expression text from start (inclusive) to end (exclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
}

impl Span {
    /// Create a new span
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "Span start must not be after end");
        Self { start, end }
    }

    /// Merge two spans into one covering both
    pub fn merge(self, other: Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// 1-based column of the first character
    pub fn column(&self) -> usize {
        self.start + 1
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Get the text for this span, or an empty string when out of bounds
    pub fn slice<'a>(&self, input: &'a str) -> &'a str {
        input.get(self.start..self.end).unwrap_or("")
    }

    /// Render the expression with a caret line under this span
    pub fn underline(&self, input: &str) -> String {
        let padding = input
            .get(..self.start)
            .map(|prefix| prefix.chars().count())
            .unwrap_or(0);
        let width = self.slice(input).chars().count().max(1);
        format!("{}\n{}{}", input, " ".repeat(padding), "^".repeat(width))
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "column {}", self.column())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_display_is_one_based() {
        assert_eq!(Span::new(0, 1).to_string(), "column 1");
        assert_eq!(Span::new(4, 7).to_string(), "column 5");
    }

    #[test]
    fn test_merge_and_slice() {
        let merged = Span::new(4, 5).merge(Span::new(0, 1));
        assert_eq!(merged, Span::new(0, 5));
        assert_eq!(merged.slice("1 AND 2"), "1 AND");
        assert_eq!(Span::new(10, 12).slice("short"), "");
    }

    #[test]
    fn test_underline() {
        let rendered = Span::new(2, 5).underline("1 AND 2");
        assert_eq!(rendered, "1 AND 2\n  ^^^");
    }
}
