//! Text positions and ranges, compared by value.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Column used on both ends of whole-line marker ranges.
pub const LINE_MARKER_COLUMN: u32 = 1;

/// A zero-based line/character position, in the shape LSP puts on the wire.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    #[must_use]
    pub const fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// A text range between two positions.
///
/// Ranges are keys in maps and sets: equality, ordering and hashing are
/// structural over `(start, end)`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct TextRange {
    pub start: Position,
    pub end: Position,
}

impl TextRange {
    /// Build a range, swapping the ends if `end` comes before `start`.
    #[must_use]
    pub fn new(start: Position, end: Position) -> Self {
        if end < start {
            Self {
                start: end,
                end: start,
            }
        } else {
            Self { start, end }
        }
    }

    #[must_use]
    pub fn from_coords(start_line: u32, start_char: u32, end_line: u32, end_char: u32) -> Self {
        Self::new(
            Position::new(start_line, start_char),
            Position::new(end_line, end_char),
        )
    }

    /// Whole-line marker spanning `first..=last` lines.
    #[must_use]
    pub fn whole_lines(first: u32, last: u32) -> Self {
        Self::from_coords(first, LINE_MARKER_COLUMN, last, LINE_MARKER_COLUMN)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether `other` lies entirely within `self` (ends inclusive).
    #[must_use]
    pub fn contains(&self, other: &TextRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    #[must_use]
    pub fn contains_line(&self, line: u32) -> bool {
        self.start.line <= line && line <= self.end.line
    }

    /// The overlap of two ranges, or `None` when they are disjoint.
    ///
    /// Touching ranges yield an empty range.
    #[must_use]
    pub fn intersection(&self, other: &TextRange) -> Option<TextRange> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start <= end).then_some(TextRange { start, end })
    }
}

impl fmt::Display for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}-{}:{}",
            self.start.line, self.start.character, self.end.line, self.end.character
        )
    }
}
