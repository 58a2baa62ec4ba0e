//! Source positions resolved from the immutable tree.
//!
//! Positions are never cached on mutable nodes. They are looked up through
//! [`PositionLookup`] each time they are needed, so a node's position always
//! reflects the original source it mirrors.

use crate::cst::CstId;

/// Sentinel used by every field of an invalid [`Position`].
pub const INVALID: i64 = -1;

/// A resolved location in the original source text.
///
/// `line` is 1-based, `column` is the 0-based byte column within that line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    /// Start byte offset (inclusive).
    pub start: i64,
    /// End byte offset (exclusive).
    pub end: i64,
    /// Line of the start offset.
    pub line: i64,
    /// Column of the start offset.
    pub column: i64,
}

impl Position {
    /// The invalid position, returned for synthetic nodes.
    pub const INVALID: Self = Self {
        start: INVALID,
        end: INVALID,
        line: INVALID,
        column: INVALID,
    };

    /// Creates a position from offsets and a start location.
    #[must_use]
    pub fn new(start: usize, end: usize, line: usize, column: usize) -> Self {
        Self {
            start: to_i64(start),
            end: to_i64(end),
            line: to_i64(line),
            column: to_i64(column),
        }
    }

    /// Whether this position points into real source text.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.start >= 0 && self.end >= self.start
    }

    /// `end - start`, or `-1` when invalid.
    #[must_use]
    pub const fn length(&self) -> i64 {
        if self.is_valid() {
            self.end - self.start
        } else {
            INVALID
        }
    }

    /// Byte range usable for slicing, if valid.
    #[must_use]
    pub fn byte_range(&self) -> Option<std::ops::Range<usize>> {
        if !self.is_valid() {
            return None;
        }
        let start = usize::try_from(self.start).ok()?;
        let end = usize::try_from(self.end).ok()?;
        Some(start..end)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::INVALID
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_valid() {
            write!(f, "{}:{} [{}..{})", self.line, self.column, self.start, self.end)
        } else {
            write!(f, "<no position>")
        }
    }
}

fn to_i64(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(INVALID)
}

/// The narrow position contract the engine needs from the parser.
pub trait PositionLookup {
    /// Resolves the position of an immutable node.
    fn position_of(&self, id: CstId) -> Position;

    /// The full original source text.
    fn source_text(&self) -> &str;

    /// Slices the original source for a node, if it resolves.
    fn original_text(&self, id: CstId) -> Option<&str> {
        let range = self.position_of(id).byte_range()?;
        self.source_text().get(range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_position() {
        let pos = Position::INVALID;
        assert!(!pos.is_valid());
        assert_eq!(pos.length(), -1);
        assert_eq!(pos.byte_range(), None);
        assert_eq!(pos.line, -1);
        assert_eq!(pos.column, -1);
    }

    #[test]
    fn test_length_and_range() {
        let pos = Position::new(4, 10, 2, 3);
        assert!(pos.is_valid());
        assert_eq!(pos.length(), 6);
        assert_eq!(pos.byte_range(), Some(4..10));
    }

    #[test]
    fn test_display() {
        assert_eq!(Position::new(0, 3, 1, 0).to_string(), "1:0 [0..3)");
        assert_eq!(Position::INVALID.to_string(), "<no position>");
    }
}
