//! Line/column locations.
//!
//! Hooks receive both a byte `Span` and a human-oriented `Location`. Lines are
//! 1-based, columns are 0-based byte offsets within the line.

use std::fmt;

use crate::Span;

/// A single point in the source.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    #[inline]
    pub const fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Start and end points of a node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct Location {
    pub start: Position,
    pub end: Position,
}

impl Location {
    #[inline]
    pub const fn new(start: Position, end: Position) -> Self {
        Location { start, end }
    }

    /// Compute the location of `span` inside `source`.
    ///
    /// Offsets past the end of `source` clamp to the last position.
    pub fn of_span(source: &str, span: Span) -> Self {
        Location {
            start: position_at(source, span.start),
            end: position_at(source, span.end),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

fn position_at(source: &str, offset: u32) -> Position {
    let offset = (offset as usize).min(source.len());
    let before = &source.as_bytes()[..offset];
    let line_start = before
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |nl| nl + 1);
    let line = before.iter().filter(|&&b| b == b'\n').count() + 1;
    Position {
        line: u32::try_from(line).unwrap_or(u32::MAX),
        column: u32::try_from(offset - line_start).unwrap_or(u32::MAX),
    }
}
