use crate::data_source::Character;
use std::fmt::{self, Debug, Formatter};

/// Location holds the start position of the given element in the data source
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    /// Line number, starting with 1
    pub line: usize,
    /// Column number, starting with 1
    pub column: usize,
    /// Character offset, starting with 0
    pub offset: usize,
}

impl Default for Location {
    /// Default to line 1, column 1
    fn default() -> Self {
        Self::new(1, 1, 0)
    }
}

impl Location {
    /// Create a new Location
    #[must_use]
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }

    /// Returns the (line, column) pair, which is what ordering and diagnostics care about
    #[must_use]
    pub fn line_column(&self) -> (usize, usize) {
        (self.line, self.column)
    }

    /// Returns true when this location comes before `other` in the source
    #[must_use]
    pub fn is_before(&self, other: &Location) -> bool {
        self.line_column() < other.line_column()
    }
}

impl Debug for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({}:{})", self.line, self.column)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Tracks the location of the next character as characters are consumed
pub struct LocationHandler {
    /// Where the data source starts, for text taken from the middle of a document
    start: Location,
    /// Zero-based lines, columns and offset consumed since `start`
    lines: usize,
    column: usize,
    offset: usize,
}

impl LocationHandler {
    #[must_use]
    pub fn new(start: Location) -> Self {
        Self {
            start,
            lines: 0,
            column: 0,
            offset: 0,
        }
    }

    /// Location of the next character
    #[must_use]
    pub fn current(&self) -> Location {
        let column = if self.lines == 0 {
            self.start.column + self.column
        } else {
            self.column + 1
        };
        Location::new(self.start.line + self.lines, column, self.start.offset + self.offset)
    }

    /// Moves past `ch`
    pub fn inc(&mut self, ch: Character) {
        match ch {
            Character::Ch('\n') => {
                self.lines += 1;
                self.column = 0;
                self.offset += 1;
            }
            Character::Ch(_) => {
                self.column += 1;
                self.offset += 1;
            }
            Character::StreamEnd => {}
        }
    }
}
