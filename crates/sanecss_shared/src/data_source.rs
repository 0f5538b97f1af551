use crate::errors::DataSourceError;
use std::char::REPLACEMENT_CHARACTER;
use std::fmt::{self, Formatter};

/// Defines a single element read from a data source: either a decoded character or the end of
/// the input. End of input is repeated for every read once the source is exhausted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Character {
    /// Standard UTF character
    Ch(char),
    /// Source is exhausted
    StreamEnd,
}

use Character::*;

/// Converts the given character to a char. The end of the stream is converted to 0x0000
impl From<Character> for char {
    fn from(c: Character) -> Self {
        match c {
            Ch(c) => c,
            StreamEnd => 0x0000 as char,
        }
    }
}

impl fmt::Display for Character {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Ch(ch) => write!(f, "{ch}"),
            StreamEnd => write!(f, "StreamEnd"),
        }
    }
}

impl Character {
    /// Returns true when the character is CSS whitespace (space, tab or a newline)
    pub fn is_whitespace(&self) -> bool {
        matches!(self, Ch(' ' | '\t' | '\n' | '\r' | '\u{000C}'))
    }

    /// Returns true when the character is an ASCII digit
    pub fn is_numeric(&self) -> bool {
        matches!(self, Ch(c) if c.is_ascii_digit())
    }

    /// Returns true when the character is an ASCII hex digit
    pub fn is_hex_digit(&self) -> bool {
        matches!(self, Ch(c) if c.is_ascii_hexdigit())
    }

    pub fn is_eof(&self) -> bool {
        matches!(self, StreamEnd)
    }
}

/// A pull-based source of already decoded characters with pushback.
pub trait DataSource {
    /// Reads the next character, or `StreamEnd` when the source is exhausted
    fn read_character(&mut self) -> Character;
    /// Pushes a character back. Pushed back characters are returned by `read_character` in
    /// last-in first-out order before anything else, and may include `StreamEnd`.
    fn put_back_character(&mut self, ch: Character);
}

/// Data source over an in-memory string
pub struct StringDataSource {
    /// Decoded characters
    chars: Vec<char>,
    /// Position of the next character to read
    position: usize,
    /// Characters pushed back by the reader
    put_back: Vec<Character>,
}

impl StringDataSource {
    #[must_use]
    pub fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            position: 0,
            put_back: Vec::new(),
        }
    }

    /// Creates a data source from raw UTF-8 bytes. Invalid, overlong or out of range sequences
    /// are rejected.
    pub fn from_utf8(bytes: &[u8]) -> Result<Self, DataSourceError> {
        let input = std::str::from_utf8(bytes)?;
        Ok(Self::new(input))
    }

    /// Creates a data source from UTF-16 code units. Unpaired surrogates are replaced with
    /// U+FFFD.
    #[must_use]
    pub fn from_utf16(units: &[u16]) -> Self {
        let chars = char::decode_utf16(units.iter().copied())
            .map(|r| r.unwrap_or(REPLACEMENT_CHARACTER))
            .collect();

        Self {
            chars,
            position: 0,
            put_back: Vec::new(),
        }
    }

    /// Number of characters left to read, including pushed back ones
    #[must_use]
    pub fn chars_left(&self) -> usize {
        self.chars.len().saturating_sub(self.position) + self.put_back.len()
    }
}

impl DataSource for StringDataSource {
    fn read_character(&mut self) -> Character {
        if let Some(ch) = self.put_back.pop() {
            return ch;
        }

        match self.chars.get(self.position) {
            Some(c) => {
                self.position += 1;
                Ch(*c)
            }
            None => StreamEnd,
        }
    }

    fn put_back_character(&mut self, ch: Character) {
        self.put_back.push(ch);
    }
}
