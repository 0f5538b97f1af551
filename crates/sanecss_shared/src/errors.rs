use crate::location::Location;
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Structural misuse of the object model or the matcher API. These are programmer errors and
/// never result from the contents of a stylesheet.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CssError {
    /// A value of the wrong kind was handed to a constructor or a mutator
    #[error("{0}")]
    InvalidArgument(String),
    /// An index or offset outside of a list
    #[error("{0}")]
    OutOfBounds(String),
}

impl CssError {
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        CssError::InvalidArgument(message.into())
    }

    #[must_use]
    pub fn out_of_bounds(message: impl Into<String>) -> Self {
        CssError::OutOfBounds(message.into())
    }

    /// Returns the message without the kind
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            CssError::InvalidArgument(msg) | CssError::OutOfBounds(msg) => msg,
        }
    }
}

pub type CssResult<T> = Result<T, CssError>;

/// Errors while setting up a data source from raw input
#[derive(Debug, Error)]
pub enum DataSourceError {
    #[error("input is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}

/// A recoverable problem found in the CSS text itself. The tokenizer and parser collect these
/// and carry on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    /// Machine readable tag, like `bad-escape` or `unexpected-eof-in-rule`
    pub tag: &'static str,
    /// Line number, starting with 1
    pub line: usize,
    /// Column number, starting with 1
    pub column: usize,
}

impl ParseError {
    #[must_use]
    pub fn new(tag: &'static str, location: Location) -> Self {
        ParseError {
            tag,
            line: location.line,
            column: location.column,
        }
    }

    /// Errors for tokens that carry no position are reported at 0:0
    #[must_use]
    pub fn at(tag: &'static str, location: Option<Location>) -> Self {
        match location {
            Some(location) => Self::new(tag, location),
            None => ParseError {
                tag,
                line: 0,
                column: 0,
            },
        }
    }

    /// Returns the error as a `(tag, line, column)` triple
    #[must_use]
    pub fn as_tuple(&self) -> (&'static str, usize, usize) {
        (self.tag, self.line, self.column)
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}:{}", self.tag, self.line, self.column)
    }
}
