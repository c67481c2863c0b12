//! Error types for game-record parsing.
//!
//! Every reader in [`crate::parser`] returns [`Result`], and errors travel
//! upward with `?` until they reach the caller. The only place that recovers
//! from an error is the collection driver, which can skip a malformed
//! top-level game tree (see [`crate::Recovery`]).
//!
//! ## Error Categories
//!
//! - **Token errors**: [`Error::InvalidIdentifier`], [`Error::UnterminatedValue`],
//!   [`Error::MalformedValue`]
//! - **Structure errors**: [`Error::EmptySequence`], [`Error::UnexpectedEnd`],
//!   [`Error::Structural`]
//! - **Defects and I/O**: [`Error::Cursor`], [`Error::Io`]
//!
//! All data errors carry the 1-based [`Position`] of the offending character.
//!
//! ## Examples
//!
//! ```rust
//! use sgf_tree::{from_str, Error};
//!
//! let result = from_str("(;aF[1])");
//! assert!(matches!(result, Err(Error::InvalidIdentifier { .. })));
//!
//! if let Err(err) = result {
//!     assert!(err.to_string().contains("line 1"));
//! }
//! ```

use std::fmt;
use thiserror::Error;

/// Line and column of a character in the input, both 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// The position of the first character of any input.
    pub const START: Position = Position { line: 1, column: 1 };

    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Position { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Represents all possible errors that can occur while reading a collection.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A property identifier that is empty, longer than two characters or
    /// contains anything but uppercase ASCII letters.
    #[error("Invalid property identifier {ident:?} at {position}")]
    InvalidIdentifier { ident: String, position: Position },

    /// Input ended inside a value body, before its closing `]`.
    #[error("Unterminated property value starting at {start}")]
    UnterminatedValue { start: Position },

    /// A value that does not open with `[`; the offending character stays in
    /// the stream. A body that is never closed is reported as
    /// [`Error::UnterminatedValue`] instead, since the body can only end on
    /// an unescaped `]`.
    #[error("Malformed property value at {position}: expected '[', found {found:?}")]
    MalformedValue { found: char, position: Position },

    /// A game tree whose sequence contains no node.
    #[error("Empty sequence at {position}: a game tree needs at least one node")]
    EmptySequence { position: Position },

    /// Input ended in the middle of a construct.
    #[error("Unexpected end of input at {position} while reading {construct}")]
    UnexpectedEnd {
        construct: &'static str,
        position: Position,
    },

    /// A character that is not legal at this point of the grammar.
    #[error("Unexpected {found:?} at {position}: expected {expected}")]
    Structural {
        found: char,
        expected: &'static str,
        position: Position,
    },

    /// The one-character pushback contract was violated. Always a bug in the
    /// reader, never caused by the input.
    #[error("Cursor misuse: {0}")]
    Cursor(String),

    /// The underlying reader failed.
    #[error("IO error: {0}")]
    Io(String),
}

impl Error {
    pub fn invalid_identifier(ident: &str, position: Position) -> Self {
        Error::InvalidIdentifier {
            ident: ident.to_string(),
            position,
        }
    }

    pub fn unterminated_value(start: Position) -> Self {
        Error::UnterminatedValue { start }
    }

    pub fn malformed_value(found: char, position: Position) -> Self {
        Error::MalformedValue { found, position }
    }

    pub fn empty_sequence(position: Position) -> Self {
        Error::EmptySequence { position }
    }

    /// Creates an unexpected end-of-input error naming the construct that was
    /// being read.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sgf_tree::{Error, Position};
    ///
    /// let err = Error::unexpected_end("game tree", Position::new(3, 7));
    /// assert!(err.to_string().contains("game tree"));
    /// ```
    pub fn unexpected_end(construct: &'static str, position: Position) -> Self {
        Error::UnexpectedEnd {
            construct,
            position,
        }
    }

    pub fn structural(found: char, expected: &'static str, position: Position) -> Self {
        Error::Structural {
            found,
            expected,
            position,
        }
    }

    pub fn cursor<T: fmt::Display>(msg: T) -> Self {
        Error::Cursor(msg.to_string())
    }

    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Whether the collection driver may skip the tree that produced this
    /// error and carry on. Reader failures and cursor defects are fatal.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Error::Cursor(_) | Error::Io(_))
    }

    /// Where in the input the error was detected, if it is tied to the data.
    #[must_use]
    pub fn position(&self) -> Option<Position> {
        match self {
            Error::InvalidIdentifier { position, .. }
            | Error::MalformedValue { position, .. }
            | Error::EmptySequence { position }
            | Error::UnexpectedEnd { position, .. }
            | Error::Structural { position, .. } => Some(*position),
            Error::UnterminatedValue { start } => Some(*start),
            Error::Cursor(_) | Error::Io(_) => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::io(&err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_position() {
        let err = Error::invalid_identifier("FFF", Position::new(2, 5));
        let msg = err.to_string();
        assert!(msg.contains("\"FFF\""));
        assert!(msg.contains("line 2, column 5"));
    }

    #[test]
    fn test_structural_display() {
        let err = Error::structural('x', "';'", Position::START);
        assert_eq!(
            err.to_string(),
            "Unexpected 'x' at line 1, column 1: expected ';'"
        );
    }

    #[test]
    fn test_recoverable_classification() {
        assert!(Error::empty_sequence(Position::START).is_recoverable());
        assert!(Error::unterminated_value(Position::START).is_recoverable());
        assert!(!Error::cursor("double pushback").is_recoverable());
        assert!(!Error::io("broken pipe").is_recoverable());
    }

    #[test]
    fn test_position_accessor() {
        let err = Error::unexpected_end("node", Position::new(4, 1));
        assert_eq!(err.position(), Some(Position::new(4, 1)));
        assert_eq!(Error::io("x").position(), None);
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let err: Error = io.into();
        assert_eq!(err, Error::Io("disk on fire".to_string()));
    }
}
