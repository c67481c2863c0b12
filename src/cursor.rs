//! Character source with one level of pushback.
//!
//! [`CharCursor`] decodes UTF-8 from any [`BufRead`] one character at a time.
//! Bytes that do not form a valid UTF-8 sequence come out as
//! [`Symbol::Invalid`] instead of an error, so readers can skip them.
//!
//! The pushback contract is deliberately narrow: only the symbol returned by
//! the most recent [`CharCursor::next`] may be pushed back, and only once
//! before the next read. Anything else is reported as [`Error::Cursor`].
//!
//! ```rust
//! use sgf_tree::cursor::{CharCursor, Symbol};
//!
//! let mut cursor = CharCursor::new("(;".as_bytes());
//! let first = cursor.next().unwrap();
//! assert_eq!(first, Some(Symbol::Char('(')));
//! cursor.pushback(Symbol::Char('(')).unwrap();
//! assert_eq!(cursor.next().unwrap(), Some(Symbol::Char('(')));
//! assert_eq!(cursor.next().unwrap(), Some(Symbol::Char(';')));
//! assert_eq!(cursor.next().unwrap(), None);
//! ```

use crate::error::{Error, Position, Result};
use std::io::{BufRead, ErrorKind};

/// One decoded unit of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    Char(char),
    /// A byte sequence that is not valid UTF-8.
    Invalid,
}

impl Symbol {
    #[must_use]
    pub fn as_char(self) -> Option<char> {
        match self {
            Symbol::Char(c) => Some(c),
            Symbol::Invalid => None,
        }
    }
}

/// Pull-based character reader with a single pushback slot.
pub struct CharCursor<R> {
    reader: R,
    pending: Option<Symbol>,
    last: Option<Symbol>,
    position: Position,
    last_position: Position,
}

impl<R: BufRead> CharCursor<R> {
    pub fn new(reader: R) -> Self {
        CharCursor {
            reader,
            pending: None,
            last: None,
            position: Position::START,
            last_position: Position::START,
        }
    }

    /// Reads the next symbol, or `None` at end of input.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<Option<Symbol>> {
        let symbol = match self.pending.take() {
            Some(symbol) => Some(symbol),
            None => self.decode()?,
        };

        self.last = symbol;
        self.last_position = self.position;
        if let Some(symbol) = symbol {
            self.advance(symbol);
        }
        Ok(symbol)
    }

    /// Returns `symbol` to the front of the stream.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Cursor`] if a pushback is already pending or if
    /// `symbol` is not the one returned by the last [`next`](Self::next).
    pub fn pushback(&mut self, symbol: Symbol) -> Result<()> {
        if self.pending.is_some() {
            return Err(Error::cursor(format!(
                "pushback of {symbol:?} while another symbol is pending"
            )));
        }
        match self.last.take() {
            Some(last) if last == symbol => {
                self.pending = Some(symbol);
                self.position = self.last_position;
                Ok(())
            }
            Some(last) => Err(Error::cursor(format!(
                "pushback of {symbol:?} but last read was {last:?}"
            ))),
            None => Err(Error::cursor(format!(
                "pushback of {symbol:?} without a preceding read"
            ))),
        }
    }

    /// Position of the next symbol to be read.
    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Position of the symbol returned by the last read.
    #[must_use]
    pub fn last_position(&self) -> Position {
        self.last_position
    }

    fn advance(&mut self, symbol: Symbol) {
        if symbol == Symbol::Char('\n') {
            self.position.line += 1;
            self.position.column = 1;
        } else {
            self.position.column += 1;
        }
    }

    fn decode(&mut self) -> Result<Option<Symbol>> {
        let Some(lead) = self.read_byte()? else {
            return Ok(None);
        };

        let width = match lead {
            0x00..=0x7F => return Ok(Some(Symbol::Char(char::from(lead)))),
            0xC2..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF4 => 4,
            _ => return Ok(Some(Symbol::Invalid)),
        };

        let mut bytes = [lead, 0, 0, 0];
        for slot in bytes.iter_mut().take(width).skip(1) {
            // A missing or non-continuation byte stays in the stream.
            match self.peek_byte()? {
                Some(b) if b & 0xC0 == 0x80 => {
                    self.reader.consume(1);
                    *slot = b;
                }
                _ => return Ok(Some(Symbol::Invalid)),
            }
        }

        Ok(Some(
            std::str::from_utf8(&bytes[..width])
                .ok()
                .and_then(|s| s.chars().next())
                .map_or(Symbol::Invalid, Symbol::Char),
        ))
    }

    fn peek_byte(&mut self) -> Result<Option<u8>> {
        loop {
            match self.reader.fill_buf() {
                Ok(buf) => return Ok(buf.first().copied()),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        let byte = self.peek_byte()?;
        if byte.is_some() {
            self.reader.consume(1);
        }
        Ok(byte)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufReader;

    fn drain<R: BufRead>(cursor: &mut CharCursor<R>) -> Vec<Symbol> {
        let mut out = Vec::new();
        while let Some(symbol) = cursor.next().unwrap() {
            out.push(symbol);
        }
        out
    }

    #[test]
    fn test_reads_multibyte_characters() {
        let mut cursor = CharCursor::new("a\u{e9}\u{4e2d}\u{1f600}".as_bytes());
        assert_eq!(
            drain(&mut cursor),
            vec![
                Symbol::Char('a'),
                Symbol::Char('\u{e9}'),
                Symbol::Char('\u{4e2d}'),
                Symbol::Char('\u{1f600}'),
            ]
        );
    }

    #[test]
    fn test_invalid_bytes_become_invalid_symbols() {
        let bytes: &[u8] = &[b'a', 0xFF, b'b', 0xC3, b'c'];
        let mut cursor = CharCursor::new(bytes);
        assert_eq!(
            drain(&mut cursor),
            vec![
                Symbol::Char('a'),
                Symbol::Invalid,
                Symbol::Char('b'),
                Symbol::Invalid,
                Symbol::Char('c'),
            ]
        );
    }

    #[test]
    fn test_truncated_sequence_at_end() {
        let bytes: &[u8] = &[b'x', 0xE4, 0xB8];
        let mut cursor = CharCursor::new(bytes);
        assert_eq!(drain(&mut cursor), vec![Symbol::Char('x'), Symbol::Invalid]);
    }

    #[test]
    fn test_sequence_split_across_buffer_refills() {
        let text = "\u{4e2d}\u{6587}";
        let mut cursor = CharCursor::new(BufReader::with_capacity(1, text.as_bytes()));
        assert_eq!(
            drain(&mut cursor),
            vec![Symbol::Char('\u{4e2d}'), Symbol::Char('\u{6587}')]
        );
    }

    #[test]
    fn test_pushback_replays_symbol() {
        let mut cursor = CharCursor::new("xy".as_bytes());
        let x = cursor.next().unwrap().unwrap();
        cursor.pushback(x).unwrap();
        assert_eq!(cursor.next().unwrap(), Some(Symbol::Char('x')));
        assert_eq!(cursor.next().unwrap(), Some(Symbol::Char('y')));
    }

    #[test]
    fn test_double_pushback_is_a_cursor_error() {
        let mut cursor = CharCursor::new("xy".as_bytes());
        let x = cursor.next().unwrap().unwrap();
        cursor.pushback(x).unwrap();
        assert!(matches!(cursor.pushback(x), Err(Error::Cursor(_))));
    }

    #[test]
    fn test_pushback_of_other_symbol_is_a_cursor_error() {
        let mut cursor = CharCursor::new("xy".as_bytes());
        cursor.next().unwrap();
        assert!(matches!(
            cursor.pushback(Symbol::Char('q')),
            Err(Error::Cursor(_))
        ));
    }

    #[test]
    fn test_pushback_before_any_read_is_a_cursor_error() {
        let mut cursor = CharCursor::new("xy".as_bytes());
        assert!(matches!(
            cursor.pushback(Symbol::Char('x')),
            Err(Error::Cursor(_))
        ));
    }

    #[test]
    fn test_position_tracking_and_restore() {
        let mut cursor = CharCursor::new("ab\ncd".as_bytes());
        cursor.next().unwrap();
        cursor.next().unwrap();
        assert_eq!(cursor.position(), Position::new(1, 3));
        cursor.next().unwrap();
        assert_eq!(cursor.position(), Position::new(2, 1));

        let c = cursor.next().unwrap().unwrap();
        assert_eq!(cursor.last_position(), Position::new(2, 1));
        cursor.pushback(c).unwrap();
        assert_eq!(cursor.position(), Position::new(2, 1));
    }
}
