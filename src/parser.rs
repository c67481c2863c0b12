//! Recursive-descent reader for game records.
//!
//! This module provides the [`Parser`], which builds a [`Collection`] from a
//! character stream in a single pass.
//!
//! ## Overview
//!
//! Each grammar rule has its own reader, and each reader only ever looks one
//! character ahead through the [`CharCursor`] pushback slot:
//!
//! - [`Parser::parse_prop_ident`]: one identifier, up to the `[` that follows
//! - [`Parser::parse_prop_value`]: one `[...]` value, unescaped
//! - [`Parser::parse_property`]: an identifier and all of its values
//! - [`Parser::parse_node`]: `;` and the properties that follow
//! - [`Parser::parse_sequence`]: consecutive nodes
//! - game trees: `(`, a sequence, nested game trees, `)`
//! - [`Parser::parse_collection`]: every game tree until end of input
//!
//! Only the collection driver recovers from errors; every other reader hands
//! its error to the caller.
//!
//! ## Usage
//!
//! ```rust
//! use sgf_tree::Parser;
//!
//! let mut parser = Parser::new("B[aa][bb] W[cc]".as_bytes());
//! let stones = parser.parse_property().unwrap();
//! assert_eq!(stones.ident().as_str(), "B");
//! assert_eq!(stones.values().len(), 2);
//!
//! let next = parser.parse_property().unwrap();
//! assert_eq!(next.value(), "cc");
//! ```

use crate::cursor::{CharCursor, Symbol};
use crate::diagnostics::{DiagnosticSink, LogSink};
use crate::error::{Error, Position, Result};
use crate::format::{
    is_boundary, is_line_pair, is_whitespace, ESCAPE, NODE_SEPARATOR, TREE_END, TREE_START,
    VALUE_END, VALUE_START,
};
use crate::options::ParseOptions;
use crate::tree::{Collection, Node, PropIdent, PropValue, Property, Sequence, TreeArena, TreeId};
use log::{debug, Level};
use std::io::BufRead;

/// Decoder state inside a value body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueState {
    Normal,
    Escaped,
}

/// The game-record parser.
///
/// Created via [`Parser::new`] or [`Parser::with_options`] over any
/// [`BufRead`]; `&[u8]` works for in-memory input.
pub struct Parser<R> {
    cursor: CharCursor<R>,
    options: ParseOptions,
    open_trees: usize,
}

impl<R: BufRead> Parser<R> {
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, ParseOptions::default())
    }

    pub fn with_options(reader: R, options: ParseOptions) -> Self {
        Parser {
            cursor: CharCursor::new(reader),
            options,
            open_trees: 0,
        }
    }

    /// Position of the next character to be read.
    #[must_use]
    pub fn position(&self) -> Position {
        self.cursor.position()
    }

    /// Consumes whitespace and undecodable input, returning the first
    /// character after it.
    fn next_significant(&mut self) -> Result<Option<char>> {
        while let Some(symbol) = self.cursor.next()? {
            match symbol {
                Symbol::Char(c) if !is_whitespace(c) => return Ok(Some(c)),
                _ => {}
            }
        }
        Ok(None)
    }

    /// Like [`next_significant`](Self::next_significant), but leaves the
    /// character in the stream.
    fn peek_significant(&mut self) -> Result<Option<char>> {
        let next = self.next_significant()?;
        if let Some(c) = next {
            self.cursor.pushback(Symbol::Char(c))?;
        }
        Ok(next)
    }

    /// Reads a property identifier up to, but not including, the `[` that
    /// opens its first value.
    ///
    /// Surrounding whitespace is trimmed and undecodable input is dropped.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidIdentifier`] if the identifier is not one or two
    /// uppercase ASCII letters, or if a `;`, `(`, `)` or `]` shows up before
    /// the `[`; the offending delimiter stays in the stream.
    /// [`Error::UnexpectedEnd`] if input ends first.
    pub fn parse_prop_ident(&mut self) -> Result<PropIdent> {
        let start = self.cursor.position();
        let mut raw = String::new();

        loop {
            let Some(symbol) = self.cursor.next()? else {
                return Err(Error::unexpected_end(
                    "property identifier",
                    self.cursor.position(),
                ));
            };
            let Symbol::Char(c) = symbol else {
                debug!(
                    "skipping undecodable input in identifier at {}",
                    self.cursor.last_position()
                );
                continue;
            };

            match c {
                VALUE_START => {
                    self.cursor.pushback(symbol)?;
                    break;
                }
                VALUE_END | NODE_SEPARATOR | TREE_START | TREE_END => {
                    self.cursor.pushback(symbol)?;
                    raw.push(c);
                    return Err(Error::invalid_identifier(raw.trim(), start));
                }
                _ => raw.push(c),
            }
        }

        PropIdent::parse(&raw).ok_or_else(|| Error::invalid_identifier(raw.trim(), start))
    }

    /// Reads one `[...]` value and decodes its body.
    ///
    /// Whitespace before the `[` is skipped. On success the cursor is just
    /// past the closing `]`.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedValue`] if something other than `[` comes first (it
    /// is left in the stream),
    /// [`Error::UnexpectedEnd`] if input ends before it, and
    /// [`Error::UnterminatedValue`] if input ends inside the body.
    pub fn parse_prop_value(&mut self) -> Result<PropValue> {
        match self.next_significant()? {
            Some(VALUE_START) => {}
            Some(c) => {
                self.cursor.pushback(Symbol::Char(c))?;
                return Err(Error::malformed_value(c, self.cursor.last_position()));
            }
            None => {
                return Err(Error::unexpected_end(
                    "property value",
                    self.cursor.position(),
                ))
            }
        }

        let start = self.cursor.last_position();
        let mut text = String::new();
        let mut state = ValueState::Normal;

        loop {
            let Some(symbol) = self.cursor.next()? else {
                return Err(Error::unterminated_value(start));
            };
            let Symbol::Char(c) = symbol else {
                debug!(
                    "skipping undecodable input in value at {}",
                    self.cursor.last_position()
                );
                continue;
            };
            let c = if c == '\t' { ' ' } else { c };

            state = match (state, c) {
                (ValueState::Normal, ESCAPE) => ValueState::Escaped,
                (ValueState::Normal, VALUE_END) => break,
                (ValueState::Escaped, '\r' | '\n') => {
                    self.skip_soft_break(c, start)?;
                    ValueState::Normal
                }
                (_, c) => {
                    text.push(c);
                    ValueState::Normal
                }
            };
        }

        Ok(PropValue::new(text))
    }

    /// Drops the rest of an escaped line break. `first` has been consumed
    /// already; a second character that does not complete CRLF or LFCR goes
    /// back to the stream.
    fn skip_soft_break(&mut self, first: char, start: Position) -> Result<()> {
        match self.cursor.next()? {
            None => Err(Error::unterminated_value(start)),
            Some(Symbol::Char(second)) if is_line_pair(first, second) => Ok(()),
            Some(other) => self.cursor.pushback(other),
        }
    }

    /// Reads an identifier followed by one or more values.
    ///
    /// Values are read as long as the next significant character is `[`. Any
    /// other character, such as a delimiter or the start of the next
    /// identifier, ends the property and is left in the stream.
    pub fn parse_property(&mut self) -> Result<Property> {
        let ident = self.parse_prop_ident()?;
        let mut values = vec![self.parse_prop_value()?];

        while self.peek_significant()? == Some(VALUE_START) {
            values.push(self.parse_prop_value()?);
        }

        Ok(Property::new(ident, values))
    }

    /// Reads `;` and the properties of the node, stopping in front of the
    /// next `;`, `(` or `)`.
    pub fn parse_node(&mut self) -> Result<Node> {
        match self.next_significant()? {
            Some(NODE_SEPARATOR) => {}
            Some(c) => {
                self.cursor.pushback(Symbol::Char(c))?;
                return Err(Error::structural(
                    c,
                    "';'",
                    self.cursor.last_position(),
                ));
            }
            None => return Err(Error::unexpected_end("node", self.cursor.position())),
        }

        let mut properties = Vec::new();
        loop {
            match self.peek_significant()? {
                Some(c) if is_boundary(c) => break,
                Some(_) => properties.push(self.parse_property()?),
                None => return Err(Error::unexpected_end("node", self.cursor.position())),
            }
        }

        Ok(Node::new(properties))
    }

    /// Reads nodes until the next `(` or `)`.
    ///
    /// # Errors
    ///
    /// [`Error::EmptySequence`] if no node precedes the delimiter.
    pub fn parse_sequence(&mut self) -> Result<Sequence> {
        let start = self.cursor.position();
        let mut nodes = Vec::new();

        loop {
            match self.peek_significant()? {
                Some(NODE_SEPARATOR) => nodes.push(self.parse_node()?),
                Some(TREE_START | TREE_END) => break,
                Some(c) => return Err(Error::structural(c, "';'", self.cursor.position())),
                None => return Err(Error::unexpected_end("sequence", self.cursor.position())),
            }
        }

        if nodes.is_empty() {
            return Err(Error::empty_sequence(start));
        }
        Ok(Sequence::new(nodes))
    }

    /// Reads `(`, the mainline sequence, every nested game tree and `)`.
    ///
    /// The tree is reserved in `arena` as soon as its sequence is read, so
    /// trees end up in pre-order. A child is attached, and its parent link
    /// stamped, only once the child has been read completely.
    fn read_game_tree(&mut self, arena: &mut TreeArena) -> Result<TreeId> {
        match self.next_significant()? {
            Some(TREE_START) => self.open_trees += 1,
            Some(c) => {
                self.cursor.pushback(Symbol::Char(c))?;
                return Err(Error::structural(
                    c,
                    "'('",
                    self.cursor.last_position(),
                ));
            }
            None => return Err(Error::unexpected_end("game tree", self.cursor.position())),
        }

        let sequence = self.parse_sequence()?;
        let id = arena.reserve(sequence);

        loop {
            match self.next_significant()? {
                Some(TREE_START) => {
                    self.cursor.pushback(Symbol::Char(TREE_START))?;
                    let child = self.read_game_tree(arena)?;
                    arena.attach(id, child);
                }
                Some(TREE_END) => {
                    self.open_trees -= 1;
                    return Ok(id);
                }
                Some(c) => {
                    self.cursor.pushback(Symbol::Char(c))?;
                    return Err(Error::structural(
                        c,
                        "'(' or ')'",
                        self.cursor.last_position(),
                    ));
                }
                None => return Err(Error::unexpected_end("game tree", self.cursor.position())),
            }
        }
    }

    /// Reads every game tree until end of input, reporting skipped trees
    /// through the `log` facade.
    ///
    /// # Errors
    ///
    /// See [`parse_collection_with`](Self::parse_collection_with).
    pub fn parse_collection(&mut self) -> Result<Collection> {
        self.parse_collection_with(LogSink)
    }

    /// Reads every game tree until end of input.
    ///
    /// When a game tree fails and the [`Recovery`](crate::Recovery) policy
    /// allows it, the partial tree is discarded, a warning goes to `sink`, and
    /// reading resumes at the next `(` outside of any game tree.
    ///
    /// # Errors
    ///
    /// The error of a game tree that may not be skipped, and any I/O or
    /// cursor error.
    pub fn parse_collection_with<S: DiagnosticSink>(&mut self, mut sink: S) -> Result<Collection> {
        let mut arena = TreeArena::default();
        let mut roots = Vec::new();

        while self.peek_significant()?.is_some() {
            let mark = arena.len();
            let start = self.cursor.position();
            self.open_trees = 0;

            match self.read_game_tree(&mut arena) {
                Ok(id) => roots.push(id),
                Err(err)
                    if err.is_recoverable() && self.options.recovery.allows_skip(roots.len()) =>
                {
                    arena.rollback(mark);
                    sink.notice(
                        Level::Warn,
                        &format!("skipping malformed game tree starting at {start}: {err}"),
                    );
                    self.resynchronize()?;
                }
                Err(err) => return Err(err),
            }
        }

        Ok(arena.finish(roots))
    }

    /// Skips input up to the next `(` that is outside of every game tree,
    /// leaving it in the stream. Value bodies are skipped whole, so
    /// delimiters inside them do not count.
    fn resynchronize(&mut self) -> Result<()> {
        let mut depth = self.open_trees;
        let mut value: Option<ValueState> = None;

        while let Some(symbol) = self.cursor.next()? {
            let Symbol::Char(c) = symbol else {
                continue;
            };

            value = match (value, c) {
                (Some(ValueState::Escaped), _) => Some(ValueState::Normal),
                (Some(ValueState::Normal), ESCAPE) => Some(ValueState::Escaped),
                (Some(ValueState::Normal), VALUE_END) => None,
                (Some(ValueState::Normal), _) => value,
                (None, VALUE_START) => Some(ValueState::Normal),
                (None, TREE_START) if depth == 0 => {
                    self.cursor.pushback(symbol)?;
                    break;
                }
                (None, TREE_START) => {
                    depth += 1;
                    None
                }
                (None, TREE_END) => {
                    depth = depth.saturating_sub(1);
                    None
                }
                (None, _) => None,
            };
        }

        self.open_trees = 0;
        Ok(())
    }
}
