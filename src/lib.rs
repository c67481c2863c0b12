//! # sgf_tree
//!
//! A reader for parenthesis-delimited game records (the SGF family) that
//! builds a navigable tree of game trees, nodes and properties.
//!
//! ## What is read?
//!
//! A game record is a collection of game trees. A game tree is a mainline of
//! nodes followed by nested game trees (the variations); a node carries
//! properties made of a short uppercase identifier and one or more bracketed
//! values:
//!
//! ```text
//! (;FF[4]GM[1]C[A comment with a \] bracket]
//!   ;B[pd];W[dp]
//!   (;B[pp])
//!   (;B[dd]))
//! ```
//!
//! See [`format`] for the grammar and the value escaping rules.
//!
//! ## Quick Start
//!
//! ```rust
//! use sgf_tree::from_str;
//!
//! let collection = from_str("(;FF[AA];C[bbb])").unwrap();
//! assert_eq!(collection.len(), 1);
//!
//! let tree = collection.get(0).unwrap();
//! let nodes = tree.sequence().nodes();
//! assert_eq!(nodes.len(), 2);
//! assert_eq!(nodes[0].get("FF").unwrap().value(), "AA");
//! assert_eq!(nodes[1].get("C").unwrap().value(), "bbb");
//! assert_eq!(tree.child_count(), 0);
//! ```
//!
//! ### Variations
//!
//! ```rust
//! use sgf_tree::from_str;
//!
//! let collection = from_str("(;(;)(;))").unwrap();
//! let root = collection.get(0).unwrap();
//! assert!(root.sequence().first().is_empty());
//! assert_eq!(root.child_count(), 2);
//! for child in root.children() {
//!     assert_eq!(child.parent().unwrap().id(), root.id());
//! }
//! ```
//!
//! ### Dumping through serde
//!
//! Parsed collections implement `serde::Serialize`, so any serde format can
//! be used to inspect them:
//!
//! ```rust
//! let collection = sgf_tree::from_str("(;B[aa])").unwrap();
//! let json = serde_json::to_string(&collection).unwrap();
//! assert_eq!(json, r#"[{"sequence":[[{"ident":"B","values":["aa"]}]],"children":[]}]"#);
//! ```
//!
//! ## Error Handling
//!
//! Every reader returns [`Result`]. A malformed game tree after the first one
//! is reported through the `log` facade and skipped; see [`Recovery`] for the
//! other policies and [`Parser::parse_collection_with`] for collecting the
//! notices yourself.

pub mod cursor;
pub mod diagnostics;
pub mod error;
pub mod format;
pub mod options;
pub mod parser;
pub mod tree;

pub use diagnostics::{Diagnostic, DiagnosticSink, LogSink};
pub use error::{Error, Position, Result};
pub use options::{ParseOptions, Recovery};
pub use parser::Parser;
pub use tree::{Collection, GameTreeRef, Node, PropIdent, PropValue, Property, Sequence, TreeId};

use std::io;

/// Parse a collection from a string.
///
/// # Examples
///
/// ```rust
/// use sgf_tree::from_str;
///
/// let collection = from_str("(;GM[1]SZ[19];B[pd])").unwrap();
/// assert_eq!(collection.get(0).unwrap().sequence().len(), 2);
/// ```
///
/// # Errors
///
/// Returns an error if the first game tree is malformed, or if a later one
/// fails with an error that cannot be skipped.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str(s: &str) -> Result<Collection> {
    from_str_with_options(s, ParseOptions::default())
}

/// Parse a collection from a string with custom options.
///
/// # Errors
///
/// Returns an error if parsing fails under the configured [`Recovery`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str_with_options(s: &str, options: ParseOptions) -> Result<Collection> {
    from_slice_with_options(s.as_bytes(), options)
}

/// Parse a collection from bytes.
///
/// Byte sequences that are not valid UTF-8 are dropped rather than rejected.
///
/// # Examples
///
/// ```rust
/// use sgf_tree::from_slice;
///
/// let collection = from_slice(b"(;C[caf\xff\xc3\xa9])").unwrap();
/// let comment = collection.get(0).unwrap().sequence().first().get("C").unwrap();
/// assert_eq!(comment.value(), "caf\u{e9}");
/// ```
///
/// # Errors
///
/// Returns an error if parsing fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice(v: &[u8]) -> Result<Collection> {
    from_slice_with_options(v, ParseOptions::default())
}

/// Parse a collection from bytes with custom options.
///
/// # Errors
///
/// Returns an error if parsing fails under the configured [`Recovery`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice_with_options(v: &[u8], options: ParseOptions) -> Result<Collection> {
    Parser::with_options(v, options).parse_collection()
}

/// Parse a collection from an I/O stream.
///
/// The reader is buffered internally and consumed one character at a time.
///
/// # Examples
///
/// ```rust
/// use sgf_tree::from_reader;
/// use std::io::Cursor;
///
/// let cursor = Cursor::new(b"(;B[aa])(;W[bb])".to_vec());
/// let collection = from_reader(cursor).unwrap();
/// assert_eq!(collection.len(), 2);
/// ```
///
/// # Errors
///
/// Returns an error if reading from the reader fails or parsing fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R>(reader: R) -> Result<Collection>
where
    R: io::Read,
{
    from_reader_with_options(reader, ParseOptions::default())
}

/// Parse a collection from an I/O stream with custom options.
///
/// # Errors
///
/// Returns an error if reading from the reader fails or parsing fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader_with_options<R>(reader: R, options: ParseOptions) -> Result<Collection>
where
    R: io::Read,
{
    Parser::with_options(io::BufReader::new(reader), options).parse_collection()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_node_sequence() {
        let collection = from_str("(;FF[AA];C[bbb])").unwrap();
        assert_eq!(collection.len(), 1);

        let tree = collection.get(0).unwrap();
        assert_eq!(tree.sequence().len(), 2);
        assert_eq!(tree.sequence().nodes()[0].get("FF").unwrap().value(), "AA");
        assert_eq!(tree.sequence().nodes()[1].get("C").unwrap().value(), "bbb");
        assert_eq!(tree.child_count(), 0);
    }

    #[test]
    fn test_single_empty_node() {
        let collection = from_str("(;)").unwrap();
        let tree = collection.get(0).unwrap();
        assert_eq!(tree.sequence().len(), 1);
        assert!(tree.sequence().first().is_empty());
    }

    #[test]
    fn test_from_reader_matches_from_str() {
        let doc = "(;GM[1](;B[aa];W[bb])(;B[cc]))";
        let streamed = from_reader(io::Cursor::new(doc.as_bytes().to_vec())).unwrap();
        assert_eq!(streamed, from_str(doc).unwrap());
    }

    #[test]
    fn test_options_are_applied() {
        let doc = "(;)(;b[x])";
        assert_eq!(from_str(doc).unwrap().len(), 1);
        assert!(from_str_with_options(doc, ParseOptions::strict()).is_err());
    }
}
