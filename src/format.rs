//! Game Record Format
//!
//! This module documents the textual game-record format read by this library
//! and defines its delimiter characters.
//!
//! # Grammar
//!
//! ```text
//! Collection = { GameTree }
//! GameTree   = "(" Sequence { GameTree } ")"
//! Sequence   = Node { Node }
//! Node       = ";" { Property }
//! Property   = PropIdent PropValue { PropValue }
//! PropIdent  = UcLetter [ UcLetter ]
//! PropValue  = "[" ValueBody "]"
//! ```
//!
//! A document is a forest of game trees. Each game tree is a mainline of nodes
//! followed by zero or more nested game trees, the variations:
//!
//! ```text
//! (;FF[4]GM[1]SZ[19]
//!   ;B[pd];W[dp]
//!   (;B[pp];W[dd])
//!   (;B[dd];W[pp]))
//! ```
//!
//! ## Whitespace
//!
//! Space, tab, CR and LF may appear around delimiters and around identifiers
//! and are ignored there. Inside a value body they are content.
//!
//! ## Identifiers
//!
//! One or two uppercase ASCII letters. Their meaning is not interpreted: `B`,
//! `FF` or `ZZ` are all accepted.
//!
//! ## Values
//!
//! | Input            | Decoded            |
//! |------------------|--------------------|
//! | `\]`, `\\`, `\x` | `]`, `\`, `x`      |
//! | tab              | single space       |
//! | `\` + line break | removed (soft line break; CRLF and LFCR count as one) |
//! | bare line break  | kept as is         |
//! | invalid UTF-8    | dropped            |
//!
//! A value ends at the first `]` that is not escaped.

/// Opens a game tree.
pub const TREE_START: char = '(';
/// Closes a game tree.
pub const TREE_END: char = ')';
/// Starts a node.
pub const NODE_SEPARATOR: char = ';';
/// Opens a property value.
pub const VALUE_START: char = '[';
/// Closes a property value.
pub const VALUE_END: char = ']';
/// Escapes the next character of a value body.
pub const ESCAPE: char = '\\';

/// Whitespace that is insignificant between tokens.
#[must_use]
pub const fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

/// Whether `first` followed by `second` is a two-character line terminator.
#[must_use]
pub const fn is_line_pair(first: char, second: char) -> bool {
    matches!((first, second), ('\r', '\n') | ('\n', '\r'))
}

/// Characters that end a node or a game tree.
#[must_use]
pub const fn is_boundary(c: char) -> bool {
    matches!(c, NODE_SEPARATOR | TREE_START | TREE_END)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_pairs() {
        assert!(is_line_pair('\r', '\n'));
        assert!(is_line_pair('\n', '\r'));
        assert!(!is_line_pair('\n', '\n'));
        assert!(!is_line_pair('\r', 'x'));
    }

    #[test]
    fn test_boundaries() {
        assert!(is_boundary(';'));
        assert!(is_boundary('('));
        assert!(is_boundary(')'));
        assert!(!is_boundary('['));
        assert!(!is_boundary('B'));
    }
}
