//! Configuration options for collection parsing.
//!
//! - [`ParseOptions`]: main configuration struct
//! - [`Recovery`]: what the collection driver does with a malformed game tree
//!
//! ## Examples
//!
//! ```rust
//! use sgf_tree::{from_str_with_options, ParseOptions, Recovery};
//!
//! let doc = "(;GM[1])(;b[aa])(;GM[1])";
//!
//! // Default: the broken second tree is skipped
//! let collection = from_str_with_options(doc, ParseOptions::new()).unwrap();
//! assert_eq!(collection.len(), 2);
//!
//! // Strict: any malformed tree fails the whole parse
//! let options = ParseOptions::new().with_recovery(Recovery::Strict);
//! assert!(from_str_with_options(doc, options).is_err());
//! ```

/// Policy applied when a top-level game tree fails to parse.
///
/// Whatever the policy, I/O errors and cursor defects always abort.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Recovery {
    /// Report and skip a malformed tree, unless it is the first tree of the
    /// document, in which case the error aborts the parse.
    #[default]
    SkipMalformed,
    /// Abort on the first malformed tree.
    Strict,
    /// Report and skip every malformed tree, including the first.
    Permissive,
}

impl Recovery {
    /// Whether a failure may be skipped once `collected` trees were parsed.
    #[must_use]
    pub const fn allows_skip(self, collected: usize) -> bool {
        match self {
            Recovery::SkipMalformed => collected > 0,
            Recovery::Strict => false,
            Recovery::Permissive => true,
        }
    }
}

/// Configuration options for parsing a collection.
///
/// # Examples
///
/// ```rust
/// use sgf_tree::{ParseOptions, Recovery};
///
/// let options = ParseOptions::new();
/// assert_eq!(options.recovery, Recovery::SkipMalformed);
///
/// let options = ParseOptions::strict();
/// assert_eq!(options.recovery, Recovery::Strict);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParseOptions {
    pub recovery: Recovery,
}

impl ParseOptions {
    /// Creates default options (skip malformed trees after the first).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options that fail on the first malformed tree.
    #[must_use]
    pub fn strict() -> Self {
        ParseOptions {
            recovery: Recovery::Strict,
        }
    }

    /// Options that keep going past every malformed tree.
    #[must_use]
    pub fn permissive() -> Self {
        ParseOptions {
            recovery: Recovery::Permissive,
        }
    }

    /// Sets the recovery policy.
    #[must_use]
    pub fn with_recovery(mut self, recovery: Recovery) -> Self {
        self.recovery = recovery;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_skip() {
        assert!(!Recovery::SkipMalformed.allows_skip(0));
        assert!(Recovery::SkipMalformed.allows_skip(1));
        assert!(!Recovery::Strict.allows_skip(5));
        assert!(Recovery::Permissive.allows_skip(0));
    }

    #[test]
    fn test_builder() {
        let options = ParseOptions::strict().with_recovery(Recovery::Permissive);
        assert_eq!(options, ParseOptions::permissive());
    }
}
