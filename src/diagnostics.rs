//! Non-fatal notices emitted by the collection driver.
//!
//! The driver is the only part of the parser that reports anything; it is
//! handed a [`DiagnosticSink`] explicitly. [`LogSink`] forwards notices to the
//! [`log`] facade, and a `Vec<Diagnostic>` keeps them for inspection.
//!
//! ```rust
//! use sgf_tree::{Diagnostic, Parser};
//!
//! let mut notices: Vec<Diagnostic> = Vec::new();
//! let mut parser = Parser::new("(;B[aa])(;W[bb](".as_bytes());
//! let collection = parser.parse_collection_with(&mut notices).unwrap();
//!
//! assert_eq!(collection.len(), 1);
//! assert_eq!(notices.len(), 1);
//! assert_eq!(notices[0].level, log::Level::Warn);
//! ```

use log::Level;

/// Receiver of leveled diagnostic messages.
pub trait DiagnosticSink {
    fn notice(&mut self, level: Level, message: &str);
}

/// Forwards every notice to the `log` facade under the `sgf_tree` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn notice(&mut self, level: Level, message: &str) {
        log::log!(target: "sgf_tree", level, "{}", message);
    }
}

/// A recorded notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn notice(&mut self, level: Level, message: &str) {
        self.push(Diagnostic {
            level,
            message: message.to_string(),
        });
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn notice(&mut self, level: Level, message: &str) {
        (**self).notice(level, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_sink_records_in_order() {
        let mut sink: Vec<Diagnostic> = Vec::new();
        sink.notice(Level::Warn, "first");
        sink.notice(Level::Info, "second");
        assert_eq!(
            sink,
            vec![
                Diagnostic {
                    level: Level::Warn,
                    message: "first".to_string()
                },
                Diagnostic {
                    level: Level::Info,
                    message: "second".to_string()
                },
            ]
        );
    }

    #[test_log::test]
    fn test_log_sink_does_not_panic() {
        let mut sink = LogSink;
        sink.notice(Level::Warn, "skipping game tree");
    }
}
