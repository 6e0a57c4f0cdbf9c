//! Reader errors

use std::fmt;

/// The reader could not make sense of the input.
///
/// `line` is 1-based and points at the best known location: the offending token, or the
/// line where an unterminated collection was opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub line: usize,
    pub message: String,
}

impl SyntaxError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Syntax error at line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for SyntaxError {}
