//! Error types for the frontend.
//!
//! Failures come in two tiers. Lexical failures (`LexError`) are fatal: the
//! scan cannot continue and the caller gets an `Err`. Syntax and semantic
//! problems are non-fatal: the parser records a `Diagnostic` for each and
//! keeps going so one pass reports as many problems as possible.

use crate::utils::names::ErrorCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Fatal error during scanning.
#[derive(Error, Debug)]
pub enum LexError {
    /// A character outside the language's alphabet.
    #[error("invalid character '{ch}' at {line}:{column}")]
    UnexpectedChar { ch: char, line: usize, column: usize },

    /// A `// ... //` bulk comment still open at end of input.
    #[error("reached end of file inside a bulk comment opened at {line}:{column}")]
    UnterminatedComment { line: usize, column: usize },

    /// The definition file could not be read at all.
    #[error("cannot read definition file: {0}")]
    Unreadable(#[from] std::io::Error),
}

/// Error raised by the name table on malformed input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    /// Names must start with a letter and continue alphanumerically.
    #[error("'{name}' is not a valid name")]
    InvalidName { name: String },
}

/// One recorded syntax or semantic error.
///
/// `line` and `column` are the 0-based position of the offending symbol's
/// first character, taken verbatim from the scanner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The allocated code the message was looked up under.
    pub code: ErrorCode,
    /// Human-readable message from the parser's error dictionary.
    pub message: String,
    /// Line of the offending symbol (0-based).
    pub line: usize,
    /// Column of the offending symbol (0-based).
    pub column: usize,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}
