//! Shared utilities: error types and the name table.

pub mod errors;
pub mod names;

pub use errors::{Diagnostic, LexError, NameError};
pub use names::{ErrorCode, ErrorCodeBlock, NameId, NameTable};
