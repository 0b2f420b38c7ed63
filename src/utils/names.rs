//! Name table: string interning plus error-code allocation.
//!
//! Every component of the frontend shares one `NameTable`. Device names,
//! port names, and keywords all live in a single dense id space, and the
//! same table hands out the non-overlapping error-code blocks that the
//! parser's diagnostic dictionary is keyed by.

use crate::utils::errors::NameError;
use serde::{Deserialize, Serialize};
use std::fmt;
use string_interner::{backend::StringBackend, DefaultSymbol, StringInterner, Symbol as SymbolTrait};

type Backend = StringBackend<DefaultSymbol>;

/// A dense integer id for an interned name.
///
/// Ids start at 0, increase monotonically, and are never reused within a
/// process lifetime.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NameId(u32);

impl NameId {
    pub(crate) fn from_raw(index: u32) -> Self {
        NameId(index)
    }

    pub fn as_raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Debug for NameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NameId({})", self.0)
    }
}

/// An allocated diagnostic code.
///
/// Codes are drawn from their own counter, so an `ErrorCode` can never be
/// confused with a `NameId`: they are used only as keys into the parser's
/// message dictionary.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorCode(u32);

impl ErrorCode {
    pub fn as_raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ErrorCode({})", self.0)
    }
}

/// A contiguous block of freshly allocated error codes.
///
/// Blocks handed to different components never overlap.
#[derive(Debug, Clone, Copy)]
pub struct ErrorCodeBlock {
    start: u32,
    len: u32,
}

impl ErrorCodeBlock {
    /// The `i`-th code of the block. Panics if `i` is out of range; a
    /// component asking for more codes than it allocated is a programming
    /// error, not a runtime condition.
    pub fn code(&self, i: u32) -> ErrorCode {
        assert!(i < self.len, "error-code block of {} has no index {}", self.len, i);
        ErrorCode(self.start + i)
    }

    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterate over every code in the block, in order.
    pub fn codes(&self) -> impl Iterator<Item = ErrorCode> {
        let start = self.start;
        (0..self.len).map(move |i| ErrorCode(start + i))
    }
}

/// The shared name table.
///
/// Explicitly owned and passed by reference to the scanner, parser, and
/// builders; there is no global instance.
#[derive(Debug)]
pub struct NameTable {
    interner: StringInterner<Backend>,
    error_code_count: u32,
}

impl Default for NameTable {
    fn default() -> Self {
        Self::new()
    }
}

impl NameTable {
    pub fn new() -> Self {
        Self {
            interner: StringInterner::new(),
            error_code_count: 0,
        }
    }

    /// Intern each string, returning its id (existing or freshly assigned)
    /// in input order.
    ///
    /// Strings must be identifier-shaped: a letter followed by
    /// alphanumerics. Anything else is rejected rather than coerced.
    pub fn lookup<S: AsRef<str>>(&mut self, strings: &[S]) -> Result<Vec<NameId>, NameError> {
        let mut ids = Vec::with_capacity(strings.len());
        for s in strings {
            let s = s.as_ref();
            Self::validate(s)?;
            let sym = self.interner.get_or_intern(s);
            ids.push(NameId(sym.to_usize() as u32));
        }
        Ok(ids)
    }

    /// Pure lookup: the id for `name` if it has been interned, without
    /// mutating the table.
    pub fn query(&self, name: &str) -> Result<Option<NameId>, NameError> {
        Self::validate(name)?;
        Ok(self
            .interner
            .get(name)
            .map(|sym| NameId(sym.to_usize() as u32)))
    }

    /// Inverse lookup. `None` for any id outside the assigned range.
    pub fn get_string(&self, id: NameId) -> Option<&str> {
        let sym = DefaultSymbol::try_from_usize(id.0 as usize)?;
        self.interner.resolve(sym)
    }

    /// Number of names currently interned.
    pub fn len(&self) -> usize {
        self.interner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interner.is_empty()
    }

    /// Allocate `n` fresh error codes as one contiguous block.
    pub fn allocate_error_codes(&mut self, n: u32) -> ErrorCodeBlock {
        let start = self.error_code_count;
        self.error_code_count += n;
        ErrorCodeBlock { start, len: n }
    }

    fn validate(name: &str) -> Result<(), NameError> {
        let mut chars = name.chars();
        let valid = match chars.next() {
            Some(c) if c.is_ascii_alphabetic() => chars.all(|c| c.is_ascii_alphanumeric()),
            _ => false,
        };
        if valid {
            Ok(())
        } else {
            Err(NameError::InvalidName {
                name: name.to_string(),
            })
        }
    }
}
