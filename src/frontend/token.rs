//! Symbol types produced by the scanner.
//!
//! A symbol is one lexical unit: a kind (with its payload) plus the 0-based
//! line and column of its first character. Filler words — connective words
//! with no grammatical role — still produce a symbol, of kind
//! [`SymbolKind::Filler`], so the parser can skip them without the scanner
//! ever returning nothing.

use crate::utils::names::NameId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A symbol in the definition file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbol {
    /// The kind of symbol, carrying its payload.
    pub kind: SymbolKind,
    /// Line of the symbol's first character (0-based).
    pub line: usize,
    /// Column of the symbol's first character (0-based).
    pub column: usize,
}

impl Symbol {
    pub fn new(kind: SymbolKind, line: usize, column: usize) -> Self {
        Self { kind, line, column }
    }

    pub fn is_eof(&self) -> bool {
        matches!(self.kind, SymbolKind::Eof)
    }

    /// Filler symbols carry no grammatical meaning and are skipped by the
    /// parser without consuming a grammar slot.
    pub fn is_filler(&self) -> bool {
        matches!(self.kind, SymbolKind::Filler)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}:{}", self.kind, self.line, self.column)
    }
}

/// The kind of a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `.`
    Dot,
    /// `{`
    OpenBrace,
    /// `}`
    CloseBrace,
    /// A reserved word with grammatical meaning.
    Keyword(Keyword),
    /// An interned user name (device, kind, or port).
    Name(NameId),
    /// An integer literal, parsed at token creation.
    Number(u32),
    /// A filler word; consumed but never interned.
    Filler,
    /// End of input.
    Eof,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolKind::Comma => write!(f, "','"),
            SymbolKind::Semicolon => write!(f, "';'"),
            SymbolKind::Dot => write!(f, "'.'"),
            SymbolKind::OpenBrace => write!(f, "'{{'"),
            SymbolKind::CloseBrace => write!(f, "'}}'"),
            SymbolKind::Keyword(kw) => write!(f, "keyword '{}'", kw.as_str()),
            SymbolKind::Name(id) => write!(f, "name #{}", id.as_raw()),
            SymbolKind::Number(n) => write!(f, "number {}", n),
            SymbolKind::Filler => write!(f, "filler"),
            SymbolKind::Eof => write!(f, "end of file"),
        }
    }
}

/// The fixed keyword set of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Keyword {
    /// `Device` — opens the device section.
    Device,
    /// `device` — lowercase form, also opens the device section.
    DeviceLower,
    /// `Connection` — opens the connection section.
    Connection,
    /// `Monitor` — opens the monitor section.
    Monitor,
    /// `is` — linking verb in a device statement.
    Is,
    /// `are` — linking verb in a device statement.
    Are,
    /// `input`
    Input,
    /// `connect` — joins the two sides of a connection statement.
    Connect,
}

impl Keyword {
    /// All keywords, in a fixed order. Interned once at scanner
    /// construction so their ids are stable.
    pub const ALL: [Keyword; 8] = [
        Keyword::Device,
        Keyword::DeviceLower,
        Keyword::Connection,
        Keyword::Monitor,
        Keyword::Is,
        Keyword::Are,
        Keyword::Input,
        Keyword::Connect,
    ];

    /// The keyword for a string, if it is one.
    pub fn from_str(s: &str) -> Option<Keyword> {
        match s {
            "Device" => Some(Keyword::Device),
            "device" => Some(Keyword::DeviceLower),
            "Connection" => Some(Keyword::Connection),
            "Monitor" => Some(Keyword::Monitor),
            "is" => Some(Keyword::Is),
            "are" => Some(Keyword::Are),
            "input" => Some(Keyword::Input),
            "connect" => Some(Keyword::Connect),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Device => "Device",
            Keyword::DeviceLower => "device",
            Keyword::Connection => "Connection",
            Keyword::Monitor => "Monitor",
            Keyword::Is => "is",
            Keyword::Are => "are",
            Keyword::Input => "input",
            Keyword::Connect => "connect",
        }
    }

    /// Whether this keyword opens a top-level section.
    pub fn opens_section(&self) -> bool {
        matches!(
            self,
            Keyword::Device | Keyword::DeviceLower | Keyword::Connection | Keyword::Monitor
        )
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
