//! Scanner for the circuit definition language.
//!
//! Turns a character source into [`Symbol`]s, tracking the 0-based line and
//! column of every symbol for diagnostics. Comments and whitespace are
//! skipped here; filler words come back as [`SymbolKind::Filler`] so the
//! parser can discard them without losing its place.

use crate::frontend::token::{Keyword, Symbol, SymbolKind};
use crate::utils::errors::LexError;
use crate::utils::names::NameTable;
use log::trace;
use std::path::Path;

/// Words with no grammatical role. Consumed, never interned.
const FILLER_WORDS: [&str; 11] = [
    "gate",
    "gates",
    "a",
    "an",
    "with",
    "some",
    "initially",
    "inputs",
    "connected",
    "cycles",
    "simulation",
];

/// A scanner over one definition source.
///
/// Built either from a file path or from an in-memory string; the choice is
/// made at construction and the scanning behaviour is identical.
#[derive(Debug)]
pub struct Scanner {
    chars: Vec<char>,
    /// Index of the current (unconsumed) character.
    pos: usize,
    /// Current line (0-based).
    line: usize,
    /// Current column (0-based); resets to 0 after a newline is consumed.
    column: usize,
    /// Symbols produced so far.
    symbol_count: usize,
}

impl Scanner {
    /// Scan an in-memory string. Keywords are interned into `names` up
    /// front so their ids are stable for the parser.
    pub fn from_source(source: &str, names: &mut NameTable) -> Self {
        Self::intern_keywords(names);
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 0,
            column: 0,
            symbol_count: 0,
        }
    }

    /// Scan a definition file. Fails with [`LexError::Unreadable`] if the
    /// file cannot be read.
    pub fn from_path(path: &Path, names: &mut NameTable) -> Result<Self, LexError> {
        let source = std::fs::read_to_string(path)?;
        Ok(Self::from_source(&source, names))
    }

    fn intern_keywords(names: &mut NameTable) {
        let words: Vec<&str> = Keyword::ALL.iter().map(|kw| kw.as_str()).collect();
        names
            .lookup(&words)
            .unwrap_or_else(|e| panic!("keyword set failed to intern: {}", e));
    }

    /// Line of the current character (0-based).
    pub fn line(&self) -> usize {
        self.line
    }

    /// Column of the current character (0-based).
    pub fn column(&self) -> usize {
        self.column
    }

    /// Number of symbols produced so far.
    pub fn symbol_count(&self) -> usize {
        self.symbol_count
    }

    /// Peek at the current character without consuming it.
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    /// Consume and return the current character, updating line/column
    /// bookkeeping. `None` at end of input.
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Advance past spaces, tabs, and newlines, leaving the cursor on the
    /// first non-whitespace character or at end of input.
    fn skip_whitespace(&mut self) {
        while self.peek().map(|c| c.is_whitespace()).unwrap_or(false) {
            self.advance();
        }
    }

    /// Consume the maximal alphanumeric run starting at the current letter.
    fn scan_word(&mut self) -> String {
        let mut word = String::new();
        while self.peek().map(|c| c.is_ascii_alphanumeric()).unwrap_or(false) {
            word.push(self.advance().unwrap_or_default());
        }
        word
    }

    /// Consume the maximal digit run and parse it. The literal is kept as
    /// an integer from here on; nothing downstream re-converts text.
    fn scan_number(&mut self) -> u32 {
        let mut value: u32 = 0;
        while let Some(c) = self.peek() {
            match c.to_digit(10) {
                Some(d) => {
                    value = value.saturating_mul(10).saturating_add(d);
                    self.advance();
                }
                None => break,
            }
        }
        value
    }

    /// Skip a `# ...` line comment: everything up to and past the next
    /// newline (or to end of input).
    fn skip_line_comment(&mut self) {
        while let Some(c) = self.advance() {
            if c == '\n' {
                break;
            }
        }
    }

    /// Skip a `// ... //` bulk comment. The opening `/` has been consumed;
    /// the closing delimiter is two consecutive slashes. Reaching end of
    /// input first is a fatal lexical error.
    fn skip_bulk_comment(&mut self, line: usize, column: usize) -> Result<(), LexError> {
        // A lone '/' is not part of the alphabet at all.
        match self.peek() {
            Some('/') => {
                self.advance();
            }
            _ => return Err(LexError::UnexpectedChar { ch: '/', line, column }),
        }
        let mut consecutive = 0;
        while consecutive < 2 {
            match self.advance() {
                Some('/') => consecutive += 1,
                Some(_) => consecutive = 0,
                None => return Err(LexError::UnterminatedComment { line, column }),
            }
        }
        Ok(())
    }

    /// Translate the next run of characters into a symbol.
    ///
    /// Comments produce no symbol of their own: the call loops and returns
    /// the next real symbol after them. Filler words do produce a symbol
    /// (kind [`SymbolKind::Filler`]) but are never interned.
    pub fn next_symbol(&mut self, names: &mut NameTable) -> Result<Symbol, LexError> {
        loop {
            self.skip_whitespace();
            let line = self.line;
            let column = self.column;

            let kind = match self.peek() {
                Some(c) if c.is_ascii_alphabetic() => {
                    let word = self.scan_word();
                    if FILLER_WORDS.contains(&word.as_str()) {
                        SymbolKind::Filler
                    } else if let Some(kw) = Keyword::from_str(&word) {
                        SymbolKind::Keyword(kw)
                    } else {
                        // Identifier shape is guaranteed by scan_word.
                        let ids = names
                            .lookup(&[word.as_str()])
                            .unwrap_or_else(|e| panic!("scanned word failed to intern: {}", e));
                        SymbolKind::Name(ids[0])
                    }
                }
                Some(c) if c.is_ascii_digit() => SymbolKind::Number(self.scan_number()),
                Some(',') => {
                    self.advance();
                    SymbolKind::Comma
                }
                Some(';') => {
                    self.advance();
                    SymbolKind::Semicolon
                }
                Some('.') => {
                    self.advance();
                    SymbolKind::Dot
                }
                Some('{') => {
                    self.advance();
                    SymbolKind::OpenBrace
                }
                Some('}') => {
                    self.advance();
                    SymbolKind::CloseBrace
                }
                Some('#') => {
                    self.advance();
                    self.skip_line_comment();
                    continue;
                }
                Some('/') => {
                    self.advance();
                    self.skip_bulk_comment(line, column)?;
                    continue;
                }
                Some(ch) => return Err(LexError::UnexpectedChar { ch, line, column }),
                None => SymbolKind::Eof,
            };

            let symbol = Symbol::new(kind, line, column);
            trace!("scanned {}", symbol);
            self.symbol_count += 1;
            return Ok(symbol);
        }
    }
}
