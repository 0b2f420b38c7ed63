//! Recursive-descent parser for the circuit definition language.
//!
//! The parser pulls one symbol at a time from the [`Scanner`] (single-token
//! lookahead, no backtracking), validates the three-section grammar, and
//! drives the device, network, and monitor builders. Errors do not stop the
//! pass: each one is recorded as a [`Diagnostic`] with its allocated code
//! and source position, the parser resynchronizes at the next statement
//! boundary, and scanning continues so one run reports as many problems as
//! possible.
//!
//! Grammar:
//!
//! ```text
//! circuit            := device_section connection_section monitor_section
//! device_section     := "Device" "{" { device_stmt } "}"
//! connection_section := "Connection" "{" { connection_stmt } "}"
//! monitor_section    := "Monitor" "{" { monitor_stmt } "}"
//! device_stmt        := NAME {"," NAME} ("is"|"are") NAME [NUMBER] ";"
//! connection_stmt    := NAME ["." NAME] "connect" NAME "." NAME ";"
//! monitor_stmt       := signal {"," signal} ";"
//! signal             := NAME ["." NAME]
//! ```

use crate::frontend::scanner::Scanner;
use crate::frontend::token::{Keyword, Symbol, SymbolKind};
use crate::model::devices::Devices;
use crate::model::monitors::Monitors;
use crate::model::network::Network;
use crate::utils::errors::{Diagnostic, LexError};
use crate::utils::names::{ErrorCode, NameTable};
use log::debug;
use std::collections::HashMap;

/// The parser's own (syntax) error codes, one block of 16.
#[derive(Debug, Clone, Copy)]
struct SyntaxCodes {
    no_sections: ErrorCode,
    no_device_section: ErrorCode,
    no_connection_section: ErrorCode,
    no_monitor_section: ErrorCode,
    no_linking_verb: ErrorCode,
    no_semicolon: ErrorCode,
    no_comma: ErrorCode,
    no_dot: ErrorCode,
    no_open_brace: ErrorCode,
    no_close_brace: ErrorCode,
    no_device: ErrorCode,
    no_number: ErrorCode,
    no_connect: ErrorCode,
    invalid_device_name: ErrorCode,
    invalid_device_kind: ErrorCode,
    invalid_port: ErrorCode,
}

impl SyntaxCodes {
    fn messages(&self) -> Vec<(ErrorCode, &'static str)> {
        vec![
            (self.no_sections, "Error: Expected a section"),
            (self.no_device_section, "Error: Expected a device section"),
            (self.no_connection_section, "Error: Expected a connection section"),
            (self.no_monitor_section, "Error: Expected a monitor section"),
            (self.no_linking_verb, "Error: Expected 'is' or 'are'"),
            (self.no_semicolon, "Error: Expected a ';'"),
            (self.no_comma, "Error: Expected a ','"),
            (self.no_dot, "Error: Expected a '.'"),
            (self.no_open_brace, "Error: Expected a '{'"),
            (self.no_close_brace, "Error: Expected a '}'"),
            (self.no_device, "Error: Expected a device kind"),
            (self.no_number, "Error: Expected a number"),
            (self.no_connect, "Error: Expected 'connect'"),
            (self.invalid_device_name, "Error: Invalid device name"),
            (self.invalid_device_kind, "Error: No such device kind"),
            (self.invalid_port, "Error: Invalid port"),
        ]
    }
}

/// Where the cursor ended up after a statement (or a recovery).
enum Flow {
    /// At the start of the next statement.
    Continue,
    /// The section's `}` has been consumed.
    SectionDone,
    /// End of input.
    EndOfInput,
}

/// The three top-level sections, in their mandatory order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Device,
    Connection,
    Monitor,
}

/// Parser over one definition source.
///
/// Borrows the shared [`NameTable`] and the three builders for the duration
/// of the parse; owns the [`Scanner`]. All diagnostics accumulate in
/// [`Parser::diagnostics`]; the builders are only driven while
/// `error_count == 0`, so a network is never built from an erroneous file.
pub struct Parser<'a> {
    scanner: Scanner,
    names: &'a mut NameTable,
    devices: &'a mut Devices,
    network: &'a mut Network,
    monitors: &'a mut Monitors,
    /// The single lookahead symbol. Never of kind `Filler`.
    current: Symbol,
    codes: SyntaxCodes,
    /// Exhaustive code-to-message dictionary, built once from this parser's
    /// codes plus every collaborator's declared codes.
    dictionary: HashMap<ErrorCode, &'static str>,
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
    device_section: bool,
    connection_section: bool,
    monitor_section: bool,
}

impl<'a> Parser<'a> {
    /// Create a parser, allocating its syntax error codes and pulling the
    /// initial lookahead symbol exactly once.
    pub fn new(
        mut scanner: Scanner,
        names: &'a mut NameTable,
        devices: &'a mut Devices,
        network: &'a mut Network,
        monitors: &'a mut Monitors,
    ) -> Result<Self, LexError> {
        let block = names.allocate_error_codes(16);
        let codes = SyntaxCodes {
            no_sections: block.code(0),
            no_device_section: block.code(1),
            no_connection_section: block.code(2),
            no_monitor_section: block.code(3),
            no_linking_verb: block.code(4),
            no_semicolon: block.code(5),
            no_comma: block.code(6),
            no_dot: block.code(7),
            no_open_brace: block.code(8),
            no_close_brace: block.code(9),
            no_device: block.code(10),
            no_number: block.code(11),
            no_connect: block.code(12),
            invalid_device_name: block.code(13),
            invalid_device_kind: block.code(14),
            invalid_port: block.code(15),
        };

        let mut dictionary = HashMap::new();
        for (code, message) in codes
            .messages()
            .into_iter()
            .chain(devices.error_messages())
            .chain(network.error_messages())
            .chain(monitors.error_messages())
        {
            dictionary.insert(code, message);
        }

        let current = Self::next_real(&mut scanner, names)?;
        Ok(Self {
            scanner,
            names,
            devices,
            network,
            monitors,
            current,
            codes,
            dictionary,
            diagnostics: Vec::new(),
            error_count: 0,
            device_section: false,
            connection_section: false,
            monitor_section: false,
        })
    }

    /// Cumulative number of recorded errors.
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Whether the device section has been encountered.
    pub fn device_section(&self) -> bool {
        self.device_section
    }

    /// Whether the connection section has been encountered.
    pub fn connection_section(&self) -> bool {
        self.connection_section
    }

    /// Whether the monitor section has been encountered.
    pub fn monitor_section(&self) -> bool {
        self.monitor_section
    }

    /// Every recorded diagnostic, in source order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Parse the whole definition file.
    ///
    /// `Ok(true)` means no errors were recorded and all three sections were
    /// present; `Ok(false)` means the pass completed but found problems.
    /// `Err` is reserved for fatal lexical failures, which abort the scan.
    pub fn parse(&mut self) -> Result<bool, LexError> {
        loop {
            match self.current.kind {
                SymbolKind::Eof => break,
                SymbolKind::Keyword(kw) if kw.opens_section() => {
                    self.parse_section(kw)?;
                }
                _ => {
                    self.report(self.codes.no_sections, self.current);
                    if let Flow::EndOfInput = self.recover()? {
                        break;
                    }
                }
            }
        }

        // Sections that never appeared are reported at end of input, unless
        // an out-of-order section already reported the same code.
        let end = self.current;
        if !self.device_section && !self.already_reported(self.codes.no_device_section) {
            self.report(self.codes.no_device_section, end);
        }
        if !self.connection_section && !self.already_reported(self.codes.no_connection_section) {
            self.report(self.codes.no_connection_section, end);
        }
        if !self.monitor_section {
            self.report(self.codes.no_monitor_section, end);
        }

        let success = self.error_count == 0
            && self.device_section
            && self.connection_section
            && self.monitor_section;
        debug!(
            "parse finished: {} error(s), sections {}/{}/{}",
            self.error_count, self.device_section, self.connection_section, self.monitor_section
        );
        Ok(success)
    }

    /// Parse one `keyword { ... }` section.
    fn parse_section(&mut self, keyword: Keyword) -> Result<(), LexError> {
        let section = match keyword {
            Keyword::Device | Keyword::DeviceLower => Section::Device,
            Keyword::Connection => Section::Connection,
            Keyword::Monitor => Section::Monitor,
            _ => unreachable!("only section keywords reach parse_section"),
        };

        // Order and uniqueness checks. A duplicate or out-of-order section
        // is reported but still parsed, so its statements are checked too.
        match section {
            Section::Device => {
                if self.device_section {
                    self.report(self.codes.no_sections, self.current);
                }
                self.device_section = true;
            }
            Section::Connection => {
                if !self.device_section {
                    self.report(self.codes.no_device_section, self.current);
                }
                if self.connection_section {
                    self.report(self.codes.no_sections, self.current);
                }
                self.connection_section = true;
            }
            Section::Monitor => {
                if !self.connection_section {
                    self.report(self.codes.no_connection_section, self.current);
                }
                if self.monitor_section {
                    self.report(self.codes.no_sections, self.current);
                }
                self.monitor_section = true;
            }
        }

        self.advance()?;
        match self.current.kind {
            SymbolKind::OpenBrace => self.advance()?,
            _ => {
                self.report(self.codes.no_open_brace, self.current);
                match self.recover()? {
                    Flow::Continue => {}
                    Flow::SectionDone | Flow::EndOfInput => return Ok(()),
                }
            }
        }

        loop {
            match self.current.kind {
                SymbolKind::CloseBrace => {
                    self.advance()?;
                    return Ok(());
                }
                SymbolKind::Eof => {
                    self.report(self.codes.no_close_brace, self.current);
                    return Ok(());
                }
                _ => {
                    let flow = match section {
                        Section::Device => self.parse_device_stmt()?,
                        Section::Connection => self.parse_connection_stmt()?,
                        Section::Monitor => self.parse_monitor_stmt()?,
                    };
                    match flow {
                        Flow::Continue => {}
                        Flow::SectionDone => return Ok(()),
                        Flow::EndOfInput => {
                            self.report(self.codes.no_close_brace, self.current);
                            return Ok(());
                        }
                    }
                }
            }
        }
    }

    /// `device_stmt := NAME {"," NAME} ("is"|"are") NAME [NUMBER] ";"`
    ///
    /// Each collected name is declared individually; a builder error on one
    /// name does not stop the remaining names of the same statement.
    fn parse_device_stmt(&mut self) -> Result<Flow, LexError> {
        let stmt_start = self.current;
        let mut declared = Vec::new();

        match self.current.kind {
            SymbolKind::Name(id) => {
                declared.push(id);
                self.advance()?;
            }
            _ => {
                self.report(self.codes.invalid_device_name, self.current);
                return self.recover();
            }
        }
        while matches!(self.current.kind, SymbolKind::Comma) {
            self.advance()?;
            match self.current.kind {
                SymbolKind::Name(id) => {
                    declared.push(id);
                    self.advance()?;
                }
                _ => {
                    self.report(self.codes.invalid_device_name, self.current);
                    return self.recover();
                }
            }
        }

        match self.current.kind {
            SymbolKind::Keyword(Keyword::Is) | SymbolKind::Keyword(Keyword::Are) => {
                self.advance()?;
            }
            _ => {
                self.report(self.codes.no_linking_verb, self.current);
                return self.recover();
            }
        }

        let kind_id = match self.current.kind {
            SymbolKind::Name(id) if self.devices.is_kind(id) => {
                self.advance()?;
                id
            }
            SymbolKind::Name(_) => {
                self.report(self.codes.invalid_device_kind, self.current);
                return self.recover();
            }
            _ => {
                self.report(self.codes.no_device, self.current);
                return self.recover();
            }
        };

        // The qualifier is mandatory for kinds that take one (gates, CLOCK,
        // SWITCH) and absent for the rest; out-of-range values are left to
        // the device builder.
        let qualifier = match self.current.kind {
            SymbolKind::Number(n) => {
                self.advance()?;
                Some(n)
            }
            _ if self.devices.requires_qualifier(kind_id) => {
                self.report(self.codes.no_number, self.current);
                return self.recover();
            }
            _ => None,
        };

        match self.current.kind {
            SymbolKind::Semicolon => self.advance()?,
            _ => {
                self.report(self.codes.no_semicolon, self.current);
                return self.recover();
            }
        }

        if self.error_count == 0 {
            for name in declared {
                if let Err(code) = self.devices.make_device(name, kind_id, qualifier) {
                    self.report(code, stmt_start);
                }
            }
        }
        Ok(Flow::Continue)
    }

    /// `connection_stmt := NAME ["." NAME] "connect" NAME "." NAME ";"`
    ///
    /// The left-hand dot is optional (a device with the single unnamed
    /// output needs none); the right-hand dot is mandatory. The resolved
    /// ends are forwarded to the network builder exactly once.
    fn parse_connection_stmt(&mut self) -> Result<Flow, LexError> {
        let stmt_start = self.current;

        let device_a = match self.current.kind {
            SymbolKind::Name(id) => {
                self.advance()?;
                id
            }
            _ => {
                self.report(self.codes.invalid_device_name, self.current);
                return self.recover();
            }
        };
        let port_a = if matches!(self.current.kind, SymbolKind::Dot) {
            self.advance()?;
            match self.current.kind {
                SymbolKind::Name(id) => {
                    self.advance()?;
                    Some(id)
                }
                _ => {
                    self.report(self.codes.invalid_port, self.current);
                    return self.recover();
                }
            }
        } else {
            None
        };

        match self.current.kind {
            SymbolKind::Keyword(Keyword::Connect) => self.advance()?,
            _ => {
                self.report(self.codes.no_connect, self.current);
                return self.recover();
            }
        }

        let device_b = match self.current.kind {
            SymbolKind::Name(id) => {
                self.advance()?;
                id
            }
            _ => {
                self.report(self.codes.invalid_device_name, self.current);
                return self.recover();
            }
        };
        match self.current.kind {
            SymbolKind::Dot => self.advance()?,
            _ => {
                self.report(self.codes.no_dot, self.current);
                return self.recover();
            }
        }
        let port_b = match self.current.kind {
            SymbolKind::Name(id) => {
                self.advance()?;
                id
            }
            _ => {
                self.report(self.codes.invalid_port, self.current);
                return self.recover();
            }
        };

        match self.current.kind {
            SymbolKind::Semicolon => self.advance()?,
            _ => {
                self.report(self.codes.no_semicolon, self.current);
                return self.recover();
            }
        }

        if self.error_count == 0 {
            if let Err(code) =
                self.network
                    .make_connection(self.devices, device_a, port_a, device_b, Some(port_b))
            {
                self.report(code, stmt_start);
            }
        }
        Ok(Flow::Continue)
    }

    /// `monitor_stmt := signal {"," signal} ";"` with
    /// `signal := NAME ["." NAME]`.
    ///
    /// The full list is collected first; each signal is then forwarded to
    /// the monitor builder individually. The list may also end at the
    /// section's `}` without a semicolon.
    fn parse_monitor_stmt(&mut self) -> Result<Flow, LexError> {
        let stmt_start = self.current;
        let mut signals = Vec::new();

        loop {
            let device = match self.current.kind {
                SymbolKind::Name(id) => {
                    self.advance()?;
                    id
                }
                _ => {
                    self.report(self.codes.invalid_device_name, self.current);
                    return self.recover();
                }
            };
            let port = if matches!(self.current.kind, SymbolKind::Dot) {
                self.advance()?;
                match self.current.kind {
                    SymbolKind::Name(id) => {
                        self.advance()?;
                        Some(id)
                    }
                    _ => {
                        self.report(self.codes.invalid_port, self.current);
                        return self.recover();
                    }
                }
            } else {
                None
            };
            signals.push((device, port));

            match self.current.kind {
                SymbolKind::Comma => self.advance()?,
                SymbolKind::Semicolon => {
                    self.advance()?;
                    break;
                }
                // Left for the section loop to consume.
                SymbolKind::CloseBrace | SymbolKind::Eof => break,
                _ => {
                    self.report(self.codes.no_comma, self.current);
                    return self.recover();
                }
            }
        }

        if self.error_count == 0 {
            for (device, port) in signals {
                if let Err(code) = self.monitors.make_monitor(self.devices, device, port) {
                    self.report(code, stmt_start);
                }
            }
        }
        Ok(Flow::Continue)
    }

    /// Pull the next non-filler symbol into the lookahead slot.
    fn advance(&mut self) -> Result<(), LexError> {
        self.current = Self::next_real(&mut self.scanner, self.names)?;
        Ok(())
    }

    fn next_real(scanner: &mut Scanner, names: &mut NameTable) -> Result<Symbol, LexError> {
        loop {
            let symbol = scanner.next_symbol(names)?;
            if !symbol.is_filler() {
                return Ok(symbol);
            }
        }
    }

    /// Record one diagnostic at `symbol`'s position.
    ///
    /// Every code any collaborator can return has a dictionary entry; a
    /// missing one is a configuration bug, not a parse error.
    fn report(&mut self, code: ErrorCode, symbol: Symbol) {
        let message = self
            .dictionary
            .get(&code)
            .unwrap_or_else(|| panic!("no message registered for {:?}", code));
        debug!("{}:{}: {}", symbol.line, symbol.column, message);
        self.diagnostics.push(Diagnostic {
            code,
            message: (*message).to_string(),
            line: symbol.line,
            column: symbol.column,
        });
        self.error_count += 1;
    }

    fn already_reported(&self, code: ErrorCode) -> bool {
        self.diagnostics.iter().any(|d| d.code == code)
    }

    /// Resynchronize after a recoverable error: advance to the next `;`,
    /// `}`, or end of input, consuming the delimiter so the next statement
    /// starts clean.
    fn recover(&mut self) -> Result<Flow, LexError> {
        loop {
            match self.current.kind {
                SymbolKind::Semicolon => {
                    self.advance()?;
                    return Ok(Flow::Continue);
                }
                SymbolKind::CloseBrace => {
                    self.advance()?;
                    return Ok(Flow::SectionDone);
                }
                SymbolKind::Eof => return Ok(Flow::EndOfInput),
                _ => self.advance()?,
            }
        }
    }
}
