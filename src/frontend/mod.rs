//! Frontend: scanner and parser for the circuit definition language.
//!
//! ## Language overview
//!
//! A definition file has three mandatory sections, in order:
//!
//! ```text
//! Device {
//!     G1, G2 are NAND gates with 2 inputs;
//!     SW1 is a SWITCH initially 0;
//!     FF is a DTYPE;
//! }
//! Connection {
//!     SW1 connect G1.I1;
//!     G1 connect FF.DATA;
//! }
//! Monitor {
//!     G1, FF.Q;
//! }
//! ```
//!
//! `# ...` is a line comment, `// ... //` a bulk comment. Connective words
//! like "gates", "with", "initially" are filler and carry no meaning.

pub mod parser;
pub mod scanner;
pub mod token;

// Re-exports
pub use parser::Parser;
pub use scanner::Scanner;
pub use token::{Keyword, Symbol, SymbolKind};

use crate::model::{Devices, Monitors, Network};
use crate::utils::errors::{Diagnostic, LexError};
use crate::utils::names::NameTable;
use serde::Serialize;
use std::path::Path;

/// Summary of one parse pass.
#[derive(Debug, Clone, Serialize)]
pub struct ParseOutcome {
    /// True when no errors were recorded and all three sections appeared.
    pub success: bool,
    /// Total number of recorded errors.
    pub error_count: usize,
    /// Whether the device section was encountered.
    pub device_section: bool,
    /// Whether the connection section was encountered.
    pub connection_section: bool,
    /// Whether the monitor section was encountered.
    pub monitor_section: bool,
    /// Every recorded diagnostic, in source order.
    pub diagnostics: Vec<Diagnostic>,
}

/// A definition file compiled into its logic-network model.
///
/// The model components are only populated when `outcome.success` is true;
/// once any error is recorded the builders are no longer driven.
#[derive(Debug)]
pub struct ParsedCircuit {
    /// The shared name table, for resolving ids in the model.
    pub names: NameTable,
    /// Declared devices.
    pub devices: Devices,
    /// Accepted connections.
    pub network: Network,
    /// Monitored signals.
    pub monitors: Monitors,
    /// What the parse pass found.
    pub outcome: ParseOutcome,
}

/// Parse an in-memory definition source.
///
/// `Err` only for fatal lexical failures; grammar and semantic problems are
/// reported through `outcome.diagnostics` instead.
pub fn parse_source(source: &str) -> Result<ParsedCircuit, LexError> {
    let mut names = NameTable::new();
    let scanner = Scanner::from_source(source, &mut names);
    run(scanner, names)
}

/// Parse a definition file from disk.
pub fn parse_file(path: &Path) -> Result<ParsedCircuit, LexError> {
    let mut names = NameTable::new();
    let scanner = Scanner::from_path(path, &mut names)?;
    run(scanner, names)
}

fn run(scanner: Scanner, mut names: NameTable) -> Result<ParsedCircuit, LexError> {
    let mut devices = Devices::new(&mut names);
    let mut network = Network::new(&mut names);
    let mut monitors = Monitors::new(&mut names);

    let outcome = {
        let mut parser = Parser::new(
            scanner,
            &mut names,
            &mut devices,
            &mut network,
            &mut monitors,
        )?;
        let success = parser.parse()?;
        ParseOutcome {
            success,
            error_count: parser.error_count(),
            device_section: parser.device_section(),
            connection_section: parser.connection_section(),
            monitor_section: parser.monitor_section(),
            diagnostics: parser.diagnostics().to_vec(),
        }
    };

    Ok(ParsedCircuit {
        names,
        devices,
        network,
        monitors,
        outcome,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_source_valid() {
        let circuit = parse_source(
            "Device { A is XOR; } Connection { } Monitor { A; }",
        )
        .unwrap();
        assert!(circuit.outcome.success);
        assert_eq!(circuit.outcome.error_count, 0);
        assert_eq!(circuit.devices.device_count(), 1);
    }

    #[test]
    fn test_parse_source_with_errors() {
        let circuit = parse_source("Device { A is; }").unwrap();
        assert!(!circuit.outcome.success);
        assert!(circuit.outcome.error_count > 0);
        assert!(!circuit.outcome.diagnostics.is_empty());
    }

    #[test]
    fn test_parse_source_lexical_failure() {
        assert!(parse_source("Device { $ }").is_err());
    }
}
