//! # logicdef - circuit definition language frontend
//!
//! Compiles a small textual hardware-description language into an in-memory
//! logic-network model:
//! - Scanner: character-level tokenizer with line/column tracking, comment
//!   and filler-word skipping
//! - Parser: recursive descent over the three-section grammar (Device,
//!   Connection, Monitor) with integrated error recovery, so one pass
//!   reports as many problems as possible
//! - Name table: interns every name to a dense id and allocates the
//!   non-overlapping error-code blocks the diagnostics are keyed by
//!
//! ## Example
//!
//! ```rust
//! let circuit = logicdef::parse_source(
//!     "Device { A is a XOR gate; }
//!      Connection { }
//!      Monitor { A; }",
//! )
//! .expect("source is lexically valid");
//! assert!(circuit.outcome.success);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod frontend;
pub mod model;
pub mod utils;

// Re-export commonly used types
pub mod prelude {
    //! Convenient re-exports of commonly used types.

    pub use crate::frontend::{
        parse_file, parse_source, ParseOutcome, ParsedCircuit, Parser, Scanner, Symbol, SymbolKind,
    };
    pub use crate::model::{Connection, Device, DeviceKind, Devices, Monitors, Network};
    pub use crate::utils::errors::{Diagnostic, LexError, NameError};
    pub use crate::utils::names::{ErrorCode, NameId, NameTable};
}

pub use frontend::{parse_file, parse_source, ParseOutcome, ParsedCircuit};

/// Crate version, for the CLI banner.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
