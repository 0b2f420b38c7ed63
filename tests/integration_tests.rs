//! End-to-end tests: full definition sources through scanner, parser, and
//! the network builders.

use logicdef::prelude::*;
use logicdef::{parse_file, parse_source};
use std::io::Write;

#[test]
fn test_full_circuit_pipeline() {
    let source = r#"
        # A clocked NAND latch with monitored outputs.
        Device {
            G1, G2 are NAND gates with 2 inputs;
            SW1, SW2 are SWITCH initially 1;
            CLK1 is a CLOCK with 10 cycles;
            FF is a DTYPE;
        }
        Connection {
            SW1 connect G1.I1;
            G2 connect G1.I2;
            SW2 connect G2.I2;
            G1 connect G2.I1;
            CLK1 connect FF.CLK;
            G1 connect FF.DATA;
            SW1 connect FF.SET;
            SW2 connect FF.CLEAR;
        }
        Monitor {
            G1, G2, FF.Q;
        }
    "#;

    let circuit = parse_source(source).expect("source is lexically valid");
    assert!(circuit.outcome.success);
    assert_eq!(circuit.outcome.error_count, 0);
    assert_eq!(circuit.devices.device_count(), 6);
    assert_eq!(circuit.network.connections().len(), 8);
    assert_eq!(circuit.monitors.monitors().len(), 3);

    let g1 = circuit.names.query("G1").unwrap().expect("G1 interned");
    let device = circuit.devices.get_device(g1).expect("G1 declared");
    assert_eq!(device.kind, DeviceKind::Nand);
    assert_eq!(device.qualifier, Some(2));
}

#[test]
fn test_spec_scenario_single_device() {
    // One device, no connections, one monitor on its unnamed output.
    let circuit = parse_source("Device{ A is AND 2 inputs; } Connection{ } Monitor{ A } ").unwrap();
    assert!(circuit.outcome.success);

    let a = circuit.names.query("A").unwrap().unwrap();
    let device = circuit.devices.get_device(a).unwrap();
    assert_eq!(device.kind, DeviceKind::And);
    assert_eq!(device.qualifier, Some(2));
    assert_eq!(circuit.network.connections().len(), 0);
    assert_eq!(circuit.monitors.monitors(), &[(a, None)]);
}

#[test]
fn test_missing_section_flags() {
    let circuit = parse_source("Device{ A is XOR; } Monitor{ A; }").unwrap();
    assert!(!circuit.outcome.success);
    assert!(circuit.outcome.device_section);
    assert!(!circuit.outcome.connection_section);
    assert!(circuit.outcome.monitor_section);
}

#[test]
fn test_recovery_reaches_later_sections() {
    // The broken device statement must not abort the pass: the connection
    // and monitor sections are still checked.
    let source = r#"
        Device {
            A, B with 2 inputs;
            C is XOR;
        }
        Connection { }
        Monitor { C; }
    "#;
    let circuit = parse_source(source).unwrap();
    assert!(!circuit.outcome.success);
    assert_eq!(circuit.outcome.error_count, 1);
    assert!(circuit.outcome.connection_section);
    assert!(circuit.outcome.monitor_section);
}

#[test]
fn test_trailing_comma_reports_and_resynchronizes() {
    let circuit = parse_source("Device{ A, ; } Connection{} Monitor{}").unwrap();
    assert!(!circuit.outcome.success);
    assert_eq!(circuit.outcome.diagnostics.len(), 1);
    assert!(circuit.outcome.diagnostics[0]
        .message
        .contains("Invalid device name"));
}

#[test]
fn test_every_error_reported_in_one_pass() {
    let source = r#"
        Device {
            A is AND;
            B XOR;
            C is FROB;
        }
        Connection { A connect B; }
        Monitor { }
    "#;
    let circuit = parse_source(source).unwrap();
    assert!(!circuit.outcome.success);
    // Missing number, missing verb, bad kind, missing right-hand dot.
    assert_eq!(circuit.outcome.error_count, 4);
}

#[test]
fn test_filler_words_are_not_interned() {
    let plain = parse_source("Device{ G1 is AND 2; } Connection{} Monitor{ G1; }").unwrap();
    let padded = parse_source(
        "Device{ G1 is a AND gate with 2 inputs; } Connection{} Monitor{ G1; }",
    )
    .unwrap();
    assert!(plain.outcome.success);
    assert!(padded.outcome.success);
    // Filler words never reach the name table, so both sources intern the
    // same number of names.
    assert_eq!(plain.names.len(), padded.names.len());
    assert_eq!(padded.names.query("gate").unwrap(), None);
    assert_eq!(padded.names.query("inputs").unwrap(), None);
}

#[test]
fn test_comments_are_invisible() {
    let source = r#"
        # line comment before everything
        Device{ A is XOR; // bulk comment
        spanning lines // }
        Connection{}
        Monitor{ A; }
    "#;
    let circuit = parse_source(source).unwrap();
    assert!(circuit.outcome.success, "{:?}", circuit.outcome.diagnostics);
}

#[test]
fn test_unterminated_comment_is_fatal() {
    let err = parse_source("Device{ // never closed").unwrap_err();
    assert!(matches!(err, LexError::UnterminatedComment { .. }));
}

#[test]
fn test_diagnostics_carry_positions() {
    let circuit = parse_source("Device{\n  A B is XOR;\n} Connection{} Monitor{}").unwrap();
    assert!(!circuit.outcome.success);
    let first = &circuit.outcome.diagnostics[0];
    // The offending symbol is the second name on line 1 (0-based).
    assert_eq!(first.line, 1);
    assert_eq!(first.column, 4);
}

#[test]
fn test_erroneous_file_builds_nothing() {
    let source = r#"
        Device { A is FROB; B is XOR; C is XOR; }
        Connection { B connect C.I1; }
        Monitor { B; }
    "#;
    let circuit = parse_source(source).unwrap();
    assert!(!circuit.outcome.success);
    assert_eq!(circuit.devices.device_count(), 0);
    assert_eq!(circuit.network.connections().len(), 0);
    assert_eq!(circuit.monitors.monitors().len(), 0);
}

#[test]
fn test_parse_file_round_trip() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "Device {{ A is a XOR gate; }}\nConnection {{ }}\nMonitor {{ A; }}\n"
    )
    .unwrap();
    let circuit = parse_file(file.path()).unwrap();
    assert!(circuit.outcome.success);
    assert_eq!(circuit.devices.device_count(), 1);
}

#[test]
fn test_parse_file_missing() {
    let err = parse_file(std::path::Path::new("no/such/circuit.def")).unwrap_err();
    assert!(matches!(err, LexError::Unreadable(_)));
}
