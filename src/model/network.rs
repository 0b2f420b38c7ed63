//! Connection builder: wires device outputs to input pins.
//!
//! Stores the accepted connections and enforces the structural rules: one
//! side must be an output and the other an input, both must exist, and an
//! input pin may be driven exactly once. Either operand order is accepted,
//! so `FF.Q connect G.I1` and `G.I1 connect FF.Q` mean the same thing.

use crate::model::devices::Devices;
use crate::utils::names::{ErrorCode, NameId, NameTable};
use std::collections::HashSet;

/// One accepted connection: an output driving an input pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connection {
    pub source_device: NameId,
    /// `None` for the single unnamed output of a gate, clock, or switch.
    pub source_port: Option<NameId>,
    pub sink_device: NameId,
    pub sink_pin: NameId,
}

/// Error codes the connection builder can return.
#[derive(Debug, Clone, Copy)]
pub struct NetworkCodes {
    pub input_to_input: ErrorCode,
    pub output_to_output: ErrorCode,
    pub input_connected: ErrorCode,
    pub port_absent: ErrorCode,
    pub device_absent: ErrorCode,
}

enum End {
    Output(Option<NameId>),
    Input(NameId),
}

/// The connection builder and store.
#[derive(Debug)]
pub struct Network {
    codes: NetworkCodes,
    connections: Vec<Connection>,
    driven: HashSet<(NameId, NameId)>,
}

impl Network {
    pub fn new(names: &mut NameTable) -> Self {
        let block = names.allocate_error_codes(5);
        Self {
            codes: NetworkCodes {
                input_to_input: block.code(0),
                output_to_output: block.code(1),
                input_connected: block.code(2),
                port_absent: block.code(3),
                device_absent: block.code(4),
            },
            connections: Vec::new(),
            driven: HashSet::new(),
        }
    }

    pub fn codes(&self) -> &NetworkCodes {
        &self.codes
    }

    /// Every code this component can return, with its message.
    pub fn error_messages(&self) -> Vec<(ErrorCode, &'static str)> {
        vec![
            (self.codes.input_to_input, "Error: Both ports are inputs"),
            (self.codes.output_to_output, "Error: Both ports are outputs"),
            (self.codes.input_connected, "Error: Input is already connected"),
            (self.codes.port_absent, "Error: No such port on this device"),
            (self.codes.device_absent, "Error: No such device"),
        ]
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Record one connection between `(device_a, port_a)` and
    /// `(device_b, port_b)`, whichever side is the output.
    pub fn make_connection(
        &mut self,
        devices: &Devices,
        device_a: NameId,
        port_a: Option<NameId>,
        device_b: NameId,
        port_b: Option<NameId>,
    ) -> Result<(), ErrorCode> {
        let end_a = self.classify(devices, device_a, port_a)?;
        let end_b = self.classify(devices, device_b, port_b)?;

        let (source, sink) = match (end_a, end_b) {
            (End::Output(port), End::Input(pin)) => ((device_a, port), (device_b, pin)),
            (End::Input(pin), End::Output(port)) => ((device_b, port), (device_a, pin)),
            (End::Input(_), End::Input(_)) => return Err(self.codes.input_to_input),
            (End::Output(_), End::Output(_)) => return Err(self.codes.output_to_output),
        };

        if !self.driven.insert(sink) {
            return Err(self.codes.input_connected);
        }
        self.connections.push(Connection {
            source_device: source.0,
            source_port: source.1,
            sink_device: sink.0,
            sink_pin: sink.1,
        });
        Ok(())
    }

    fn classify(
        &self,
        devices: &Devices,
        device: NameId,
        port: Option<NameId>,
    ) -> Result<End, ErrorCode> {
        let device = devices.get_device(device).ok_or(self.codes.device_absent)?;
        if device.has_output_port(port) {
            return Ok(End::Output(port));
        }
        match port {
            Some(pin) if device.has_input_pin(pin) => Ok(End::Input(pin)),
            _ => Err(self.codes.port_absent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (NameTable, Devices, Network) {
        let mut names = NameTable::new();
        let devices = Devices::new(&mut names);
        let network = Network::new(&mut names);
        (names, devices, network)
    }

    fn id(names: &mut NameTable, s: &str) -> NameId {
        names.lookup(&[s]).unwrap()[0]
    }

    fn two_gates(names: &mut NameTable, devices: &mut Devices) -> (NameId, NameId) {
        let and = id(names, "AND");
        let g1 = id(names, "G1");
        let g2 = id(names, "G2");
        devices.make_device(g1, and, Some(2)).unwrap();
        devices.make_device(g2, and, Some(2)).unwrap();
        (g1, g2)
    }

    #[test]
    fn test_output_to_input() {
        let (mut names, mut devices, mut network) = setup();
        let (g1, g2) = two_gates(&mut names, &mut devices);
        let i1 = id(&mut names, "I1");
        network
            .make_connection(&devices, g1, None, g2, Some(i1))
            .unwrap();
        assert_eq!(network.connections().len(), 1);
        assert_eq!(network.connections()[0].source_device, g1);
        assert_eq!(network.connections()[0].sink_pin, i1);
    }

    #[test]
    fn test_operand_order_is_symmetric() {
        let (mut names, mut devices, mut network) = setup();
        let (g1, g2) = two_gates(&mut names, &mut devices);
        let i1 = id(&mut names, "I1");
        network
            .make_connection(&devices, g2, Some(i1), g1, None)
            .unwrap();
        assert_eq!(network.connections()[0].source_device, g1);
        assert_eq!(network.connections()[0].sink_device, g2);
    }

    #[test]
    fn test_input_to_input() {
        let (mut names, mut devices, mut network) = setup();
        let (g1, g2) = two_gates(&mut names, &mut devices);
        let i1 = id(&mut names, "I1");
        let err = network
            .make_connection(&devices, g1, Some(i1), g2, Some(i1))
            .unwrap_err();
        assert_eq!(err, network.codes().input_to_input);
    }

    #[test]
    fn test_output_to_output() {
        let (mut names, mut devices, mut network) = setup();
        let (g1, g2) = two_gates(&mut names, &mut devices);
        let err = network
            .make_connection(&devices, g1, None, g2, None)
            .unwrap_err();
        assert_eq!(err, network.codes().output_to_output);
    }

    #[test]
    fn test_input_driven_once() {
        let (mut names, mut devices, mut network) = setup();
        let (g1, g2) = two_gates(&mut names, &mut devices);
        let i1 = id(&mut names, "I1");
        let i2 = id(&mut names, "I2");
        network
            .make_connection(&devices, g1, None, g2, Some(i1))
            .unwrap();
        let err = network
            .make_connection(&devices, g1, None, g2, Some(i1))
            .unwrap_err();
        assert_eq!(err, network.codes().input_connected);
        network
            .make_connection(&devices, g1, None, g2, Some(i2))
            .unwrap();
    }

    #[test]
    fn test_absent_device_and_port() {
        let (mut names, mut devices, mut network) = setup();
        let (g1, g2) = two_gates(&mut names, &mut devices);
        let ghost = id(&mut names, "GHOST");
        let i9 = id(&mut names, "I9");
        let i1 = id(&mut names, "I1");
        assert_eq!(
            network
                .make_connection(&devices, ghost, None, g2, Some(i1))
                .unwrap_err(),
            network.codes().device_absent
        );
        assert_eq!(
            network
                .make_connection(&devices, g1, None, g2, Some(i9))
                .unwrap_err(),
            network.codes().port_absent
        );
    }

    #[test]
    fn test_dtype_output_drives_gate() {
        let (mut names, mut devices, mut network) = setup();
        let dtype = id(&mut names, "DTYPE");
        let and = id(&mut names, "AND");
        let ff = id(&mut names, "FF");
        let g = id(&mut names, "G");
        devices.make_device(ff, dtype, None).unwrap();
        devices.make_device(g, and, Some(2)).unwrap();
        let q = id(&mut names, "Q");
        let i1 = id(&mut names, "I1");
        network
            .make_connection(&devices, ff, Some(q), g, Some(i1))
            .unwrap();
        // The D-type has no unnamed output.
        let err = network
            .make_connection(&devices, ff, None, g, Some(i1))
            .unwrap_err();
        assert_eq!(err, network.codes().port_absent);
    }
}
