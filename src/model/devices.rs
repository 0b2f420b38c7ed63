//! Device storage and declaration validation.
//!
//! Holds every declared device together with its pin layout, and validates
//! declarations as the parser forwards them: unknown kinds, duplicate
//! names, and qualifier problems each map to an allocated error code that
//! the parser's dictionary knows a message for.

use crate::utils::names::{ErrorCode, NameId, NameTable};
use std::collections::{HashMap, HashSet};

/// Largest permitted gate fan-in; pins I1..I16 are pre-interned.
pub const MAX_GATE_INPUTS: u32 = 16;

/// The built-in device kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    And,
    Nand,
    Or,
    Nor,
    Xor,
    Clock,
    Switch,
    DType,
}

impl DeviceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceKind::And => "AND",
            DeviceKind::Nand => "NAND",
            DeviceKind::Or => "OR",
            DeviceKind::Nor => "NOR",
            DeviceKind::Xor => "XOR",
            DeviceKind::Clock => "CLOCK",
            DeviceKind::Switch => "SWITCH",
            DeviceKind::DType => "DTYPE",
        }
    }

    /// Gates take a variable input count.
    pub fn is_gate(&self) -> bool {
        matches!(
            self,
            DeviceKind::And | DeviceKind::Nand | DeviceKind::Or | DeviceKind::Nor | DeviceKind::Xor
        )
    }

    /// Whether this kind has the named D-type output pair instead of the
    /// single unnamed output.
    pub fn has_named_outputs(&self) -> bool {
        matches!(self, DeviceKind::DType)
    }
}

const ALL_KINDS: [DeviceKind; 8] = [
    DeviceKind::And,
    DeviceKind::Nand,
    DeviceKind::Or,
    DeviceKind::Nor,
    DeviceKind::Xor,
    DeviceKind::Clock,
    DeviceKind::Switch,
    DeviceKind::DType,
];

/// One declared device.
#[derive(Debug, Clone)]
pub struct Device {
    pub name: NameId,
    pub kind: DeviceKind,
    /// The numeric property of the declaration: gate input count, clock
    /// half-period, or switch initial level. Absent for kinds without one.
    pub qualifier: Option<u32>,
    /// Valid input pin names for this device.
    pub input_pins: HashSet<NameId>,
    /// Valid output ports. Gates, clocks, and switches have the single
    /// unnamed output (`None`); a D-type has the named pair instead.
    pub output_ports: HashSet<Option<NameId>>,
}

impl Device {
    pub fn has_input_pin(&self, pin: NameId) -> bool {
        self.input_pins.contains(&pin)
    }

    pub fn has_output_port(&self, port: Option<NameId>) -> bool {
        self.output_ports.contains(&port)
    }
}

/// Error codes the device builder can return.
#[derive(Debug, Clone, Copy)]
pub struct DeviceCodes {
    pub invalid_qualifier: ErrorCode,
    pub no_qualifier: ErrorCode,
    pub qualifier_present: ErrorCode,
    pub bad_device: ErrorCode,
    pub device_present: ErrorCode,
}

/// The device builder and store.
#[derive(Debug)]
pub struct Devices {
    codes: DeviceCodes,
    kind_ids: HashMap<NameId, DeviceKind>,
    gate_kinds: HashSet<NameId>,
    device_kinds: HashSet<NameId>,
    /// Pre-interned gate input pins I1..I16, in order.
    gate_pins: Vec<NameId>,
    dtype_input_ids: HashSet<NameId>,
    dtype_output_ids: HashSet<NameId>,
    devices: HashMap<NameId, Device>,
}

impl Devices {
    /// Intern the kind and pin names and allocate this component's error
    /// codes.
    pub fn new(names: &mut NameTable) -> Self {
        let block = names.allocate_error_codes(5);
        let codes = DeviceCodes {
            invalid_qualifier: block.code(0),
            no_qualifier: block.code(1),
            qualifier_present: block.code(2),
            bad_device: block.code(3),
            device_present: block.code(4),
        };

        let mut kind_ids = HashMap::new();
        let mut gate_kinds = HashSet::new();
        let mut device_kinds = HashSet::new();
        for kind in ALL_KINDS {
            let id = Self::intern(names, kind.as_str());
            kind_ids.insert(id, kind);
            if kind.is_gate() {
                gate_kinds.insert(id);
            } else {
                device_kinds.insert(id);
            }
        }

        let gate_pins = (1..=MAX_GATE_INPUTS)
            .map(|i| Self::intern(names, &format!("I{}", i)))
            .collect();
        let dtype_input_ids = ["DATA", "CLK", "SET", "CLEAR"]
            .iter()
            .map(|p| Self::intern(names, p))
            .collect();
        let dtype_output_ids = ["Q", "QBAR"]
            .iter()
            .map(|p| Self::intern(names, p))
            .collect();

        Self {
            codes,
            kind_ids,
            gate_kinds,
            device_kinds,
            gate_pins,
            dtype_input_ids,
            dtype_output_ids,
            devices: HashMap::new(),
        }
    }

    fn intern(names: &mut NameTable, s: &str) -> NameId {
        names
            .lookup(&[s])
            .unwrap_or_else(|e| panic!("built-in name failed to intern: {}", e))[0]
    }

    pub fn codes(&self) -> &DeviceCodes {
        &self.codes
    }

    /// Every code this component can return, with its message. The parser
    /// folds these into its error dictionary.
    pub fn error_messages(&self) -> Vec<(ErrorCode, &'static str)> {
        vec![
            (self.codes.invalid_qualifier, "Error: Invalid qualifier"),
            (self.codes.no_qualifier, "Error: Expected a qualifier"),
            (self.codes.qualifier_present, "Error: Qualifier not allowed for this device"),
            (self.codes.bad_device, "Error: No such device kind"),
            (self.codes.device_present, "Error: Device already declared"),
        ]
    }

    /// Name ids of the gate kinds (AND, NAND, OR, NOR, XOR).
    pub fn gate_kinds(&self) -> &HashSet<NameId> {
        &self.gate_kinds
    }

    /// Name ids of the non-gate kinds (CLOCK, SWITCH, DTYPE).
    pub fn device_kinds(&self) -> &HashSet<NameId> {
        &self.device_kinds
    }

    /// Whether `id` names any device kind.
    pub fn is_kind(&self, id: NameId) -> bool {
        self.kind_ids.contains_key(&id)
    }

    /// Whether declarations of this kind must carry the numeric qualifier
    /// (gate input count, clock half-period, switch initial level).
    pub fn requires_qualifier(&self, kind_id: NameId) -> bool {
        match self.kind_ids.get(&kind_id) {
            Some(DeviceKind::Xor) | Some(DeviceKind::DType) | None => false,
            Some(_) => true,
        }
    }

    /// Name ids of the D-type output ports (Q, QBAR).
    pub fn output_port_ids(&self) -> &HashSet<NameId> {
        &self.dtype_output_ids
    }

    /// Name ids of the D-type input pins (DATA, CLK, SET, CLEAR).
    pub fn input_port_ids(&self) -> &HashSet<NameId> {
        &self.dtype_input_ids
    }

    pub fn get_device(&self, name: NameId) -> Option<&Device> {
        self.devices.get(&name)
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    /// Declare one device. Validates the kind and the qualifier against the
    /// kind's rules, then records the device with its pin layout.
    pub fn make_device(
        &mut self,
        name: NameId,
        kind_id: NameId,
        qualifier: Option<u32>,
    ) -> Result<(), ErrorCode> {
        let kind = *self.kind_ids.get(&kind_id).ok_or(self.codes.bad_device)?;
        if self.devices.contains_key(&name) {
            return Err(self.codes.device_present);
        }
        self.check_qualifier(kind, qualifier)?;

        let input_pins = match kind {
            DeviceKind::And | DeviceKind::Nand | DeviceKind::Or | DeviceKind::Nor => {
                let n = qualifier.unwrap_or(0) as usize;
                self.gate_pins[..n].iter().copied().collect()
            }
            // XOR always has exactly two inputs.
            DeviceKind::Xor => self.gate_pins[..2].iter().copied().collect(),
            DeviceKind::DType => self.dtype_input_ids.clone(),
            DeviceKind::Clock | DeviceKind::Switch => HashSet::new(),
        };
        let output_ports = if kind.has_named_outputs() {
            self.dtype_output_ids.iter().map(|&id| Some(id)).collect()
        } else {
            let mut set = HashSet::new();
            set.insert(None);
            set
        };

        self.devices.insert(
            name,
            Device {
                name,
                kind,
                qualifier,
                input_pins,
                output_ports,
            },
        );
        Ok(())
    }

    fn check_qualifier(&self, kind: DeviceKind, qualifier: Option<u32>) -> Result<(), ErrorCode> {
        match kind {
            DeviceKind::And | DeviceKind::Nand | DeviceKind::Or | DeviceKind::Nor => {
                match qualifier {
                    Some(n) if (1..=MAX_GATE_INPUTS).contains(&n) => Ok(()),
                    Some(_) => Err(self.codes.invalid_qualifier),
                    None => Err(self.codes.no_qualifier),
                }
            }
            DeviceKind::Xor | DeviceKind::DType => match qualifier {
                None => Ok(()),
                Some(_) => Err(self.codes.qualifier_present),
            },
            DeviceKind::Clock => match qualifier {
                Some(n) if n >= 1 => Ok(()),
                Some(_) => Err(self.codes.invalid_qualifier),
                None => Err(self.codes.no_qualifier),
            },
            DeviceKind::Switch => match qualifier {
                Some(0) | Some(1) => Ok(()),
                Some(_) => Err(self.codes.invalid_qualifier),
                None => Err(self.codes.no_qualifier),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (NameTable, Devices) {
        let mut names = NameTable::new();
        let devices = Devices::new(&mut names);
        (names, devices)
    }

    fn id(names: &mut NameTable, s: &str) -> NameId {
        names.lookup(&[s]).unwrap()[0]
    }

    #[test]
    fn test_kind_sets() {
        let (mut names, devices) = setup();
        let and = id(&mut names, "AND");
        let dtype = id(&mut names, "DTYPE");
        assert!(devices.gate_kinds().contains(&and));
        assert!(devices.device_kinds().contains(&dtype));
        assert!(devices.is_kind(and));
        let other = id(&mut names, "FOO");
        assert!(!devices.is_kind(other));
    }

    #[test]
    fn test_requires_qualifier() {
        let (mut names, devices) = setup();
        assert!(devices.requires_qualifier(id(&mut names, "AND")));
        assert!(devices.requires_qualifier(id(&mut names, "CLOCK")));
        assert!(devices.requires_qualifier(id(&mut names, "SWITCH")));
        assert!(!devices.requires_qualifier(id(&mut names, "XOR")));
        assert!(!devices.requires_qualifier(id(&mut names, "DTYPE")));
        assert!(!devices.requires_qualifier(id(&mut names, "FOO")));
    }

    #[test]
    fn test_make_gate() {
        let (mut names, mut devices) = setup();
        let g = id(&mut names, "G1");
        let and = id(&mut names, "AND");
        devices.make_device(g, and, Some(2)).unwrap();
        let device = devices.get_device(g).unwrap();
        assert_eq!(device.kind, DeviceKind::And);
        assert_eq!(device.qualifier, Some(2));
        assert_eq!(device.input_pins.len(), 2);
        assert!(device.has_output_port(None));
        let i1 = id(&mut names, "I1");
        let i3 = id(&mut names, "I3");
        assert!(device.has_input_pin(i1));
        assert!(!device.has_input_pin(i3));
    }

    #[test]
    fn test_gate_qualifier_range() {
        let (mut names, mut devices) = setup();
        let nand = id(&mut names, "NAND");
        let a = id(&mut names, "A");
        let b = id(&mut names, "B");
        let c = id(&mut names, "C");
        assert_eq!(
            devices.make_device(a, nand, Some(17)),
            Err(devices.codes().invalid_qualifier)
        );
        assert_eq!(
            devices.make_device(b, nand, Some(0)),
            Err(devices.codes().invalid_qualifier)
        );
        assert_eq!(devices.make_device(c, nand, None), Err(devices.codes().no_qualifier));
        assert_eq!(devices.device_count(), 0);
    }

    #[test]
    fn test_xor_takes_no_qualifier() {
        let (mut names, mut devices) = setup();
        let xor = id(&mut names, "XOR");
        let a = id(&mut names, "A");
        let b = id(&mut names, "B");
        assert_eq!(
            devices.make_device(a, xor, Some(2)),
            Err(devices.codes().qualifier_present)
        );
        devices.make_device(b, xor, None).unwrap();
        assert_eq!(devices.get_device(b).unwrap().input_pins.len(), 2);
    }

    #[test]
    fn test_dtype_ports() {
        let (mut names, mut devices) = setup();
        let dtype = id(&mut names, "DTYPE");
        let ff = id(&mut names, "FF");
        devices.make_device(ff, dtype, None).unwrap();
        let device = devices.get_device(ff).unwrap();
        let q = id(&mut names, "Q");
        let data = id(&mut names, "DATA");
        assert!(device.has_output_port(Some(q)));
        assert!(!device.has_output_port(None));
        assert!(device.has_input_pin(data));
    }

    #[test]
    fn test_clock_and_switch_qualifiers() {
        let (mut names, mut devices) = setup();
        let clock = id(&mut names, "CLOCK");
        let switch = id(&mut names, "SWITCH");
        let c1 = id(&mut names, "C1");
        let c2 = id(&mut names, "C2");
        let s1 = id(&mut names, "S1");
        let s2 = id(&mut names, "S2");
        assert_eq!(
            devices.make_device(c1, clock, Some(0)),
            Err(devices.codes().invalid_qualifier)
        );
        devices.make_device(c2, clock, Some(5)).unwrap();
        assert_eq!(
            devices.make_device(s1, switch, Some(2)),
            Err(devices.codes().invalid_qualifier)
        );
        devices.make_device(s2, switch, Some(1)).unwrap();
    }

    #[test]
    fn test_duplicate_device() {
        let (mut names, mut devices) = setup();
        let or = id(&mut names, "OR");
        let g = id(&mut names, "G1");
        devices.make_device(g, or, Some(2)).unwrap();
        assert_eq!(
            devices.make_device(g, or, Some(3)),
            Err(devices.codes().device_present)
        );
    }

    #[test]
    fn test_unknown_kind() {
        let (mut names, mut devices) = setup();
        let g = id(&mut names, "G1");
        let bogus = id(&mut names, "FROB");
        assert_eq!(
            devices.make_device(g, bogus, None),
            Err(devices.codes().bad_device)
        );
    }
}
