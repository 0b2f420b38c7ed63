//! Monitor builder: records which output signals the simulator should
//! trace. Only outputs are monitorable, and each signal at most once.

use crate::model::devices::Devices;
use crate::utils::names::{ErrorCode, NameId, NameTable};
use std::collections::HashSet;

/// Error codes the monitor builder can return.
#[derive(Debug, Clone, Copy)]
pub struct MonitorCodes {
    pub not_output: ErrorCode,
    pub monitor_present: ErrorCode,
}

/// The monitor builder and store.
#[derive(Debug)]
pub struct Monitors {
    codes: MonitorCodes,
    monitors: Vec<(NameId, Option<NameId>)>,
    seen: HashSet<(NameId, Option<NameId>)>,
}

impl Monitors {
    pub fn new(names: &mut NameTable) -> Self {
        let block = names.allocate_error_codes(2);
        Self {
            codes: MonitorCodes {
                not_output: block.code(0),
                monitor_present: block.code(1),
            },
            monitors: Vec::new(),
            seen: HashSet::new(),
        }
    }

    pub fn codes(&self) -> &MonitorCodes {
        &self.codes
    }

    /// Every code this component can return, with its message.
    pub fn error_messages(&self) -> Vec<(ErrorCode, &'static str)> {
        vec![
            (self.codes.not_output, "Error: Monitored signal is not an output"),
            (self.codes.monitor_present, "Error: Signal is already monitored"),
        ]
    }

    /// Monitored signals in declaration order.
    pub fn monitors(&self) -> &[(NameId, Option<NameId>)] {
        &self.monitors
    }

    /// Record a monitor on `device`'s output `port` (`None` for the single
    /// unnamed output). A missing device or a non-output port is rejected
    /// as not-an-output.
    pub fn make_monitor(
        &mut self,
        devices: &Devices,
        device: NameId,
        port: Option<NameId>,
    ) -> Result<(), ErrorCode> {
        let found = devices
            .get_device(device)
            .ok_or(self.codes.not_output)?;
        if !found.has_output_port(port) {
            return Err(self.codes.not_output);
        }
        if !self.seen.insert((device, port)) {
            return Err(self.codes.monitor_present);
        }
        self.monitors.push((device, port));
        Ok(())
    }
}
