//! The logic-network model the parser builds: devices, connections, and
//! monitors. Storage and structural validation only; the simulation engine
//! that evaluates the network lives elsewhere.

pub mod devices;
pub mod monitors;
pub mod network;

// Re-exports
pub use devices::{Device, DeviceKind, Devices};
pub use monitors::Monitors;
pub use network::{Connection, Network};
