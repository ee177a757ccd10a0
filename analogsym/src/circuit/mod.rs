//! Circuit model: typed device/pin/net schema, the derived connectivity
//! graph, and the adapter from the external JSON device map.

pub mod adapter;
pub mod graph;
pub mod schema;

pub use adapter::{load_circuit, ParamValue, RawCircuit, RawDevice, RawPin};
pub use graph::{CircuitGraph, CircuitStats, ConnectivityIssue};
pub use schema::{
    Circuit, CircuitMetadata, Device, DeviceHandle, DeviceParams, DeviceType, NetType, Pin,
};
