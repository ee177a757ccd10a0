//! AnalogSym - symmetry constraint detection for analog/RF IC netlists
//!
//! This library analyzes a circuit netlist (devices, pins, nets) and infers
//! which device pairs must be laid out symmetrically: differential pairs,
//! cross-coupled pairs, and their fan-out through the signal graph. The
//! resulting constraint set can be validated with the built-in ERC and
//! serialized for a downstream placement engine.
//!
//! # Quick Start
//!
//! ```
//! use analogsym::circuit::{Circuit, Device, DeviceParams, DeviceType, Pin};
//! use analogsym::SymmetryDetector;
//!
//! let mut circuit = Circuit::new("input_stage");
//! for (id, gate, drain) in [("M1", "VINP", "OUT1"), ("M2", "VINM", "OUT2")] {
//!     circuit.add_device(
//!         Device::new(id, DeviceType::Nmos)
//!             .with_params(DeviceParams::new().with_w(10e-6).with_l(0.18e-6))
//!             .with_pin(Pin::new("d").with_net(drain))
//!             .with_pin(Pin::new("g").with_net(gate))
//!             .with_pin(Pin::new("s").with_net("VSS")),
//!     );
//! }
//!
//! let constraint = SymmetryDetector::new().detect(&circuit);
//! assert_eq!(constraint.len(), 1);
//! assert!(constraint.is_claimed("M1"));
//! ```
//!
//! # Features
//!
//! - **Detection**: fingerprint bucketing, differential and cross-coupled
//!   seed matchers, breadth-first symmetry propagation
//! - **ERC**: type/parameter validation of a constraint set with tolerances
//! - **Persistence**: line-oriented `.sym` text format and a structured JSON
//!   document, both round-trippable
//! - **Circuit plumbing**: JSON device-map adapter, petgraph connectivity
//!   graph, net classification, connectivity validation

pub mod circuit;
pub mod constraint;
pub mod core;
pub mod detect;
pub mod erc;

// Re-export main types
pub use crate::core::{
    CircuitReport, DetectionOutcome, RunOptions, SymError, SymmetryCore,
};
pub use constraint::{
    GuardRing, LayoutPattern, SymmetryConstraint, SymmetryKind, SymmetryOptions, SymmetryPair,
};
pub use detect::{DetectionOptions, SymmetryDetector};
pub use erc::{ErcReport, ErcViolation, Severity, SymmetryErc};

/// Parse a constraint file (`.sym` or `.json`), convenience wrapper.
pub fn parse_constraints(path: &std::path::Path) -> Result<SymmetryConstraint, SymError> {
    SymmetryCore::load_constraints(path)
}

/// Load a raw-circuit JSON file, convenience wrapper. Returns the circuit
/// plus any per-device errors (skipped devices).
pub fn load_circuit(
    path: &std::path::Path,
) -> Result<(circuit::Circuit, Vec<SymError>), SymError> {
    circuit::load_circuit(path)
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::circuit::{Circuit, CircuitGraph, Device, DeviceParams, DeviceType, Pin};
    pub use crate::{
        DetectionOptions, DetectionOutcome, ErcReport, LayoutPattern, RunOptions, Severity,
        SymError, SymmetryConstraint, SymmetryCore, SymmetryDetector, SymmetryErc, SymmetryKind,
        SymmetryPair,
    };
}
