//! Circuit Data Model
//!
//! Core data structures for the netlist view the symmetry engine operates on:
//! devices with typed parameters, ordered pins, and net classification.
//!
//! Devices live in an arena indexed by [`DeviceHandle`]; nothing here holds a
//! back-reference to its owner, so the model has no cyclic ownership. The
//! engine derives net connectivity from device pins (see `circuit::graph`) and
//! never trusts a separately supplied net structure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Device type as resolved from the netlist model name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    Nmos,
    Pmos,
    Resistor,
    Capacitor,
    Inductor,
    Diode,
    Subcircuit,
}

impl DeviceType {
    /// Resolve a device type from a netlist model name.
    ///
    /// Recognises the common foundry model families (nch/pch/rppoly/cfmom...);
    /// anything unrecognised is treated as a subcircuit instance.
    pub fn from_model_name(model: &str) -> Self {
        let upper = model.to_uppercase();

        if ["NMOS", "NCH", "NCH_NA", "NCH_MAC"].iter().any(|m| upper.contains(m)) {
            return DeviceType::Nmos;
        }
        if ["PMOS", "PCH", "PCH_MAC"].iter().any(|m| upper.contains(m)) {
            return DeviceType::Pmos;
        }
        if ["RES", "RPPOLY", "RPPOLY_M"].iter().any(|m| upper.contains(m)) {
            return DeviceType::Resistor;
        }
        if ["CAP", "CFMOM", "CRTMOM"].iter().any(|m| upper.contains(m)) {
            return DeviceType::Capacitor;
        }
        if upper.contains("IND") {
            return DeviceType::Inductor;
        }
        if upper.contains("DIODE") {
            return DeviceType::Diode;
        }

        DeviceType::Subcircuit
    }

    /// True for NMOS and PMOS transistors.
    pub fn is_mos(&self) -> bool {
        matches!(self, DeviceType::Nmos | DeviceType::Pmos)
    }

    pub fn is_passive(&self) -> bool {
        matches!(
            self,
            DeviceType::Resistor | DeviceType::Capacitor | DeviceType::Inductor
        )
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DeviceType::Nmos => "nmos",
            DeviceType::Pmos => "pmos",
            DeviceType::Resistor => "resistor",
            DeviceType::Capacitor => "capacitor",
            DeviceType::Inductor => "inductor",
            DeviceType::Diode => "diode",
            DeviceType::Subcircuit => "subcircuit",
        };
        write!(f, "{}", s)
    }
}

/// Net classification derived from the net name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetType {
    Signal,
    Power,
    Ground,
    Clock,
    Analog,
    Digital,
}

impl NetType {
    /// Classify a net from its name. Classification feeds connectivity
    /// validation and reporting only, never the matchers.
    pub fn classify(net_name: &str) -> Self {
        let upper = net_name.to_uppercase();

        if ["VDD", "VCC", "POWER", "VDDA", "VDDD"].contains(&upper.as_str()) {
            return NetType::Power;
        }
        if ["GND", "VSS", "GROUND", "VSSA", "VSSD"].contains(&upper.as_str()) {
            return NetType::Ground;
        }
        if upper.contains("CLK") || upper.contains("CLOCK") {
            return NetType::Clock;
        }

        NetType::Signal
    }
}

impl fmt::Display for NetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NetType::Signal => "signal",
            NetType::Power => "power",
            NetType::Ground => "ground",
            NetType::Clock => "clock",
            NetType::Analog => "analog",
            NetType::Digital => "digital",
        };
        write!(f, "{}", s)
    }
}

/// Typed device parameters.
///
/// The four fields the engine compares (`w`, `l`, `nf`, `m`) are a fixed
/// record; uncommon keys go into the open `extra` map. Fields are `Option` so
/// a missing parameter stays distinguishable from an explicit zero: tolerance
/// comparison treats missing as 0.0, while the fingerprint renders a missing
/// `nf` as 1 (the netlist default finger count).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub w: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub l: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nf: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub m: Option<f64>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub extra: HashMap<String, f64>,
}

impl DeviceParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_w(mut self, w: f64) -> Self {
        self.w = Some(w);
        self
    }

    pub fn with_l(mut self, l: f64) -> Self {
        self.l = Some(l);
        self
    }

    pub fn with_nf(mut self, nf: f64) -> Self {
        self.nf = Some(nf);
        self
    }

    pub fn with_m(mut self, m: f64) -> Self {
        self.m = Some(m);
        self
    }

    /// Compare the `w`/`l`/`nf`/`m` record against another within an absolute
    /// tolerance. A missing field compares as 0.0.
    pub fn matches_within(&self, other: &DeviceParams, tolerance: f64) -> bool {
        let fields = [
            (self.w, other.w),
            (self.l, other.l),
            (self.nf, other.nf),
            (self.m, other.m),
        ];
        fields
            .iter()
            .all(|(a, b)| (a.unwrap_or(0.0) - b.unwrap_or(0.0)).abs() <= tolerance)
    }
}

/// A pin on a device: free-form name plus the net it connects to (if any).
///
/// Pins do not know their owning device; the arena handle in the connectivity
/// graph carries that association.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pin {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net: Option<String>,
}

impl Pin {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            net: None,
        }
    }

    pub fn with_net(mut self, net: impl Into<String>) -> Self {
        self.net = Some(net.into());
        self
    }
}

/// Stable arena index of a device within a [`Circuit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceHandle(pub(crate) usize);

impl DeviceHandle {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A netlist device: unique id, type, typed parameters, ordered pins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    pub kind: DeviceType,
    #[serde(default)]
    pub params: DeviceParams,
    #[serde(default)]
    pub pins: Vec<Pin>,
}

impl Device {
    pub fn new(id: impl Into<String>, kind: DeviceType) -> Self {
        Self {
            id: id.into(),
            kind,
            params: DeviceParams::default(),
            pins: Vec::new(),
        }
    }

    pub fn with_params(mut self, params: DeviceParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_pin(mut self, pin: Pin) -> Self {
        self.pins.push(pin);
        self
    }

    pub fn add_pin(&mut self, pin: Pin) {
        self.pins.push(pin);
    }
}

/// Metadata about where a circuit came from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircuitMetadata {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl Default for CircuitMetadata {
    fn default() -> Self {
        Self {
            name: "untitled".to_string(),
            source_file: None,
            timestamp: Utc::now(),
        }
    }
}

/// The device arena the engine reads.
///
/// Devices keep their insertion order; the detection contract is that results
/// are deterministic for a given order, so callers building a circuit by hand
/// control reproducibility through the order of `add_device` calls.
#[derive(Debug, Clone, Default)]
pub struct Circuit {
    devices: Vec<Device>,
    index: HashMap<String, DeviceHandle>,
    pub metadata: CircuitMetadata,
}

impl Circuit {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            devices: Vec::new(),
            index: HashMap::new(),
            metadata: CircuitMetadata {
                name: name.into(),
                ..CircuitMetadata::default()
            },
        }
    }

    /// Add a device to the arena. A duplicate id replaces the earlier entry's
    /// index slot but keeps both in the arena; callers are expected to supply
    /// unique ids (the JSON adapter guarantees this by construction).
    pub fn add_device(&mut self, device: Device) -> DeviceHandle {
        let handle = DeviceHandle(self.devices.len());
        self.index.insert(device.id.clone(), handle);
        self.devices.push(device);
        handle
    }

    pub fn device(&self, handle: DeviceHandle) -> &Device {
        &self.devices[handle.0]
    }

    pub fn device_by_id(&self, id: &str) -> Option<&Device> {
        self.index.get(id).map(|&h| &self.devices[h.0])
    }

    pub fn handle_of(&self, id: &str) -> Option<DeviceHandle> {
        self.index.get(id).copied()
    }

    /// Devices in insertion order.
    pub fn devices(&self) -> impl Iterator<Item = &Device> {
        self.devices.iter()
    }

    /// Arena handles in insertion order.
    pub fn handles(&self) -> impl Iterator<Item = DeviceHandle> {
        (0..self.devices.len()).map(DeviceHandle)
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn devices_of_type(&self, kind: DeviceType) -> impl Iterator<Item = &Device> {
        self.devices.iter().filter(move |d| d.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_type_from_model_name() {
        assert_eq!(DeviceType::from_model_name("nch_mac"), DeviceType::Nmos);
        assert_eq!(DeviceType::from_model_name("PCH"), DeviceType::Pmos);
        assert_eq!(DeviceType::from_model_name("rppoly_m"), DeviceType::Resistor);
        assert_eq!(DeviceType::from_model_name("cfmom_2t"), DeviceType::Capacitor);
        assert_eq!(DeviceType::from_model_name("mystery"), DeviceType::Subcircuit);
    }

    #[test]
    fn test_net_classification() {
        assert_eq!(NetType::classify("VDD"), NetType::Power);
        assert_eq!(NetType::classify("vssa"), NetType::Ground);
        assert_eq!(NetType::classify("clk_div2"), NetType::Clock);
        assert_eq!(NetType::classify("OUT1"), NetType::Signal);
    }

    #[test]
    fn test_params_tolerance() {
        let a = DeviceParams::new().with_w(10e-6).with_l(0.18e-6);
        let b = DeviceParams::new().with_w(10e-6 + 5e-10).with_l(0.18e-6);
        assert!(a.matches_within(&b, 1e-9));

        let c = DeviceParams::new().with_w(10e-6 + 2e-9).with_l(0.18e-6);
        assert!(!a.matches_within(&c, 1e-9));
    }

    #[test]
    fn test_missing_param_compares_as_zero() {
        let a = DeviceParams::new().with_w(1.0);
        let b = DeviceParams::new().with_w(1.0).with_m(1.0);
        // m: missing (0.0) vs 1.0 exceeds any reasonable tolerance
        assert!(!a.matches_within(&b, 1e-9));
    }

    #[test]
    fn test_circuit_arena() {
        let mut circuit = Circuit::new("test");
        let h1 = circuit.add_device(Device::new("M1", DeviceType::Nmos));
        let h2 = circuit.add_device(Device::new("M2", DeviceType::Pmos));

        assert_eq!(circuit.device(h1).id, "M1");
        assert_eq!(circuit.handle_of("M2"), Some(h2));
        assert!(circuit.device_by_id("M3").is_none());

        let order: Vec<&str> = circuit.devices().map(|d| d.id.as_str()).collect();
        assert_eq!(order, vec!["M1", "M2"]);
    }
}
