//! Raw Circuit Adapter
//!
//! Converts the external JSON device map (produced by upstream netlist
//! parsers) into the typed [`Circuit`] arena. Device types are resolved from
//! model names. Parameters are parsed strictly: a present-but-non-numeric
//! `w`/`l`/`nf`/`m` is an invalid-parameter error for that device, never a
//! silent zero, and offending devices are skipped so one malformed entry
//! cannot abort the whole run.
//!
//! The optional `nets` section is accepted for interface compatibility but
//! never consulted: net connectivity is derived from device pins.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::core::SymError;

use super::schema::{Circuit, Device, DeviceParams, DeviceType, Pin};

/// External device-map document, as produced by upstream netlist tooling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCircuit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Device id -> raw device record. A BTreeMap so devices enter the arena
    /// in lexicographic id order; JSON object order is not reliable across
    /// producers, and detection results must be reproducible.
    pub devices: BTreeMap<String, RawDevice>,
    /// Informational only; connectivity is rebuilt from device pins.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub nets: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDevice {
    /// Model/type name, e.g. "nmos", "nch_mac", "rppoly"
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub parameters: HashMap<String, ParamValue>,
    #[serde(default)]
    pub pins: Vec<RawPin>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPin {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub net: Option<String>,
}

/// Numeric-or-numeric-string parameter value
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(f64),
    Text(String),
}

impl ParamValue {
    fn to_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Number(n) => Some(*n),
            ParamValue::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }

    fn raw(&self) -> String {
        match self {
            ParamValue::Number(n) => n.to_string(),
            ParamValue::Text(s) => s.clone(),
        }
    }
}

impl RawCircuit {
    /// Build the typed circuit. Devices with unparsable parameters are
    /// skipped and reported alongside the circuit.
    pub fn into_circuit(self) -> (Circuit, Vec<SymError>) {
        let mut circuit = Circuit::new(self.name.as_deref().unwrap_or("untitled"));
        let mut errors = Vec::new();

        'devices: for (id, raw) in self.devices {
            let kind = DeviceType::from_model_name(&raw.kind);
            let mut params = DeviceParams::new();

            for (key, value) in &raw.parameters {
                let Some(num) = value.to_f64() else {
                    let err = SymError::InvalidParameter {
                        device: id.clone(),
                        key: key.clone(),
                        value: value.raw(),
                    };
                    tracing::warn!("skipping device {}: {}", id, err);
                    errors.push(err);
                    continue 'devices;
                };
                match key.to_lowercase().as_str() {
                    "w" => params.w = Some(num),
                    "l" => params.l = Some(num),
                    "nf" => params.nf = Some(num),
                    "m" => params.m = Some(num),
                    _ => {
                        params.extra.insert(key.clone(), num);
                    }
                }
            }

            let mut device = Device::new(id, kind).with_params(params);
            for pin in raw.pins {
                let mut p = Pin::new(pin.name);
                p.net = pin.net;
                device.add_pin(p);
            }
            circuit.add_device(device);
        }

        (circuit, errors)
    }
}

/// Load a circuit from a raw-circuit JSON file.
pub fn load_circuit(path: &Path) -> Result<(Circuit, Vec<SymError>), SymError> {
    let content = std::fs::read_to_string(path)?;
    let raw: RawCircuit =
        serde_json::from_str(&content).map_err(|e| SymError::Parse(e.to_string()))?;
    let (mut circuit, errors) = raw.into_circuit();
    if circuit.metadata.name == "untitled" {
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            circuit.metadata.name = stem.to_string();
        }
    }
    circuit.metadata.source_file = Some(path.display().to_string());
    Ok((circuit, errors))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_circuit_parses_params() {
        let json = r#"{
            "devices": {
                "M1": {
                    "type": "nch",
                    "parameters": {"w": "10e-6", "l": 0.18e-6, "nf": 4, "vth": "0.4"},
                    "pins": [
                        {"name": "d", "net": "OUT"},
                        {"name": "g", "net": "IN"},
                        {"name": "s", "net": "VSS"}
                    ]
                }
            }
        }"#;
        let raw: RawCircuit = serde_json::from_str(json).unwrap();
        let (circuit, errors) = raw.into_circuit();

        assert!(errors.is_empty());
        let m1 = circuit.device_by_id("M1").unwrap();
        assert_eq!(m1.kind, DeviceType::Nmos);
        assert_eq!(m1.params.w, Some(10e-6));
        assert_eq!(m1.params.nf, Some(4.0));
        assert_eq!(m1.params.extra.get("vth"), Some(&0.4));
        assert_eq!(m1.pins.len(), 3);
    }

    #[test]
    fn test_invalid_parameter_is_isolated() {
        let json = r#"{
            "devices": {
                "M1": {"type": "nmos", "parameters": {"w": "10u"}, "pins": []},
                "M2": {"type": "nmos", "parameters": {"w": 1e-6}, "pins": []}
            }
        }"#;
        let raw: RawCircuit = serde_json::from_str(json).unwrap();
        let (circuit, errors) = raw.into_circuit();

        // M1 carries a suffixed (non-numeric) width: skipped, reported
        assert_eq!(errors.len(), 1);
        assert!(circuit.device_by_id("M1").is_none());
        assert!(circuit.device_by_id("M2").is_some());
    }

    #[test]
    fn test_device_order_is_lexicographic() {
        let json = r#"{
            "devices": {
                "M2": {"type": "nmos", "pins": []},
                "M10": {"type": "nmos", "pins": []},
                "M1": {"type": "nmos", "pins": []}
            }
        }"#;
        let raw: RawCircuit = serde_json::from_str(json).unwrap();
        let (circuit, _) = raw.into_circuit();
        let order: Vec<&str> = circuit.devices().map(|d| d.id.as_str()).collect();
        assert_eq!(order, vec!["M1", "M10", "M2"]);
    }
}
