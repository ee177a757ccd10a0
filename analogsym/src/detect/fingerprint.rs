//! Fingerprint Grouping and Pin-Role Canonicalization
//!
//! Symmetry candidates are pruned by fingerprint before any topology is
//! examined: only devices with identical type and nominal w/l/nf can pair.
//! The fingerprint compares values exactly as provided. This is deliberate,
//! and distinct from the tolerance-based equality the ERC and the propagation
//! engine apply: cheap bucketing wants exactness, electrical validation
//! wants tolerance. Do not unify the two.
//!
//! Pin names in real netlists are anything from `"g"` to `"Gate"` to `"D"`;
//! the canonicalizer folds them onto the three roles the matchers reason
//! about. Bulk/body pins (`b`) fold onto the gate role, matching the
//! behavior symmetric netlists have historically been written against.

use std::collections::HashMap;

use crate::circuit::{Circuit, Device, DeviceHandle};

/// Canonical pin role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinRole {
    Gate,
    Drain,
    Source,
}

impl PinRole {
    fn name_patterns(&self) -> &'static [&'static str] {
        match self {
            // bulk ("b") intentionally folds onto the gate role
            PinRole::Gate => &["g", "gate", "b"],
            PinRole::Drain => &["d", "drain"],
            PinRole::Source => &["s", "source"],
        }
    }
}

/// Case-insensitive substring test of a pin name against a role's patterns.
pub fn pin_matches_role(pin_name: &str, role: PinRole) -> bool {
    let lower = pin_name.to_lowercase();
    role.name_patterns().iter().any(|p| lower.contains(p))
}

/// Net connected to the first pin on `device` matching `role`, if any.
/// A device without a recognizable pin for the role simply has no net there.
pub fn pin_net(device: &Device, role: PinRole) -> Option<&str> {
    device
        .pins
        .iter()
        .find(|pin| pin_matches_role(&pin.name, role))
        .and_then(|pin| pin.net.as_deref())
}

/// Whether two raw pin names play the same role, judged by first letter,
/// case-insensitively ("D" vs "drain" -> true).
pub fn same_pin_role(a: &str, b: &str) -> bool {
    match (a.chars().next(), b.chars().next()) {
        (Some(ca), Some(cb)) => ca.to_ascii_lowercase() == cb.to_ascii_lowercase(),
        _ => false,
    }
}

/// Grouping key: device type plus nominal w/l/nf, exactly as provided.
pub fn fingerprint(device: &Device) -> String {
    let fmt = |v: Option<f64>| v.map(|x| x.to_string()).unwrap_or_else(|| "none".to_string());
    // a missing finger count means a single finger
    let nf = device
        .params
        .nf
        .map(|x| x.to_string())
        .unwrap_or_else(|| "1".to_string());
    format!(
        "{}_{}_{}_{}",
        device.kind,
        fmt(device.params.w),
        fmt(device.params.l),
        nf
    )
}

/// Group devices into fingerprint buckets, preserving first-seen bucket
/// order and device insertion order within each bucket. With `sorted` the
/// bucket contents are ordered by device id instead, making detection
/// independent of the caller's insertion order.
pub fn group_by_fingerprint(circuit: &Circuit, sorted: bool) -> Vec<(String, Vec<DeviceHandle>)> {
    let mut order: Vec<String> = Vec::new();
    let mut buckets: HashMap<String, Vec<DeviceHandle>> = HashMap::new();

    for handle in circuit.handles() {
        let key = fingerprint(circuit.device(handle));
        let bucket = buckets.entry(key.clone()).or_insert_with(|| {
            order.push(key.clone());
            Vec::new()
        });
        bucket.push(handle);
    }

    let mut result: Vec<(String, Vec<DeviceHandle>)> = order
        .into_iter()
        .map(|key| {
            let handles = buckets.remove(&key).unwrap_or_default();
            (key, handles)
        })
        .collect();

    if sorted {
        for (_, handles) in &mut result {
            handles.sort_by(|a, b| circuit.device(*a).id.cmp(&circuit.device(*b).id));
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{DeviceParams, DeviceType, Pin};

    #[test]
    fn test_pin_role_matching() {
        assert!(pin_matches_role("g", PinRole::Gate));
        assert!(pin_matches_role("Gate", PinRole::Gate));
        assert!(pin_matches_role("b", PinRole::Gate)); // bulk folds onto gate
        assert!(pin_matches_role("D", PinRole::Drain));
        assert!(pin_matches_role("source", PinRole::Source));
        assert!(!pin_matches_role("x1", PinRole::Drain));
    }

    #[test]
    fn test_pin_net_takes_first_match() {
        let device = Device::new("M1", DeviceType::Nmos)
            .with_pin(Pin::new("d").with_net("OUT"))
            .with_pin(Pin::new("g").with_net("IN"))
            .with_pin(Pin::new("b").with_net("VSS"));
        assert_eq!(pin_net(&device, PinRole::Drain), Some("OUT"));
        // "g" appears before "b" so the gate role resolves to IN
        assert_eq!(pin_net(&device, PinRole::Gate), Some("IN"));
        assert_eq!(pin_net(&device, PinRole::Source), None);
    }

    #[test]
    fn test_same_pin_role_first_letter() {
        assert!(same_pin_role("D", "drain"));
        assert!(same_pin_role("s", "Source"));
        assert!(!same_pin_role("d", "s"));
        assert!(!same_pin_role("", "d"));
    }

    #[test]
    fn test_fingerprint_exactness() {
        let a = Device::new("M1", DeviceType::Nmos)
            .with_params(DeviceParams::new().with_w(10e-6).with_l(0.18e-6).with_nf(4.0));
        let b = Device::new("M2", DeviceType::Nmos)
            .with_params(DeviceParams::new().with_w(10e-6).with_l(0.18e-6).with_nf(4.0));
        // off by 1e-12: same bucket only under tolerance, never under fingerprint
        let c = Device::new("M3", DeviceType::Nmos)
            .with_params(DeviceParams::new().with_w(10e-6 + 1e-12).with_l(0.18e-6).with_nf(4.0));

        assert_eq!(fingerprint(&a), fingerprint(&b));
        assert_ne!(fingerprint(&a), fingerprint(&c));
    }

    #[test]
    fn test_fingerprint_nf_defaults_to_one() {
        let a = Device::new("M1", DeviceType::Nmos)
            .with_params(DeviceParams::new().with_w(1e-6).with_l(1e-7));
        let b = Device::new("M2", DeviceType::Nmos)
            .with_params(DeviceParams::new().with_w(1e-6).with_l(1e-7).with_nf(1.0));
        assert_eq!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn test_grouping_preserves_order() {
        let mut circuit = Circuit::new("t");
        for (id, w) in [("M1", 1.0), ("M2", 2.0), ("M3", 1.0)] {
            circuit.add_device(
                Device::new(id, DeviceType::Nmos)
                    .with_params(DeviceParams::new().with_w(w).with_l(1.0)),
            );
        }
        let groups = group_by_fingerprint(&circuit, false);
        assert_eq!(groups.len(), 2);
        let first: Vec<&str> = groups[0]
            .1
            .iter()
            .map(|h| circuit.device(*h).id.as_str())
            .collect();
        assert_eq!(first, vec!["M1", "M3"]);
    }
}
