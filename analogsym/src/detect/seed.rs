//! Seed Pattern Matchers
//!
//! Topological detectors that run inside a fingerprint bucket and produce
//! the initial (seed) symmetric pairs:
//!
//! - differential pair: common source, split gates, split drains
//! - cross-coupled pair: common source, each gate tied to the other's drain
//!
//! Matching is greedy: pairs claim their devices immediately and the first
//! match for a device wins. Candidates are visited pairwise in ascending
//! bucket order, so results are deterministic for a given device order.

use crate::circuit::{Circuit, DeviceHandle};
use crate::constraint::{LayoutPattern, SymmetryConstraint, SymmetryKind, SymmetryPair};

use super::fingerprint::{pin_net, PinRole};

/// Differential-pair rule over one fingerprint bucket list.
///
/// Only MOS buckets are considered; passive-device symmetry is a reserved
/// extension point with no rule in this version.
pub(crate) fn detect_differential_pairs(
    circuit: &Circuit,
    groups: &[(String, Vec<DeviceHandle>)],
    constraint: &mut SymmetryConstraint,
) {
    for (_, bucket) in groups {
        if bucket.len() < 2 || !circuit.device(bucket[0]).kind.is_mos() {
            continue;
        }
        for i in 0..bucket.len() {
            let d1 = circuit.device(bucket[i]);
            if constraint.is_claimed(&d1.id) {
                continue;
            }
            for &h2 in &bucket[i + 1..] {
                let d2 = circuit.device(h2);
                if constraint.is_claimed(&d2.id) {
                    continue;
                }

                let (g1, s1, dr1) = (
                    pin_net(d1, PinRole::Gate),
                    pin_net(d1, PinRole::Source),
                    pin_net(d1, PinRole::Drain),
                );
                let (g2, s2, dr2) = (
                    pin_net(d2, PinRole::Gate),
                    pin_net(d2, PinRole::Source),
                    pin_net(d2, PinRole::Drain),
                );

                // common source, differential gates and drains
                let is_diff = s1.is_some() && s1 == s2 && g1 != g2 && dr1 != dr2;
                if is_diff {
                    let pair = SymmetryPair::new(d1.id.as_str(), d2.id.as_str(), SymmetryKind::Differential)
                        .with_pattern(LayoutPattern::CommonCentroid);
                    if constraint.add_pair(pair) {
                        tracing::debug!("differential pair: {} / {}", d1.id, d2.id);
                        break; // first match wins for d1
                    }
                }
            }
        }
    }
}

/// Cross-coupled rule: gate(d1) == drain(d2), gate(d2) == drain(d1), shared
/// source. Runs after the differential matcher on still-unclaimed devices.
pub(crate) fn detect_cross_coupled_pairs(
    circuit: &Circuit,
    groups: &[(String, Vec<DeviceHandle>)],
    constraint: &mut SymmetryConstraint,
) {
    for (_, bucket) in groups {
        if bucket.len() < 2 || !circuit.device(bucket[0]).kind.is_mos() {
            continue;
        }
        for i in 0..bucket.len() {
            let d1 = circuit.device(bucket[i]);
            if constraint.is_claimed(&d1.id) {
                continue;
            }
            for &h2 in &bucket[i + 1..] {
                let d2 = circuit.device(h2);
                if constraint.is_claimed(&d2.id) {
                    continue;
                }

                let (g1, s1, dr1) = (
                    pin_net(d1, PinRole::Gate),
                    pin_net(d1, PinRole::Source),
                    pin_net(d1, PinRole::Drain),
                );
                let (g2, s2, dr2) = (
                    pin_net(d2, PinRole::Gate),
                    pin_net(d2, PinRole::Source),
                    pin_net(d2, PinRole::Drain),
                );

                let is_cross = s1.is_some() && s1 == s2 && g1 == dr2 && g2 == dr1;
                if is_cross {
                    let pair = SymmetryPair::new(d1.id.as_str(), d2.id.as_str(), SymmetryKind::CrossCoupled)
                        .with_pattern(LayoutPattern::CommonCentroid);
                    if constraint.add_pair(pair) {
                        tracing::debug!("cross-coupled pair: {} / {}", d1.id, d2.id);
                        break;
                    }
                }
            }
        }
    }
}
