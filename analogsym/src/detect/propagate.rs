//! Symmetry Propagation
//!
//! Breadth-first extension of known symmetric pairs along net connectivity.
//! Symmetry is electrically contagious: devices mirrored at the input of a
//! stage typically drive mirrored loads, so each known pair is expanded
//! through the nets on its drain/source/gate roles, looking for twin devices
//! on the two sides.
//!
//! Termination: the visited set rejects reprocessing of a pair id, the
//! claimed-device set only grows, and both are bounded by the device count,
//! so the queue drains after O(device count) pair expansions even on cyclic
//! connectivity.

use std::collections::{HashSet, VecDeque};

use crate::circuit::{Circuit, CircuitGraph};
use crate::constraint::{LayoutPattern, SymmetryConstraint, SymmetryKind, SymmetryPair};

use super::fingerprint::{pin_net, same_pin_role, PinRole};

/// Absolute tolerance for w/l/nf/m equality between propagation candidates.
const PARAM_TOLERANCE: f64 = 1e-9;

/// Extend `constraint` with pairs discovered by walking net connectivity out
/// from every pair already present. Newly found pairs are enqueued and
/// expanded in turn until a fixed point.
pub(crate) fn propagate(
    circuit: &Circuit,
    graph: &CircuitGraph,
    constraint: &mut SymmetryConstraint,
) {
    let mut queue: VecDeque<(String, String)> = constraint
        .iter()
        .map(|p| (p.device1.clone(), p.device2.clone()))
        .collect();
    let mut visited: HashSet<(String, String)> = HashSet::new();

    while let Some((id1, id2)) = queue.pop_front() {
        let key = if id1 <= id2 {
            (id1.clone(), id2.clone())
        } else {
            (id2.clone(), id1.clone())
        };
        if !visited.insert(key) {
            continue;
        }

        // pairs loaded from a file may reference devices this netlist lacks
        let (Some(h1), Some(h2)) = (circuit.handle_of(&id1), circuit.handle_of(&id2)) else {
            continue;
        };
        let dev1 = circuit.device(h1);
        let dev2 = circuit.device(h2);

        for role in [PinRole::Drain, PinRole::Source, PinRole::Gate] {
            let (Some(n1), Some(n2)) = (pin_net(dev1, role), pin_net(dev2, role)) else {
                continue;
            };
            // a shared node at this role is a common connection point, not a
            // differential edge; nothing to propagate through it
            if n1 == n2 {
                continue;
            }

            let side1 = graph.devices_on_net(n1);
            let side2 = graph.devices_on_net(n2);

            for (c1, c1_pin) in side1 {
                if *c1 == h1 {
                    continue;
                }
                let cand1 = circuit.device(*c1);
                if constraint.is_claimed(&cand1.id) {
                    continue;
                }

                for (c2, c2_pin) in side2 {
                    if *c2 == h2 || c2 == c1 {
                        continue;
                    }
                    let cand2 = circuit.device(*c2);
                    if constraint.is_claimed(&cand2.id) {
                        continue;
                    }
                    if cand1.kind != cand2.kind {
                        continue;
                    }
                    if !same_pin_role(c1_pin, c2_pin) {
                        continue;
                    }
                    if !cand1.params.matches_within(&cand2.params, PARAM_TOLERANCE) {
                        continue;
                    }

                    let pair = SymmetryPair::new(cand1.id.as_str(), cand2.id.as_str(), SymmetryKind::Vertical)
                        .with_pattern(LayoutPattern::SimpleMirror)
                        .with_score(0.9);
                    if constraint.add_pair(pair) {
                        tracing::debug!(
                            "propagated pair: {} / {} (via {} | {})",
                            cand1.id,
                            cand2.id,
                            n1,
                            n2
                        );
                        queue.push_back((cand1.id.clone(), cand2.id.clone()));
                    }
                    // one-to-one correspondence per net pair
                    break;
                }
            }
        }
    }
}
