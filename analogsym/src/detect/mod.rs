//! Symmetry Detection Engine
//!
//! Pipeline: fingerprint grouping -> seed matchers (differential,
//! cross-coupled) -> propagation along net connectivity. The shared
//! claimed-device set threads through all stages, so every device ends up in
//! at most one pair.

pub mod fingerprint;
mod propagate;
mod seed;

use crate::circuit::{Circuit, CircuitGraph};
use crate::constraint::SymmetryConstraint;

/// Knobs for a detection run.
#[derive(Debug, Clone)]
pub struct DetectionOptions {
    /// Sort fingerprint buckets by device id before matching, making results
    /// independent of the caller's insertion order. Off by default: the
    /// documented contract is first-match-wins over insertion order.
    pub sort_candidates: bool,
    /// Run the propagation stage after seeding.
    pub propagate: bool,
}

impl Default for DetectionOptions {
    fn default() -> Self {
        Self {
            sort_candidates: false,
            propagate: true,
        }
    }
}

/// Fingerprint-and-topology symmetry detector.
pub struct SymmetryDetector {
    options: DetectionOptions,
}

impl SymmetryDetector {
    pub fn new() -> Self {
        Self {
            options: DetectionOptions::default(),
        }
    }

    pub fn with_options(options: DetectionOptions) -> Self {
        Self { options }
    }

    /// Run detection over a circuit. Builds the connectivity graph
    /// internally; use [`detect_with_graph`](Self::detect_with_graph) to
    /// reuse one you already have.
    pub fn detect(&self, circuit: &Circuit) -> SymmetryConstraint {
        let graph = CircuitGraph::build(circuit);
        self.detect_with_graph(circuit, &graph)
    }

    /// Extend an existing constraint by propagation only, treating the pairs
    /// already present as seeds. Detection runs this stage automatically;
    /// this entry point re-propagates a constraint loaded from a file.
    pub fn propagate(&self, circuit: &Circuit, constraint: &mut SymmetryConstraint) {
        let graph = CircuitGraph::build(circuit);
        propagate::propagate(circuit, &graph, constraint);
    }

    pub fn detect_with_graph(
        &self,
        circuit: &Circuit,
        graph: &CircuitGraph,
    ) -> SymmetryConstraint {
        let mut constraint = SymmetryConstraint::new();

        let groups = fingerprint::group_by_fingerprint(circuit, self.options.sort_candidates);
        tracing::debug!(
            "{} devices in {} fingerprint buckets",
            circuit.len(),
            groups.len()
        );

        seed::detect_differential_pairs(circuit, &groups, &mut constraint);
        seed::detect_cross_coupled_pairs(circuit, &groups, &mut constraint);
        // passive-device symmetry (resistor/capacitor loads) is a reserved
        // extension point; no seed rule fires for passives in this version
        let seeds = constraint.len();

        if self.options.propagate {
            propagate::propagate(circuit, graph, &mut constraint);
        }

        tracing::info!(
            "symmetry detection: {} seed pairs, {} propagated, {} devices claimed",
            seeds,
            constraint.len() - seeds,
            constraint.claimed_devices().count()
        );

        constraint
    }
}

impl Default for SymmetryDetector {
    fn default() -> Self {
        Self::new()
    }
}
