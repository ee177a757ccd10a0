//! Symmetry Electrical Rule Checker
//!
//! Validates a detected (or loaded) constraint set against the circuit:
//! both pair participants must exist, share a device type, and match on
//! w/l/nf/m within the pair's tolerance. Layout-intent heuristics come out
//! as warnings; a common-centroid request on single-finger devices is
//! suspicious but not illegal.

use serde::Serialize;

use crate::circuit::{Circuit, Device};
use crate::constraint::{LayoutPattern, SymmetryConstraint, SymmetryPair};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

/// A single ERC finding
#[derive(Debug, Clone, Serialize)]
pub struct ErcViolation {
    pub id: String,
    pub rule_id: String,
    pub severity: Severity,
    pub message: String,
    pub devices: Vec<String>,
}

impl ErcViolation {
    fn new(rule_id: &str, severity: Severity, message: String, devices: Vec<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            rule_id: rule_id.to_string(),
            severity,
            message,
            devices,
        }
    }
}

/// Outcome of an ERC run
#[derive(Debug, Clone, Default, Serialize)]
pub struct ErcReport {
    pub violations: Vec<ErcViolation>,
}

impl ErcReport {
    pub fn errors(&self) -> impl Iterator<Item = &ErcViolation> {
        self.violations
            .iter()
            .filter(|v| v.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ErcViolation> {
        self.violations
            .iter()
            .filter(|v| v.severity == Severity::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    /// A constraint set is valid iff there are no errors. Warnings never
    /// block validity.
    pub fn is_clean(&self) -> bool {
        self.error_count() == 0
    }
}

/// The checker itself; stateless.
pub struct SymmetryErc;

impl SymmetryErc {
    /// Check every pair of `constraint` against `circuit`.
    pub fn check(circuit: &Circuit, constraint: &SymmetryConstraint) -> ErcReport {
        let mut report = ErcReport::default();
        for pair in constraint.iter() {
            Self::check_pair(circuit, pair, &mut report);
        }
        tracing::debug!(
            "ERC: {} errors, {} warnings over {} pairs",
            report.error_count(),
            report.warning_count(),
            constraint.len()
        );
        report
    }

    fn check_pair(circuit: &Circuit, pair: &SymmetryPair, report: &mut ErcReport) {
        let devices = vec![pair.device1.clone(), pair.device2.clone()];

        let (d1, d2) = match (
            circuit.device_by_id(&pair.device1),
            circuit.device_by_id(&pair.device2),
        ) {
            (Some(d1), Some(d2)) => (d1, d2),
            _ => {
                report.violations.push(ErcViolation::new(
                    "missing_device",
                    Severity::Error,
                    format!("Device missing: {} or {}", pair.device1, pair.device2),
                    devices,
                ));
                return;
            }
        };

        if d1.kind != d2.kind {
            report.violations.push(ErcViolation::new(
                "type_mismatch",
                Severity::Error,
                format!(
                    "Type mismatch: {}({}) vs {}({})",
                    d1.id, d1.kind, d2.id, d2.kind
                ),
                devices,
            ));
            return;
        }

        let params = [
            ("w", d1.params.w, d2.params.w),
            ("l", d1.params.l, d2.params.l),
            ("nf", d1.params.nf, d2.params.nf),
            ("m", d1.params.m, d2.params.m),
        ];
        for (name, v1, v2) in params {
            let (v1, v2) = (v1.unwrap_or(0.0), v2.unwrap_or(0.0));
            if (v1 - v2).abs() > pair.options.tolerance {
                report.violations.push(ErcViolation::new(
                    "parameter_mismatch",
                    Severity::Error,
                    format!(
                        "Param mismatch {}/{}: {} ({} != {})",
                        d1.id, d2.id, name, v1, v2
                    ),
                    devices.clone(),
                ));
            }
        }

        if pair.pattern == LayoutPattern::CommonCentroid
            && !has_multiple_fingers(d1)
            && !has_multiple_fingers(d2)
        {
            report.violations.push(ErcViolation::new(
                "centroid_intent",
                Severity::Warning,
                format!(
                    "Intent warning: {}/{} requested common centroid but has no multi-fingers",
                    d1.id, d2.id
                ),
                devices,
            ));
        }
    }
}

/// Multi-finger or multi-multiplier devices can actually be interleaved; a
/// missing finger/multiplier count means 1.
fn has_multiple_fingers(device: &Device) -> bool {
    device.params.nf.unwrap_or(1.0) >= 2.0 || device.params.m.unwrap_or(1.0) >= 2.0
}
