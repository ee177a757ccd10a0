//! Engine facade shared by library consumers and the CLI.
//! Ties together circuit loading, detection, ERC, and constraint I/O.

use std::path::Path;

use crate::circuit::{self, Circuit, CircuitGraph, CircuitStats, ConnectivityIssue};
use crate::constraint::{document, sym_format, SymmetryConstraint};
use crate::detect::{DetectionOptions, SymmetryDetector};
use crate::erc::{ErcReport, SymmetryErc};

#[derive(Debug, thiserror::Error)]
pub enum SymError {
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid parameter {key}={value} on device {device}")]
    InvalidParameter {
        device: String,
        key: String,
        value: String,
    },
    #[error("Unsupported constraint format: {0}")]
    UnsupportedFormat(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Options for a full engine run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub detection: DetectionOptions,
    /// Run the ERC over the detected constraint set.
    pub erc: bool,
}

/// Result of a detection run.
#[derive(Debug, Clone)]
pub struct DetectionOutcome {
    pub constraint: SymmetryConstraint,
    pub stats: CircuitStats,
    /// Devices dropped from the run (invalid parameters), as rendered reasons
    pub skipped: Vec<String>,
    pub erc: Option<ErcReport>,
}

/// Circuit-level report without detection (the CLI `stats` command).
#[derive(Debug, Clone)]
pub struct CircuitReport {
    pub stats: CircuitStats,
    pub connectivity: Vec<ConnectivityIssue>,
    pub skipped: Vec<String>,
}

/// Core engine API used by both library consumers and the CLI.
pub struct SymmetryCore;

impl SymmetryCore {
    /// Run detection over an in-memory circuit.
    pub fn detect_circuit(circuit: &Circuit, options: &RunOptions) -> DetectionOutcome {
        let graph = CircuitGraph::build(circuit);
        let detector = SymmetryDetector::with_options(options.detection.clone());
        let constraint = detector.detect_with_graph(circuit, &graph);
        let erc = options
            .erc
            .then(|| SymmetryErc::check(circuit, &constraint));

        DetectionOutcome {
            stats: graph.stats(circuit),
            constraint,
            skipped: Vec::new(),
            erc,
        }
    }

    /// Load a raw-circuit JSON file and run detection. Devices with invalid
    /// parameters are skipped (and reported), not fatal.
    pub fn detect_file(path: &Path, options: &RunOptions) -> Result<DetectionOutcome, SymError> {
        let (circuit, errors) = circuit::load_circuit(path)?;
        let mut outcome = Self::detect_circuit(&circuit, options);
        outcome.skipped = errors.iter().map(|e| e.to_string()).collect();
        Ok(outcome)
    }

    /// Load constraints and validate them against a circuit file.
    pub fn check_file(
        circuit_path: &Path,
        constraints_path: &Path,
    ) -> Result<(ErcReport, Vec<String>), SymError> {
        let (circuit, errors) = circuit::load_circuit(circuit_path)?;
        let constraint = Self::load_constraints(constraints_path)?;
        let report = SymmetryErc::check(&circuit, &constraint);
        Ok((report, errors.iter().map(|e| e.to_string()).collect()))
    }

    /// Statistics plus connectivity validation for a circuit file.
    pub fn circuit_report(path: &Path) -> Result<CircuitReport, SymError> {
        let (circuit, errors) = circuit::load_circuit(path)?;
        let graph = CircuitGraph::build(&circuit);
        Ok(CircuitReport {
            stats: graph.stats(&circuit),
            connectivity: graph.validate_connections(&circuit),
            skipped: errors.iter().map(|e| e.to_string()).collect(),
        })
    }

    /// Load a constraint file, dispatching on extension: `.sym` text or
    /// `.json` structured document.
    pub fn load_constraints(path: &Path) -> Result<SymmetryConstraint, SymError> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("sym") => sym_format::parse_file(path),
            Some("json") => document::read_file(path),
            other => Err(SymError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }

    /// Write a constraint file, dispatching on extension as for
    /// [`load_constraints`](Self::load_constraints).
    pub fn save_constraints(constraint: &SymmetryConstraint, path: &Path) -> Result<(), SymError> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("sym") => sym_format::write_file(constraint, path),
            Some("json") => document::write_file(constraint, path),
            other => Err(SymError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}
