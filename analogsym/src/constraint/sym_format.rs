//! Text Constraint Format
//!
//! Line-oriented `.sym` constraint files:
//!
//! ```text
//! SYMMETRY_AXIS 50.0
//! SYMMETRY_PAIR M1 M2 DIFFERENTIAL
//! SYMMETRY_PAIR M3 M4
//! ```
//!
//! Keywords and the kind token are case-insensitive; a missing kind token
//! means VERTICAL, and the generator omits the token for vertical pairs.
//! Unknown or malformed lines are skipped with a diagnostic, since old
//! constraint files must keep loading even when they carry lines this
//! version does not understand.

use std::path::Path;

use crate::core::SymError;

use super::{SymmetryConstraint, SymmetryKind, SymmetryPair};

/// Parse `.sym` content. Never fails; bad lines are dropped with a warning.
pub fn parse_str(content: &str) -> SymmetryConstraint {
    let mut constraint = SymmetryConstraint::new();

    for (lineno, raw_line) in content.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens[0].to_uppercase().as_str() {
            "SYMMETRY_AXIS" => match tokens.get(1).and_then(|t| t.parse::<f64>().ok()) {
                Some(axis) => {
                    if constraint.axis().is_none() {
                        constraint.set_axis(axis);
                    } else {
                        tracing::debug!("line {}: duplicate SYMMETRY_AXIS ignored", lineno + 1);
                    }
                }
                None => {
                    tracing::warn!("line {}: invalid symmetry axis: {}", lineno + 1, line);
                }
            },
            "SYMMETRY_PAIR" => {
                if tokens.len() < 3 {
                    tracing::warn!("line {}: malformed SYMMETRY_PAIR: {}", lineno + 1, line);
                    continue;
                }
                let kind = tokens
                    .get(3)
                    .map(|t| SymmetryKind::parse_or_default(t))
                    .unwrap_or(SymmetryKind::Vertical);
                let pair = SymmetryPair::new(tokens[1], tokens[2], kind);
                if !constraint.add_pair(pair) {
                    tracing::warn!(
                        "line {}: pair {} {} rejected (self-pair or device already claimed)",
                        lineno + 1,
                        tokens[1],
                        tokens[2]
                    );
                }
            }
            _ => {
                tracing::warn!("line {}: unrecognized constraint line: {}", lineno + 1, line);
            }
        }
    }

    constraint
}

pub fn parse_file(path: &Path) -> Result<SymmetryConstraint, SymError> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_str(&content))
}

/// Render a constraint to `.sym` text. The kind token is omitted for
/// vertical pairs.
pub fn generate(constraint: &SymmetryConstraint) -> String {
    let mut lines = Vec::new();

    if let Some(axis) = constraint.axis() {
        lines.push(format!("SYMMETRY_AXIS {}", axis));
    }
    for pair in constraint.iter() {
        let mut line = format!("SYMMETRY_PAIR {} {}", pair.device1, pair.device2);
        if pair.kind != SymmetryKind::Vertical {
            line.push(' ');
            line.push_str(pair.kind.token());
        }
        lines.push(line);
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

pub fn write_file(constraint: &SymmetryConstraint, path: &Path) -> Result<(), SymError> {
    std::fs::write(path, generate(constraint))?;
    Ok(())
}
