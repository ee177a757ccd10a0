//! Structured Constraint Document
//!
//! JSON serialization of a [`SymmetryConstraint`]:
//!
//! ```json
//! {
//!   "global": { "axis_x": 50.0 },
//!   "pairs": [
//!     { "d1": "M1", "d2": "M2", "type": "differential",
//!       "pattern": "common_centroid",
//!       "options": { "add_dummy": false, "guard_ring": "none",
//!                    "match_orientation": true, "tolerance": 1e-9 },
//!       "score": 1.0, "metadata": {} }
//!   ]
//! }
//! ```
//!
//! Enum fields travel as plain strings so that documents written by newer
//! versions keep loading: unknown `type` falls back to vertical, unknown
//! `pattern` to simple_mirror, unknown `guard_ring` to none.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::core::SymError;

use super::{
    GuardRing, LayoutPattern, SymmetryConstraint, SymmetryKind, SymmetryOptions, SymmetryPair,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConstraintDocument {
    #[serde(default)]
    pub global: GlobalSection,
    #[serde(default)]
    pub pairs: Vec<PairEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis_x: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairEntry {
    pub d1: String,
    pub d2: String,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    #[serde(default = "default_pattern")]
    pub pattern: String,
    #[serde(default)]
    pub options: OptionsEntry,
    #[serde(default = "default_score")]
    pub score: f64,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsEntry {
    #[serde(default)]
    pub add_dummy: bool,
    #[serde(default = "default_guard_ring")]
    pub guard_ring: String,
    #[serde(default = "default_true")]
    pub match_orientation: bool,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

impl Default for OptionsEntry {
    fn default() -> Self {
        Self {
            add_dummy: false,
            guard_ring: default_guard_ring(),
            match_orientation: true,
            tolerance: default_tolerance(),
        }
    }
}

fn default_kind() -> String {
    "vertical".to_string()
}

fn default_pattern() -> String {
    "simple_mirror".to_string()
}

fn default_guard_ring() -> String {
    "none".to_string()
}

fn default_true() -> bool {
    true
}

fn default_tolerance() -> f64 {
    1e-9
}

fn default_score() -> f64 {
    1.0
}

/// Project a constraint into its document form.
pub fn to_document(constraint: &SymmetryConstraint) -> ConstraintDocument {
    let pairs = constraint
        .iter()
        .map(|pair| PairEntry {
            d1: pair.device1.clone(),
            d2: pair.device2.clone(),
            kind: pair.kind.to_string(),
            pattern: pair.pattern.to_string(),
            options: OptionsEntry {
                add_dummy: pair.options.add_dummy,
                guard_ring: pair.options.guard_ring.to_string(),
                match_orientation: pair.options.match_orientation,
                tolerance: pair.options.tolerance,
            },
            score: pair.score,
            metadata: pair.metadata.clone(),
        })
        .collect();

    ConstraintDocument {
        global: GlobalSection {
            axis_x: constraint.axis(),
        },
        pairs,
    }
}

/// Rebuild a constraint from its document form, applying the enum fallbacks.
pub fn from_document(doc: ConstraintDocument) -> SymmetryConstraint {
    let mut constraint = SymmetryConstraint::new();

    if let Some(axis) = doc.global.axis_x {
        constraint.set_axis(axis);
    }
    for entry in doc.pairs {
        let mut pair = SymmetryPair::new(
            entry.d1,
            entry.d2,
            SymmetryKind::parse_or_default(&entry.kind),
        )
        .with_pattern(LayoutPattern::parse_or_default(&entry.pattern))
        .with_score(entry.score)
        .with_options(SymmetryOptions {
            add_dummy: entry.options.add_dummy,
            guard_ring: GuardRing::parse_or_default(&entry.options.guard_ring),
            match_orientation: entry.options.match_orientation,
            tolerance: entry.options.tolerance,
        });
        pair.metadata = entry.metadata;

        if !constraint.add_pair(pair) {
            tracing::warn!("constraint document entry rejected (self-pair or reclaimed device)");
        }
    }

    constraint
}

pub fn to_json_string(constraint: &SymmetryConstraint) -> Result<String, SymError> {
    serde_json::to_string_pretty(&to_document(constraint))
        .map_err(|e| SymError::Parse(e.to_string()))
}

pub fn from_json_str(content: &str) -> Result<SymmetryConstraint, SymError> {
    let doc: ConstraintDocument =
        serde_json::from_str(content).map_err(|e| SymError::Parse(e.to_string()))?;
    Ok(from_document(doc))
}

pub fn read_file(path: &Path) -> Result<SymmetryConstraint, SymError> {
    let content = std::fs::read_to_string(path)?;
    from_json_str(&content)
}

pub fn write_file(constraint: &SymmetryConstraint, path: &Path) -> Result<(), SymError> {
    std::fs::write(path, to_json_string(constraint)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_enum_strings_fall_back() {
        let json = r#"{
            "global": { "axis_x": 10.0 },
            "pairs": [
                { "d1": "M1", "d2": "M2", "type": "spiral", "pattern": "honeycomb",
                  "options": { "guard_ring": "moat" } }
            ]
        }"#;
        let c = from_json_str(json).unwrap();
        let pair = &c.pairs()[0];
        assert_eq!(pair.kind, SymmetryKind::Vertical);
        assert_eq!(pair.pattern, LayoutPattern::SimpleMirror);
        assert_eq!(pair.options.guard_ring, GuardRing::None);
        assert_eq!(pair.options.tolerance, 1e-9);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let json = r#"{ "pairs": [ { "d1": "M1", "d2": "M2" } ] }"#;
        let c = from_json_str(json).unwrap();
        assert_eq!(c.axis(), None);
        let pair = &c.pairs()[0];
        assert_eq!(pair.kind, SymmetryKind::Vertical);
        assert_eq!(pair.score, 1.0);
        assert!(pair.options.match_orientation);
    }

    #[test]
    fn test_document_roundtrip() {
        let mut c = SymmetryConstraint::new();
        c.set_axis(25.0);
        let mut pair = SymmetryPair::new("M1", "M2", SymmetryKind::CrossCoupled)
            .with_pattern(LayoutPattern::CommonCentroid)
            .with_score(0.9)
            .with_options(SymmetryOptions {
                add_dummy: true,
                guard_ring: GuardRing::DeepNwell,
                match_orientation: false,
                tolerance: 2e-9,
            });
        pair.metadata.insert("origin".to_string(), "vco".to_string());
        c.add_pair(pair);

        let round = from_json_str(&to_json_string(&c).unwrap()).unwrap();
        assert_eq!(round.axis(), Some(25.0));
        assert_eq!(round.pairs(), c.pairs());
    }
}
