//! Symmetry Constraint Store
//!
//! The result object of a detection run: an ordered list of symmetric device
//! pairs, an optional symmetry-axis coordinate, and the claimed-device set.
//!
//! Invariants upheld by the single mutating entry point (`add_pair`,
//! crate-internal):
//! - a device participates in at most one pair (1:1 matching, never groups)
//! - the claimed set is exactly the union of all pair participants
//! - no pair is a self-pair
//!
//! Outside the engine the constraint is read-only; downstream placement
//! relies on those invariants when assigning mirrored coordinates.

pub mod document;
pub mod sym_format;

use std::collections::{HashMap, HashSet};
use std::fmt;

/// Electrical topology class of a symmetric pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymmetryKind {
    Vertical,
    Differential,
    CrossCoupled,
    Passive,
}

impl SymmetryKind {
    /// Parse a kind token, case-insensitively. Unknown tokens fall back to
    /// `Vertical`: persisted constraint files predate newer kinds, so the
    /// fallback is part of the parser contract. The legacy `horizontal`
    /// token maps to `Vertical` as well.
    pub fn parse_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "vertical" | "horizontal" => SymmetryKind::Vertical,
            "differential" => SymmetryKind::Differential,
            "cross_coupled" => SymmetryKind::CrossCoupled,
            "passive" => SymmetryKind::Passive,
            _ => SymmetryKind::Vertical,
        }
    }

    /// Uppercase token used by the `.sym` text format.
    pub fn token(&self) -> &'static str {
        match self {
            SymmetryKind::Vertical => "VERTICAL",
            SymmetryKind::Differential => "DIFFERENTIAL",
            SymmetryKind::CrossCoupled => "CROSS_COUPLED",
            SymmetryKind::Passive => "PASSIVE",
        }
    }
}

impl fmt::Display for SymmetryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SymmetryKind::Vertical => "vertical",
            SymmetryKind::Differential => "differential",
            SymmetryKind::CrossCoupled => "cross_coupled",
            SymmetryKind::Passive => "passive",
        };
        write!(f, "{}", s)
    }
}

/// Intended physical layout pattern for a pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutPattern {
    None,
    SimpleMirror,
    CommonCentroid,
    Interdigitated,
}

impl LayoutPattern {
    /// Unknown tokens fall back to `SimpleMirror` (parser contract, as for
    /// [`SymmetryKind::parse_or_default`]).
    pub fn parse_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "none" => LayoutPattern::None,
            "simple_mirror" => LayoutPattern::SimpleMirror,
            "common_centroid" => LayoutPattern::CommonCentroid,
            "interdigitated" => LayoutPattern::Interdigitated,
            _ => LayoutPattern::SimpleMirror,
        }
    }
}

impl fmt::Display for LayoutPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LayoutPattern::None => "none",
            LayoutPattern::SimpleMirror => "simple_mirror",
            LayoutPattern::CommonCentroid => "common_centroid",
            LayoutPattern::Interdigitated => "interdigitated",
        };
        write!(f, "{}", s)
    }
}

/// Guard-ring request for a pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GuardRing {
    #[default]
    None,
    Pwell,
    Nwell,
    DeepNwell,
}

impl GuardRing {
    pub fn parse_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "pwell" => GuardRing::Pwell,
            "nwell" => GuardRing::Nwell,
            "deep_nwell" => GuardRing::DeepNwell,
            _ => GuardRing::None,
        }
    }
}

impl fmt::Display for GuardRing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GuardRing::None => "none",
            GuardRing::Pwell => "pwell",
            GuardRing::Nwell => "nwell",
            GuardRing::DeepNwell => "deep_nwell",
        };
        write!(f, "{}", s)
    }
}

/// Physical matching options carried per pair
#[derive(Debug, Clone, PartialEq)]
pub struct SymmetryOptions {
    pub add_dummy: bool,
    pub guard_ring: GuardRing,
    pub match_orientation: bool,
    /// Absolute parameter tolerance used by the ERC
    pub tolerance: f64,
}

impl Default for SymmetryOptions {
    fn default() -> Self {
        Self {
            add_dummy: false,
            guard_ring: GuardRing::None,
            match_orientation: true,
            tolerance: 1e-9,
        }
    }
}

/// A symmetric device pair. Identity is unordered; storage keeps the order
/// the detector emitted.
#[derive(Debug, Clone, PartialEq)]
pub struct SymmetryPair {
    pub device1: String,
    pub device2: String,
    pub kind: SymmetryKind,
    pub pattern: LayoutPattern,
    /// Confidence in [0.0, 1.0]; seeded pairs score 1.0, propagated 0.9
    pub score: f64,
    pub options: SymmetryOptions,
    pub metadata: HashMap<String, String>,
}

impl SymmetryPair {
    pub fn new(device1: impl Into<String>, device2: impl Into<String>, kind: SymmetryKind) -> Self {
        Self {
            device1: device1.into(),
            device2: device2.into(),
            kind,
            pattern: LayoutPattern::SimpleMirror,
            score: 1.0,
            options: SymmetryOptions::default(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_pattern(mut self, pattern: LayoutPattern) -> Self {
        self.pattern = pattern;
        self
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = score;
        self
    }

    pub fn with_options(mut self, options: SymmetryOptions) -> Self {
        self.options = options;
        self
    }

    /// Order-independent identity key.
    pub fn key(&self) -> (String, String) {
        if self.device1 <= self.device2 {
            (self.device1.clone(), self.device2.clone())
        } else {
            (self.device2.clone(), self.device1.clone())
        }
    }
}

/// Result container for a detection run.
#[derive(Debug, Clone, Default)]
pub struct SymmetryConstraint {
    pairs: Vec<SymmetryPair>,
    axis: Option<f64>,
    claimed: HashSet<String>,
}

impl SymmetryConstraint {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pair if it violates no invariant. Self-pairs and pairs whose
    /// participants are already claimed are rejected. Returns whether the
    /// pair was accepted.
    pub(crate) fn add_pair(&mut self, pair: SymmetryPair) -> bool {
        if pair.device1 == pair.device2 {
            return false;
        }
        if self.claimed.contains(&pair.device1) || self.claimed.contains(&pair.device2) {
            return false;
        }
        self.claimed.insert(pair.device1.clone());
        self.claimed.insert(pair.device2.clone());
        self.pairs.push(pair);
        true
    }

    pub(crate) fn set_axis(&mut self, axis: f64) {
        self.axis = Some(axis);
    }

    pub fn pairs(&self) -> &[SymmetryPair] {
        &self.pairs
    }

    pub fn iter(&self) -> impl Iterator<Item = &SymmetryPair> {
        self.pairs.iter()
    }

    pub fn axis(&self) -> Option<f64> {
        self.axis
    }

    pub fn is_claimed(&self, device_id: &str) -> bool {
        self.claimed.contains(device_id)
    }

    pub fn claimed_devices(&self) -> impl Iterator<Item = &str> {
        self.claimed.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
