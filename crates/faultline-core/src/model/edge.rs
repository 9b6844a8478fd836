use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::{normalize, ParseEnumError};

/// The kind of causal relationship an edge asserts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Causes,
    Contributes,
    Correlates,
    Precedes,
    Triggers,
    Prevents,
    Mitigates,
}

impl EdgeKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Causes => "causes",
            Self::Contributes => "contributes",
            Self::Correlates => "correlates",
            Self::Precedes => "precedes",
            Self::Triggers => "triggers",
            Self::Prevents => "prevents",
            Self::Mitigates => "mitigates",
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EdgeKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        match normalized.as_str() {
            "causes" => Ok(Self::Causes),
            "contributes" => Ok(Self::Contributes),
            "correlates" => Ok(Self::Correlates),
            "precedes" => Ok(Self::Precedes),
            "triggers" => Ok(Self::Triggers),
            "prevents" => Ok(Self::Prevents),
            "mitigates" => Ok(Self::Mitigates),
            _ => Err(ParseEnumError {
                expected: "edge kind",
                got: s.to_string(),
            }),
        }
    }
}

/// A directed cause/effect assertion between two node ids.
///
/// Edges are heuristic: `confidence` is a rule-assigned weight in `[0, 1]`,
/// not a probability. Duplicate `(source, target, kind)` triples are
/// deduplicated by the graph builder before insertion, not by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CausalEdge {
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
    pub weight: f64,
    pub confidence: f64,
    pub delay_ms: f64,
    pub evidence: Vec<String>,
    pub reasoning: String,
}

impl CausalEdge {
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        kind: EdgeKind,
        confidence: f64,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind,
            weight: 1.0,
            confidence,
            delay_ms: 0.0,
            evidence: Vec::new(),
            reasoning: String::new(),
        }
    }

    #[must_use]
    pub fn with_delay_ms(mut self, delay_ms: f64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    #[must_use]
    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = reasoning.into();
        self
    }

    /// The `(source, target, kind)` triple used for deduplication.
    #[must_use]
    pub fn dedup_key(&self) -> (String, String, EdgeKind) {
        (self.source.clone(), self.target.clone(), self.kind)
    }
}
