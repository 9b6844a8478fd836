use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::{fmt, str::FromStr};
use tracing::warn;

use super::{normalize, ParseEnumError};

/// Maximum number of raw evidence snippets kept per node.
///
/// Aggregated nodes keep counting occurrences in `frequency` after the cap
/// is reached; only the snippet list stops growing.
pub const EVIDENCE_CAP: usize = 5;

/// Classification of what a causal node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Event,
    State,
    Symptom,
    RootCause,
    Condition,
    Action,
    Component,
}

impl NodeKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Event => "event",
            Self::State => "state",
            Self::Symptom => "symptom",
            Self::RootCause => "root_cause",
            Self::Condition => "condition",
            Self::Action => "action",
            Self::Component => "component",
        }
    }

    /// Parse external input, falling back to [`NodeKind::Event`] for
    /// anything unrecognized. Externally supplied events must never be
    /// rejected over a bad classification string.
    #[must_use]
    pub fn parse_lenient(s: &str) -> Self {
        Self::from_str(s).unwrap_or_else(|_| {
            warn!(value = %s, "unknown node kind, defaulting to event");
            Self::Event
        })
    }
}

/// Severity of a failure signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    None,
}

impl Severity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::None => "none",
        }
    }

    /// Numeric weight used by impact scoring.
    #[must_use]
    pub const fn score(self) -> u32 {
        match self {
            Self::Critical => 4,
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
            Self::None => 0,
        }
    }

    /// Parse external input, falling back to [`Severity::Medium`].
    #[must_use]
    pub fn parse_lenient(s: &str) -> Self {
        Self::from_str(s).unwrap_or_else(|_| {
            warn!(value = %s, "unknown severity, defaulting to medium");
            Self::Medium
        })
    }
}

impl Default for Severity {
    fn default() -> Self {
        Self::None
    }
}

/// Which extraction path produced a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalSource {
    Log,
    Request,
    Event,
}

impl SignalSource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Log => "log",
            Self::Request => "request",
            Self::Event => "event",
        }
    }
}

/// A vertex in the causal graph: one distinct failure signal or state.
///
/// Nodes are keyed by `id`; re-adding a node with an existing id replaces
/// the stored node in place. Recurring signals are aggregated into a single
/// node by incrementing `frequency` and appending evidence up to
/// [`EVIDENCE_CAP`], rather than creating duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CauseNode {
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
    pub description: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub severity: Severity,
    /// How many raw signals were aggregated into this node. Always >= 1.
    pub frequency: u32,
    pub component: String,
    pub evidence: Vec<String>,
    pub source: SignalSource,
    pub metadata: BTreeMap<String, String>,
}

impl CauseNode {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: NodeKind,
        source: SignalSource,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            source,
            ..Self::default()
        }
    }

    /// Minimal placeholder for an edge endpoint that was never extracted
    /// from any signal. The id doubles as the display name.
    #[must_use]
    pub fn stub(id: &str) -> Self {
        Self::new(id, id, NodeKind::Event, SignalSource::Event)
    }

    /// Append a raw snippet unless the evidence list is already at
    /// [`EVIDENCE_CAP`].
    pub fn push_evidence(&mut self, snippet: impl Into<String>) {
        if self.evidence.len() < EVIDENCE_CAP {
            self.evidence.push(snippet.into());
        }
    }

    #[must_use]
    pub fn first_evidence(&self) -> Option<&str> {
        self.evidence.first().map(String::as_str)
    }
}

impl Default for CauseNode {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            kind: NodeKind::Event,
            description: String::new(),
            timestamp: None,
            severity: Severity::None,
            frequency: 1,
            component: String::new(),
            evidence: Vec::new(),
            source: SignalSource::Event,
            metadata: BTreeMap::new(),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for SignalSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        match normalized.as_str() {
            "event" => Ok(Self::Event),
            "state" => Ok(Self::State),
            "symptom" => Ok(Self::Symptom),
            "root_cause" | "rootcause" => Ok(Self::RootCause),
            "condition" => Ok(Self::Condition),
            "action" => Ok(Self::Action),
            "component" => Ok(Self::Component),
            _ => Err(ParseEnumError {
                expected: "node kind",
                got: s.to_string(),
            }),
        }
    }
}

impl FromStr for Severity {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        match normalized.as_str() {
            "critical" => Ok(Self::Critical),
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            "none" => Ok(Self::None),
            _ => Err(ParseEnumError {
                expected: "severity",
                got: s.to_string(),
            }),
        }
    }
}

impl FromStr for SignalSource {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        match normalized.as_str() {
            "log" => Ok(Self::Log),
            "request" => Ok(Self::Request),
            "event" => Ok(Self::Event),
            _ => Err(ParseEnumError {
                expected: "signal source",
                got: s.to_string(),
            }),
        }
    }
}
