//! Heuristic rule tables for node extraction and edge inference.
//!
//! All tables are data, not code: `const` slices of records that the
//! builder iterates. Extending coverage means adding a record here, not
//! touching traversal logic.

use faultline_core::model::{NodeKind, Severity};

/// Prefix for node ids derived from log signatures (`log_timeout`, ...).
pub const LOG_NODE_PREFIX: &str = "log_";

/// Node id of the synthetic error-rate aggregate emitted by request grouping.
pub const HIGH_ERROR_RATE_ID: &str = "high_error_rate";

// ---------------------------------------------------------------------------
// Error signatures
// ---------------------------------------------------------------------------

/// A named failure pattern recognized in raw log text.
///
/// `patterns` are matched case-insensitively as substrings; a hit on any
/// of them counts the line for this signature. `possible_causes` name
/// other signatures; when both sides are present in a graph the inference
/// pass links them cause → effect.
#[derive(Debug)]
pub struct ErrorSignature {
    pub name: &'static str,
    pub patterns: &'static [&'static str],
    pub kind: NodeKind,
    pub severity: Severity,
    /// Component tag attached to extracted nodes. Empty when the failure
    /// is not tied to one component.
    pub component: &'static str,
    pub possible_causes: &'static [&'static str],
}

/// The signature table. A line is checked against every signature top to
/// bottom and may feed several of them; table order fixes the creation
/// order of nodes first seen on the same line.
pub const ERROR_SIGNATURES: &[ErrorSignature] = &[
    ErrorSignature {
        name: "timeout",
        patterns: &["timeout", "timed out"],
        kind: NodeKind::Event,
        severity: Severity::High,
        component: "api",
        possible_causes: &["database_error", "connection_error", "high_latency"],
    },
    ErrorSignature {
        name: "connection_error",
        patterns: &["connection refused", "connection reset", "connection error"],
        kind: NodeKind::Event,
        severity: Severity::High,
        component: "gateway",
        possible_causes: &["service_unavailable", "out_of_memory"],
    },
    ErrorSignature {
        name: "out_of_memory",
        patterns: &["out of memory", "oomkilled", "memory exhausted"],
        kind: NodeKind::RootCause,
        severity: Severity::Critical,
        component: "",
        possible_causes: &[],
    },
    ErrorSignature {
        name: "database_error",
        patterns: &["database error", "sql error", "deadlock"],
        kind: NodeKind::Event,
        severity: Severity::High,
        component: "database",
        possible_causes: &["out_of_memory", "connection_error"],
    },
    ErrorSignature {
        name: "auth_failure",
        patterns: &["authentication failed", "unauthorized", "invalid token"],
        kind: NodeKind::Event,
        severity: Severity::Medium,
        component: "auth",
        possible_causes: &["database_error"],
    },
    ErrorSignature {
        name: "high_latency",
        patterns: &["high latency", "slow response", "response time exceeded"],
        kind: NodeKind::Symptom,
        severity: Severity::Medium,
        component: "api",
        possible_causes: &["database_error", "out_of_memory"],
    },
    ErrorSignature {
        name: "service_unavailable",
        patterns: &["service unavailable", "upstream unavailable"],
        kind: NodeKind::Symptom,
        severity: Severity::High,
        component: "gateway",
        possible_causes: &["out_of_memory", "database_error"],
    },
    ErrorSignature {
        name: "null_pointer",
        patterns: &["null pointer", "nullpointerexception", "nil pointer"],
        kind: NodeKind::RootCause,
        severity: Severity::Medium,
        component: "",
        possible_causes: &[],
    },
];

/// Look up a signature by name.
#[must_use]
pub fn signature(name: &str) -> Option<&'static ErrorSignature> {
    ERROR_SIGNATURES.iter().find(|sig| sig.name == name)
}

// ---------------------------------------------------------------------------
// Component dependencies
// ---------------------------------------------------------------------------

/// Which components each component depends on: `(dependent, dependencies)`.
///
/// Failures flow from a dependency toward its dependents, so the inference
/// pass draws `Contributes` edges from dependency-component nodes into
/// dependent-component nodes.
pub const COMPONENT_DEPENDENCIES: &[(&str, &[&str])] = &[
    ("api", &["database", "cache", "auth"]),
    ("gateway", &["api"]),
    ("auth", &["database"]),
];
