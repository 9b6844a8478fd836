//! Domain model for causal analysis.
//!
//! # Overview
//!
//! Everything the engine reasons about lives here:
//!
//! - [`node`]: [`CauseNode`] and its classification enums, the vertices of
//!   the causal graph, one per distinct failure signal.
//! - [`edge`]: [`CausalEdge`] and [`EdgeKind`], directed cause/effect
//!   assertions between node ids.
//! - [`chain`]: [`CausalChain`], a derived propagation path with aggregate
//!   confidence and delay, never mutated after construction.
//! - [`signal`]: the raw inputs ([`SignalBatch`]) the graph builder consumes:
//!   log text, structured request records, and explicit external events.
//!
//! Nodes and edges reference each other by string id rather than by direct
//! pointers; the graph store in `faultline-rca` owns the arena and the
//! id-to-vertex index.

pub mod chain;
pub mod edge;
pub mod node;
pub mod signal;

// Re-export primary types at module level for convenience.
pub use chain::CausalChain;
pub use edge::{CausalEdge, EdgeKind};
pub use node::{CauseNode, NodeKind, Severity, SignalSource, EVIDENCE_CAP};
pub use signal::{ExternalEvent, RequestRecord, SignalBatch};

/// Error returned when parsing an enum value from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub expected: &'static str,
    pub got: String,
}

impl std::fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid {}: '{}'", self.expected, self.got)
    }
}

impl std::error::Error for ParseEnumError {}

pub(crate) fn normalize(input: &str) -> String {
    input.trim().to_ascii_lowercase()
}
