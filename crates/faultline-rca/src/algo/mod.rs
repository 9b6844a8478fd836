//! Pure graph algorithms over a [`CausalGraph`].
//!
//! # Overview
//!
//! Everything here is a read-only function of the store: path enumeration,
//! cycle detection, topological ordering, and reachability-based impact
//! scoring. None of these mutate the graph or allocate anything the caller
//! does not receive back.
//!
//! ## Depth Bounds
//!
//! Two constants guard against runaway traversal on adversarial or cyclic
//! graphs and are part of the engine's behavioral contract:
//!
//! - [`paths::MAX_PATH_DEPTH`] (10 hops) for simple-path enumeration.
//! - [`impact::MAX_IMPACT_DEPTH`] (20 hops) for impact reachability.

pub mod cycles;
pub mod impact;
pub mod paths;
pub mod stats;
pub mod topo;

// Re-export primary entry points at module level for convenience.
pub use cycles::detect_cycles;
pub use impact::{node_impact, ImpactLevel, NodeImpact, MAX_IMPACT_DEPTH};
pub use paths::{find_causal_chains, find_paths, MAX_PATH_DEPTH};
pub use stats::GraphSummary;
pub use topo::topological_sort;

use petgraph::Direction;

use crate::store::CausalGraph;

/// Nodes with no incoming edges, in insertion order.
///
/// These are the candidate root causes: nothing in the graph is known to
/// cause them.
#[must_use]
pub fn root_candidates(graph: &CausalGraph) -> Vec<String> {
    nodes_without_neighbors(graph, Direction::Incoming)
}

/// Nodes with no outgoing edges, in insertion order.
///
/// These are the terminal symptoms: they cause nothing further.
#[must_use]
pub fn leaf_nodes(graph: &CausalGraph) -> Vec<String> {
    nodes_without_neighbors(graph, Direction::Outgoing)
}

fn nodes_without_neighbors(graph: &CausalGraph, direction: Direction) -> Vec<String> {
    graph
        .graph
        .node_indices()
        .filter(|&idx| {
            graph
                .graph
                .neighbors_directed(idx, direction)
                .next()
                .is_none()
        })
        .filter_map(|idx| graph.graph.node_weight(idx))
        .map(|node| node.id.clone())
        .collect()
}
