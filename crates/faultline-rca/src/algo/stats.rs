//! Basic statistics over a causal graph.
//!
//! # Statistics Provided
//!
//! - **node_count**: Total number of cause nodes in the graph.
//! - **edge_count**: Total number of causal edges, parallel edges included.
//! - **density**: Ratio of actual edges to maximum possible edges for a
//!   directed graph: `density = edge_count / (node_count * (node_count - 1))`.
//!   An empty or single-node graph has density 0.0.
//! - **isolated_node_count**: Nodes with no edges at all (neither in-edges
//!   nor out-edges). Signals the inference rules failed to connect them.
//! - **content_hash**: The graph's structural fingerprint, carried along so
//!   downstream consumers can tell which graph the numbers describe.

use petgraph::visit::IntoNodeIdentifiers;
use petgraph::Direction;
use serde::{Deserialize, Serialize};

use crate::store::CausalGraph;

// ---------------------------------------------------------------------------
// GraphSummary
// ---------------------------------------------------------------------------

/// Summary statistics for a causal graph.
///
/// Computed once per analysis run by [`GraphSummary::compute`] and embedded
/// in the analysis result for observability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSummary {
    /// Number of cause nodes in the graph.
    pub node_count: usize,
    /// Number of causal edges, parallel edges included.
    pub edge_count: usize,
    /// Graph density: `edge_count / (node_count * (node_count - 1))`.
    /// Zero for graphs with 0 or 1 node.
    pub density: f64,
    /// Number of nodes with no in-edges and no out-edges.
    pub isolated_node_count: usize,
    /// Structural fingerprint of the graph, `blake3:`-prefixed.
    pub content_hash: String,
}

impl GraphSummary {
    /// Compute summary statistics for `graph`.
    #[must_use]
    pub fn compute(graph: &CausalGraph) -> Self {
        let node_count = graph.node_count();
        let edge_count = graph.edge_count();

        let density = compute_density(node_count, edge_count);

        // Isolated nodes: degree 0 (no in or out edges).
        let isolated_node_count = graph
            .graph
            .node_identifiers()
            .filter(|&idx| {
                graph
                    .graph
                    .neighbors_directed(idx, Direction::Incoming)
                    .next()
                    .is_none()
                    && graph
                        .graph
                        .neighbors_directed(idx, Direction::Outgoing)
                        .next()
                        .is_none()
            })
            .count();

        Self {
            node_count,
            edge_count,
            density,
            isolated_node_count,
            content_hash: graph.content_hash(),
        }
    }

    /// Return `true` if the graph carries no edges.
    #[must_use]
    pub fn is_flat(&self) -> bool {
        self.edge_count == 0
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

#[allow(clippy::cast_precision_loss)]
fn compute_density(node_count: usize, edge_count: usize) -> f64 {
    if node_count < 2 {
        return 0.0_f64;
    }
    let max_edges = (node_count * (node_count - 1)) as f64;
    edge_count as f64 / max_edges
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use faultline_core::model::{CausalEdge, CauseNode, EdgeKind};

    fn make_graph(nodes: &[&str], edges: &[(&str, &str)]) -> CausalGraph {
        let mut graph = CausalGraph::new();
        for id in nodes {
            graph.add_node(CauseNode::stub(*id));
        }
        for (source, target) in edges {
            graph.add_edge(CausalEdge::new(*source, *target, EdgeKind::Causes, 0.6));
        }
        graph
    }

    #[test]
    fn empty_graph_summary() {
        let summary = GraphSummary::compute(&make_graph(&[], &[]));

        assert_eq!(summary.node_count, 0);
        assert_eq!(summary.edge_count, 0);
        assert!((summary.density - 0.0).abs() < f64::EPSILON);
        assert_eq!(summary.isolated_node_count, 0);
        assert!(summary.is_flat());
    }

    #[test]
    fn single_node_no_edges() {
        let summary = GraphSummary::compute(&make_graph(&["a"], &[]));

        assert_eq!(summary.node_count, 1);
        assert!((summary.density - 0.0).abs() < f64::EPSILON);
        assert_eq!(summary.isolated_node_count, 1);
    }

    #[test]
    fn density_two_node_one_edge() {
        // a → b: density = 1 / (2 * 1) = 0.5
        let summary = GraphSummary::compute(&make_graph(&[], &[("a", "b")]));
        assert!((summary.density - 0.5).abs() < 1e-10, "density = 0.5");
    }

    #[test]
    fn density_complete_directed_graph() {
        // a → b, b → a: density = 2 / (2 * 1) = 1.0
        let summary = GraphSummary::compute(&make_graph(&[], &[("a", "b"), ("b", "a")]));
        assert!((summary.density - 1.0).abs() < 1e-10, "density = 1.0");
    }

    #[test]
    fn isolated_nodes_counted() {
        let summary = GraphSummary::compute(&make_graph(&["a", "b", "c"], &[("a", "b")]));
        assert_eq!(summary.isolated_node_count, 1, "only c is isolated");
    }

    #[test]
    fn hash_matches_store() {
        let graph = make_graph(&[], &[("a", "b")]);
        let summary = GraphSummary::compute(&graph);
        assert_eq!(summary.content_hash, graph.content_hash());
        assert!(summary.content_hash.starts_with("blake3:"));
    }
}
