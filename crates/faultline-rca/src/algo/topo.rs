//! Topological ordering via Kahn's algorithm.

use std::collections::{HashMap, VecDeque};

use petgraph::graph::NodeIndex;
use petgraph::Direction;

use crate::store::CausalGraph;

/// Order nodes so that every edge points forward in the list.
///
/// Kahn's algorithm over unique-predecessor counts. On a cyclic graph this
/// yields a partial order: nodes inside cycles never reach in-degree zero
/// and are omitted, along with anything only reachable through them.
/// Cyclic members are surfaced separately by
/// [`crate::algo::detect_cycles`].
#[must_use]
pub fn topological_sort(graph: &CausalGraph) -> Vec<String> {
    let mut in_degree: HashMap<NodeIndex, usize> = graph
        .graph
        .node_indices()
        .map(|idx| {
            (
                idx,
                graph.neighbor_indices(idx, Direction::Incoming).len(),
            )
        })
        .collect();

    // Seed with zero in-degree nodes in insertion order for determinism.
    let mut queue: VecDeque<NodeIndex> = graph
        .graph
        .node_indices()
        .filter(|idx| in_degree.get(idx) == Some(&0))
        .collect();

    let mut order: Vec<String> = Vec::with_capacity(graph.node_count());
    while let Some(current) = queue.pop_front() {
        if let Some(node) = graph.graph.node_weight(current) {
            order.push(node.id.clone());
        }
        for next in graph.neighbor_indices(current, Direction::Outgoing) {
            if let Some(remaining) = in_degree.get_mut(&next) {
                *remaining = remaining.saturating_sub(1);
                if *remaining == 0 {
                    queue.push_back(next);
                }
            }
        }
    }

    order
}

#[cfg(test)]
mod tests {
    use super::topological_sort;
    use crate::store::CausalGraph;
    use faultline_core::model::{CausalEdge, EdgeKind};

    fn make_graph(edges: &[(&str, &str)]) -> CausalGraph {
        let mut graph = CausalGraph::new();
        for (source, target) in edges {
            graph.add_edge(CausalEdge::new(*source, *target, EdgeKind::Causes, 0.6));
        }
        graph
    }

    #[test]
    fn chain_orders_front_to_back() {
        let graph = make_graph(&[("a", "b"), ("b", "c")]);
        assert_eq!(topological_sort(&graph), vec!["a", "b", "c"]);
    }

    #[test]
    fn every_edge_points_forward() {
        let graph = make_graph(&[("a", "b"), ("a", "c"), ("c", "d"), ("b", "d")]);
        let order = topological_sort(&graph);
        assert_eq!(order.len(), 4);

        let position: std::collections::HashMap<&str, usize> = order
            .iter()
            .enumerate()
            .map(|(i, id)| (id.as_str(), i))
            .collect();
        for edge in graph.edges() {
            assert!(
                position[edge.source.as_str()] < position[edge.target.as_str()],
                "{} must precede {}",
                edge.source,
                edge.target
            );
        }
    }

    #[test]
    fn cyclic_members_are_omitted() {
        let graph = make_graph(&[("start", "a"), ("a", "b"), ("b", "a"), ("b", "tail")]);
        let order = topological_sort(&graph);
        // `a`/`b` form a cycle; `tail` hangs off it and never unblocks.
        assert_eq!(order, vec!["start"]);
    }

    #[test]
    fn parallel_edges_count_once() {
        let mut graph = make_graph(&[("a", "b")]);
        graph.add_edge(CausalEdge::new("a", "b", EdgeKind::Precedes, 0.3));
        assert_eq!(topological_sort(&graph), vec!["a", "b"]);
    }
}
