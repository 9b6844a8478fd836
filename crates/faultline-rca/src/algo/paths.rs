//! Simple-path enumeration and causal-chain assembly.
//!
//! # Overview
//!
//! [`find_paths`] enumerates every simple path (no repeated node) between
//! two ids, depth-bounded so cyclic graphs cannot blow up the search.
//! [`find_causal_chains`] lifts those paths into [`CausalChain`]s by
//! resolving the edge for each consecutive pair and multiplying edge
//! confidences into a chain confidence.
//!
//! ## Edge Resolution
//!
//! Chain assembly uses [`CausalGraph::edge_between`], which returns the
//! first inserted edge for a pair regardless of kind. When rule inference
//! produced, say, both a `causes` and a `precedes` edge for the same pair,
//! the chain carries whichever landed first.

use tracing::debug;

use faultline_core::model::CausalChain;
use petgraph::graph::NodeIndex;
use petgraph::Direction;
use std::collections::HashSet;

use crate::store::CausalGraph;

/// Maximum number of hops explored by [`find_paths`].
pub const MAX_PATH_DEPTH: usize = 10;

/// Enumerate all simple paths from `start` to `end` up to `max_depth` hops.
///
/// Returns node-id sequences, each beginning with `start` and ending with
/// `end`. Unknown endpoints yield an empty list. When `start == end` the
/// single zero-hop path `[start]` is returned.
#[must_use]
pub fn find_paths(
    graph: &CausalGraph,
    start: &str,
    end: &str,
    max_depth: usize,
) -> Vec<Vec<String>> {
    let (Some(start_idx), Some(end_idx)) = (graph.node_index(start), graph.node_index(end)) else {
        return Vec::new();
    };

    let mut found = Vec::new();
    let mut path = vec![start_idx];
    let mut on_path = HashSet::from([start_idx]);
    walk(graph, end_idx, max_depth, &mut path, &mut on_path, &mut found);
    found
}

fn walk(
    graph: &CausalGraph,
    end: NodeIndex,
    max_depth: usize,
    path: &mut Vec<NodeIndex>,
    on_path: &mut HashSet<NodeIndex>,
    found: &mut Vec<Vec<String>>,
) {
    let Some(&current) = path.last() else {
        return;
    };

    if current == end {
        found.push(ids_for(graph, path));
        return;
    }

    // path.len() nodes == path.len() - 1 hops; expanding adds one more.
    if path.len() > max_depth {
        return;
    }

    for next in graph.neighbor_indices(current, Direction::Outgoing) {
        if on_path.contains(&next) {
            continue;
        }
        path.push(next);
        on_path.insert(next);
        walk(graph, end, max_depth, path, on_path, found);
        path.pop();
        on_path.remove(&next);
    }
}

fn ids_for(graph: &CausalGraph, path: &[NodeIndex]) -> Vec<String> {
    path.iter()
        .filter_map(|&idx| graph.graph.node_weight(idx))
        .map(|node| node.id.clone())
        .collect()
}

/// Enumerate causal chains between candidate origins and terminals.
///
/// `from`/`to` default to every root candidate and every leaf node when
/// unspecified. Same-node pairs are skipped. Each surviving path is
/// resolved into a [`CausalChain`]; a path whose consecutive pair has no
/// edge in the store is dropped, as is any chain whose confidence product
/// falls below `min_confidence`. Chains come back sorted by
/// `total_confidence`, highest first.
#[must_use]
pub fn find_causal_chains(
    graph: &CausalGraph,
    from: Option<&str>,
    to: Option<&str>,
    min_confidence: f64,
) -> Vec<CausalChain> {
    let starts: Vec<String> =
        from.map_or_else(|| super::root_candidates(graph), |id| vec![id.to_string()]);
    let ends: Vec<String> =
        to.map_or_else(|| super::leaf_nodes(graph), |id| vec![id.to_string()]);

    let mut chains: Vec<CausalChain> = Vec::new();
    for start in &starts {
        for end in &ends {
            if start == end {
                continue;
            }
            for path in find_paths(graph, start, end, MAX_PATH_DEPTH) {
                let Some(chain) = chain_from_path(graph, &path) else {
                    continue;
                };
                if chain.total_confidence >= min_confidence {
                    chains.push(chain);
                }
            }
        }
    }

    chains.sort_by(|a, b| b.total_confidence.total_cmp(&a.total_confidence));
    debug!(
        origins = starts.len(),
        terminals = ends.len(),
        chains = chains.len(),
        "assembled causal chains"
    );
    chains
}

fn chain_from_path(graph: &CausalGraph, path: &[String]) -> Option<CausalChain> {
    let mut edges = Vec::with_capacity(path.len().saturating_sub(1));
    for pair in path.windows(2) {
        edges.push(graph.edge_between(&pair[0], &pair[1])?.clone());
    }
    Some(CausalChain::from_links(path.to_vec(), edges))
}

#[cfg(test)]
mod tests {
    use super::{find_causal_chains, find_paths, MAX_PATH_DEPTH};
    use crate::store::CausalGraph;
    use faultline_core::model::{CausalEdge, EdgeKind};

    fn make_graph(edges: &[(&str, &str, f64)]) -> CausalGraph {
        let mut graph = CausalGraph::new();
        for (source, target, confidence) in edges {
            graph.add_edge(CausalEdge::new(
                *source,
                *target,
                EdgeKind::Causes,
                *confidence,
            ));
        }
        graph
    }

    #[test]
    fn diamond_yields_both_paths() {
        let graph = make_graph(&[
            ("a", "b", 0.6),
            ("a", "c", 0.6),
            ("b", "d", 0.6),
            ("c", "d", 0.6),
        ]);

        let mut paths = find_paths(&graph, "a", "d", MAX_PATH_DEPTH);
        paths.sort();
        assert_eq!(
            paths,
            vec![
                vec!["a".to_string(), "b".to_string(), "d".to_string()],
                vec!["a".to_string(), "c".to_string(), "d".to_string()],
            ]
        );
    }

    #[test]
    fn depth_bound_prunes_long_paths() {
        // a -> n0 -> n1 -> n2 -> z is 4 hops.
        let graph = make_graph(&[
            ("a", "n0", 0.9),
            ("n0", "n1", 0.9),
            ("n1", "n2", 0.9),
            ("n2", "z", 0.9),
        ]);

        assert_eq!(find_paths(&graph, "a", "z", 4).len(), 1);
        assert!(find_paths(&graph, "a", "z", 3).is_empty());
    }

    #[test]
    fn cycles_do_not_trap_the_search() {
        let graph = make_graph(&[("a", "b", 0.6), ("b", "a", 0.6), ("b", "c", 0.6)]);
        let paths = find_paths(&graph, "a", "c", MAX_PATH_DEPTH);
        assert_eq!(paths, vec![vec!["a".to_string(), "b".to_string(), "c".to_string()]]);
    }

    #[test]
    fn unknown_endpoint_yields_nothing() {
        let graph = make_graph(&[("a", "b", 0.6)]);
        assert!(find_paths(&graph, "a", "zzz", MAX_PATH_DEPTH).is_empty());
        assert!(find_paths(&graph, "zzz", "b", MAX_PATH_DEPTH).is_empty());
    }

    #[test]
    fn chain_confidence_is_the_edge_product() {
        let graph = make_graph(&[("a", "b", 0.6), ("b", "c", 0.5)]);
        let chains = find_causal_chains(&graph, None, None, 0.0);
        assert_eq!(chains.len(), 1);
        assert_eq!(chains[0].nodes, vec!["a", "b", "c"]);
        assert!((chains[0].total_confidence - 0.3).abs() < 1e-9);
    }

    #[test]
    fn low_confidence_chains_are_discarded() {
        let graph = make_graph(&[("a", "b", 0.6), ("b", "c", 0.5)]);
        assert_eq!(find_causal_chains(&graph, None, None, 0.31).len(), 0);
        assert_eq!(find_causal_chains(&graph, None, None, 0.30).len(), 1);
    }

    #[test]
    fn chains_sort_by_confidence_descending() {
        // Two disjoint chains with different products.
        let graph = make_graph(&[("a", "b", 0.9), ("x", "y", 0.4)]);
        let chains = find_causal_chains(&graph, None, None, 0.0);
        assert_eq!(chains.len(), 2);
        assert_eq!(chains[0].nodes, vec!["a", "b"]);
        assert_eq!(chains[1].nodes, vec!["x", "y"]);
    }

    #[test]
    fn explicit_endpoints_override_roots_and_leaves() {
        let graph = make_graph(&[("a", "b", 0.6), ("b", "c", 0.5)]);
        let chains = find_causal_chains(&graph, Some("b"), Some("c"), 0.0);
        assert_eq!(chains.len(), 1);
        assert_eq!(chains[0].nodes, vec!["b", "c"]);
        assert!((chains[0].total_confidence - 0.5).abs() < 1e-9);
    }
}
