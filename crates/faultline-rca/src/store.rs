//! Id-indexed causal graph store.
//!
//! # Overview
//!
//! [`CausalGraph`] owns every node and edge for one analysis run: a
//! [`petgraph`] directed graph holding the payloads, plus a map from node id
//! to `NodeIndex` so callers can work purely in string ids. It has no
//! algorithmic logic of its own; traversals live in [`crate::algo`].
//!
//! ## Contract
//!
//! - Adding a node whose id already exists replaces the stored node in
//!   place, preserving its position in snapshot order.
//! - Adding an edge whose endpoints are unknown synthesizes stub nodes
//!   first, so an edge insertion always succeeds.
//! - Lookups on unknown ids return `None`/empty rather than failing.
//! - [`CausalGraph::nodes`] and [`CausalGraph::edges`] iterate in insertion
//!   order, so snapshots and serialized output are stable.
//!
//! ## Content Hash
//!
//! [`CausalGraph::content_hash`] is a BLAKE3 hash of the sorted edge set.
//! Two runs that inferred the same relationships hash identically, which
//! makes recurring incidents recognizable from the result summary alone.

use std::collections::{HashMap, HashSet};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

use faultline_core::model::{CausalEdge, CauseNode};

// ---------------------------------------------------------------------------
// CausalGraph
// ---------------------------------------------------------------------------

/// The causal graph for a single analysis run.
///
/// Nodes are [`CauseNode`]s keyed by string id; edges are [`CausalEdge`]s.
/// Parallel edges between the same pair are allowed (they differ by kind);
/// the graph builder deduplicates exact `(source, target, kind)` repeats
/// before insertion.
#[derive(Debug, Default)]
pub struct CausalGraph {
    pub(crate) graph: DiGraph<CauseNode, CausalEdge>,
    pub(crate) node_map: HashMap<String, NodeIndex>,
}

impl CausalGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `node`, replacing any existing node with the same id.
    ///
    /// Replacement keeps the original insertion position, so the node count
    /// and snapshot order are unchanged.
    pub fn add_node(&mut self, node: CauseNode) {
        if let Some(&idx) = self.node_map.get(&node.id) {
            if let Some(slot) = self.graph.node_weight_mut(idx) {
                *slot = node;
            }
        } else {
            let id = node.id.clone();
            let idx = self.graph.add_node(node);
            self.node_map.insert(id, idx);
        }
    }

    /// Insert a directed edge. Unknown endpoints are synthesized as stub
    /// nodes (id as name, defaults elsewhere) before linking.
    pub fn add_edge(&mut self, edge: CausalEdge) {
        let source = self.ensure_node(&edge.source);
        let target = self.ensure_node(&edge.target);
        self.graph.add_edge(source, target, edge);
    }

    fn ensure_node(&mut self, id: &str) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(id) {
            idx
        } else {
            let idx = self.graph.add_node(CauseNode::stub(id));
            self.node_map.insert(id.to_string(), idx);
            idx
        }
    }

    #[must_use]
    pub fn node(&self, id: &str) -> Option<&CauseNode> {
        self.node_map
            .get(id)
            .and_then(|&idx| self.graph.node_weight(idx))
    }

    #[must_use]
    pub fn contains_node(&self, id: &str) -> bool {
        self.node_map.contains_key(id)
    }

    /// Look up the `NodeIndex` for a node id.
    #[must_use]
    pub fn node_index(&self, id: &str) -> Option<NodeIndex> {
        self.node_map.get(id).copied()
    }

    /// The first edge (in insertion order) from `source` to `target`,
    /// regardless of edge kind.
    ///
    /// When multiple kinds link the same pair, the earliest inserted one
    /// wins; chain reconstruction depends on this being stable.
    #[must_use]
    pub fn edge_between(&self, source: &str, target: &str) -> Option<&CausalEdge> {
        let from = self.node_index(source)?;
        let to = self.node_index(target)?;
        self.graph
            .edges_connecting(from, to)
            .min_by_key(petgraph::visit::EdgeRef::id)
            .map(|edge| edge.weight())
    }

    /// Ids of direct successors of `id`, deduplicated, or empty when the id
    /// is unknown.
    #[must_use]
    pub fn successors(&self, id: &str) -> Vec<&str> {
        self.neighbor_ids(id, Direction::Outgoing)
    }

    /// Ids of direct predecessors of `id`, deduplicated, or empty when the
    /// id is unknown.
    #[must_use]
    pub fn predecessors(&self, id: &str) -> Vec<&str> {
        self.neighbor_ids(id, Direction::Incoming)
    }

    fn neighbor_ids(&self, id: &str, direction: Direction) -> Vec<&str> {
        let Some(idx) = self.node_index(id) else {
            return Vec::new();
        };
        self.neighbor_indices(idx, direction)
            .into_iter()
            .filter_map(|n| self.graph.node_weight(n))
            .map(|node| node.id.as_str())
            .collect()
    }

    /// Neighbor indices in `direction`, with parallel-edge duplicates
    /// removed.
    pub(crate) fn neighbor_indices(&self, idx: NodeIndex, direction: Direction) -> Vec<NodeIndex> {
        let mut seen: HashSet<NodeIndex> = HashSet::new();
        self.graph
            .neighbors_directed(idx, direction)
            .filter(|&n| seen.insert(n))
            .collect()
    }

    /// Snapshot of all nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &CauseNode> {
        self.graph.node_weights()
    }

    /// Snapshot of all edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &CausalEdge> {
        self.graph.edge_weights()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.graph.node_weights().map(|node| node.id.as_str())
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// BLAKE3 hash of the sorted `(source, target, kind)` edge set.
    ///
    /// Derived from the sorted list rather than insertion order, so
    /// logically identical graphs hash identically no matter how they were
    /// assembled.
    #[must_use]
    pub fn content_hash(&self) -> String {
        let mut triples: Vec<(&str, &str, &str)> = self
            .graph
            .edge_references()
            .map(|edge| {
                let weight = edge.weight();
                (
                    weight.source.as_str(),
                    weight.target.as_str(),
                    weight.kind.as_str(),
                )
            })
            .collect();
        triples.sort_unstable();

        let mut hasher = blake3::Hasher::new();
        for (source, target, kind) in triples {
            hasher.update(source.as_bytes());
            hasher.update(b"\x00");
            hasher.update(target.as_bytes());
            hasher.update(b"\x00");
            hasher.update(kind.as_bytes());
            hasher.update(b"\x00");
        }
        format!("blake3:{}", hasher.finalize())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
