//! Cycle detection for causal graphs.
//!
//! A cycle in an inferred causal graph usually marks a feedback loop
//! (cascading failure risk) or an over-eager inference rule. Either way it
//! is data for the report, never an error: the engine keeps working on
//! cyclic graphs, it just cannot topologically order their members.

use std::collections::HashSet;

use petgraph::graph::NodeIndex;
use petgraph::Direction;

use crate::store::CausalGraph;

/// Find cycles via iterative depth-first search with an explicit stack.
///
/// Each reported cycle is the ordered node sequence from the back-edge
/// target to the node that closed the loop. The search stops at the first
/// cycle per DFS root, so the list is not globally exhaustive: it answers
/// "is there feedback, and through which nodes", not "how many distinct
/// loops exist".
#[must_use]
pub fn detect_cycles(graph: &CausalGraph) -> Vec<Vec<String>> {
    let mut visited: HashSet<NodeIndex> = HashSet::new();
    let mut cycles: Vec<Vec<String>> = Vec::new();

    for root in graph.graph.node_indices() {
        if visited.contains(&root) {
            continue;
        }
        visited.insert(root);

        let mut path: Vec<NodeIndex> = vec![root];
        let mut on_path: HashSet<NodeIndex> = HashSet::from([root]);

        // Each frame: (node, its unique successors, cursor into them).
        let mut call_stack: Vec<(NodeIndex, Vec<NodeIndex>, usize)> = vec![(
            root,
            graph.neighbor_indices(root, Direction::Outgoing),
            0,
        )];
        let mut found: Option<Vec<String>> = None;

        while let Some(frame) = call_stack.last_mut() {
            if frame.2 < frame.1.len() {
                let next = frame.1[frame.2];
                frame.2 += 1;

                if on_path.contains(&next) {
                    // Back edge: the loop runs from `next` to the path end.
                    let start = path.iter().position(|&n| n == next).unwrap_or(0);
                    found = Some(ids_for(graph, &path[start..]));
                    break;
                }

                if visited.insert(next) {
                    path.push(next);
                    on_path.insert(next);
                    call_stack.push((
                        next,
                        graph.neighbor_indices(next, Direction::Outgoing),
                        0,
                    ));
                }
            } else {
                call_stack.pop();
                if let Some(done) = path.pop() {
                    on_path.remove(&done);
                }
            }
        }

        if let Some(cycle) = found {
            cycles.push(cycle);
        }
    }

    cycles
}

fn ids_for(graph: &CausalGraph, path: &[NodeIndex]) -> Vec<String> {
    path.iter()
        .filter_map(|&idx| graph.graph.node_weight(idx))
        .map(|node| node.id.clone())
        .collect()
}
