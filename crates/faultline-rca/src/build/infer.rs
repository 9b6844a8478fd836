//! Edge inference over a populated graph.
//!
//! Four independent rule sets each propose candidate edges; the union is
//! deduplicated by `(source, target, kind)` before insertion. Rules run in
//! a fixed order, so when two rules propose the same triple the earlier
//! rule's confidence stands.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::debug;

use faultline_core::config::BuilderConfig;
use faultline_core::model::{CausalEdge, CauseNode, EdgeKind, NodeKind};

use super::signatures::{
    signature, ErrorSignature, COMPONENT_DEPENDENCIES, HIGH_ERROR_RATE_ID, LOG_NODE_PREFIX,
};
use crate::store::CausalGraph;

const RULE_TABLE_CONFIDENCE: f64 = 0.6;
const TEMPORAL_SHARED_COMPONENT: f64 = 0.5;
const TEMPORAL_PARTIAL_COMPONENT: f64 = 0.4;
const TEMPORAL_BASE: f64 = 0.3;
const DEPENDENCY_CONFIDENCE: f64 = 0.5;
const AGGREGATION_CONFIDENCE: f64 = 0.7;

/// Run every inference rule and insert the deduplicated union into the
/// graph. Returns the number of edges inserted.
pub(crate) fn infer_edges(graph: &mut CausalGraph, config: &BuilderConfig) -> usize {
    let from_table = rule_table_edges(graph);
    let from_temporal = temporal_edges(graph, config.time_window_ms);
    let from_dependencies = dependency_edges(graph);
    let from_aggregation = aggregation_edges(graph);
    debug!(
        rule_table = from_table.len(),
        temporal = from_temporal.len(),
        dependency = from_dependencies.len(),
        aggregation = from_aggregation.len(),
        "collected candidate edges"
    );

    let mut seen: HashSet<(String, String, EdgeKind)> = HashSet::new();
    let mut inserted = 0;
    for edge in from_table
        .into_iter()
        .chain(from_temporal)
        .chain(from_dependencies)
        .chain(from_aggregation)
    {
        if seen.insert(edge.dedup_key()) {
            graph.add_edge(edge);
            inserted += 1;
        }
    }
    inserted
}

// ---------------------------------------------------------------------------
// Rule 1: signature cause tables
// ---------------------------------------------------------------------------

/// For every node backed by a known signature, link each of its listed
/// possible causes that is also present in the graph: cause → effect.
fn rule_table_edges(graph: &CausalGraph) -> Vec<CausalEdge> {
    let mut out = Vec::new();
    for node in graph.nodes() {
        let Some(sig) = signature_for_node(&node.id) else {
            continue;
        };
        for cause in sig.possible_causes {
            if let Some(cause_id) = resolve_signature_node(graph, cause) {
                out.push(
                    CausalEdge::new(cause_id, &node.id, EdgeKind::Causes, RULE_TABLE_CONFIDENCE)
                        .with_reasoning(format!("{cause} is a listed cause of {}", sig.name)),
                );
            }
        }
    }
    out
}

fn signature_for_node(id: &str) -> Option<&'static ErrorSignature> {
    let name = id.strip_prefix(LOG_NODE_PREFIX).unwrap_or(id);
    signature(name)
}

/// Find the node standing for a signature name, preferring the log-derived
/// id over a bare one supplied as an external event.
fn resolve_signature_node(graph: &CausalGraph, name: &str) -> Option<String> {
    let prefixed = format!("{LOG_NODE_PREFIX}{name}");
    if graph.contains_node(&prefixed) {
        return Some(prefixed);
    }
    graph.contains_node(name).then(|| name.to_string())
}

// ---------------------------------------------------------------------------
// Rule 2: temporal adjacency
// ---------------------------------------------------------------------------

/// Pair up timestamped nodes that fall within the window, sorted by time.
/// The edge runs from the later node to the earlier one: a fault that
/// surfaces on the heels of a symptom is treated as its upstream origin.
#[allow(clippy::cast_precision_loss)]
fn temporal_edges(graph: &CausalGraph, window_ms: f64) -> Vec<CausalEdge> {
    let mut stamped: Vec<(&CauseNode, DateTime<Utc>)> = graph
        .nodes()
        .filter_map(|node| node.timestamp.map(|ts| (node, ts)))
        .collect();
    stamped.sort_by_key(|&(_, ts)| ts);

    let mut out = Vec::new();
    for (i, &(earlier, earlier_ts)) in stamped.iter().enumerate() {
        for &(later, later_ts) in &stamped[i + 1..] {
            let delay_ms = (later_ts - earlier_ts).num_milliseconds() as f64;
            if delay_ms > window_ms {
                break;
            }
            out.push(
                CausalEdge::new(
                    &later.id,
                    &earlier.id,
                    EdgeKind::Precedes,
                    temporal_confidence(earlier, later),
                )
                .with_delay_ms(delay_ms)
                .with_reasoning(format!(
                    "{} surfaced {delay_ms:.0} ms after {}",
                    later.name, earlier.name
                )),
            );
        }
    }
    out
}

fn temporal_confidence(a: &CauseNode, b: &CauseNode) -> f64 {
    if a.component.is_empty() || b.component.is_empty() {
        TEMPORAL_PARTIAL_COMPONENT
    } else if a.component.eq_ignore_ascii_case(&b.component) {
        TEMPORAL_SHARED_COMPONENT
    } else {
        TEMPORAL_BASE
    }
}

// ---------------------------------------------------------------------------
// Rule 3: component dependencies
// ---------------------------------------------------------------------------

/// Failures flow from a dependency toward its dependents: every node
/// tagged with a dependency component contributes into every node tagged
/// with the dependent component.
fn dependency_edges(graph: &CausalGraph) -> Vec<CausalEdge> {
    let mut out = Vec::new();
    for &(dependent, dependencies) in COMPONENT_DEPENDENCIES {
        for &dependency in dependencies {
            for upstream in component_nodes(graph, dependency) {
                for downstream in component_nodes(graph, dependent) {
                    if upstream.id == downstream.id {
                        continue;
                    }
                    out.push(
                        CausalEdge::new(
                            &upstream.id,
                            &downstream.id,
                            EdgeKind::Contributes,
                            DEPENDENCY_CONFIDENCE,
                        )
                        .with_reasoning(format!("{dependent} depends on {dependency}")),
                    );
                }
            }
        }
    }
    out
}

fn component_nodes<'a>(
    graph: &'a CausalGraph,
    component: &'a str,
) -> impl Iterator<Item = &'a CauseNode> {
    graph
        .nodes()
        .filter(move |node| node.component.eq_ignore_ascii_case(component))
}

// ---------------------------------------------------------------------------
// Rule 4: error-rate aggregation
// ---------------------------------------------------------------------------

/// Every event node feeds the synthetic error-rate aggregate, when present.
fn aggregation_edges(graph: &CausalGraph) -> Vec<CausalEdge> {
    if !graph.contains_node(HIGH_ERROR_RATE_ID) {
        return Vec::new();
    }
    graph
        .nodes()
        .filter(|node| node.kind == NodeKind::Event && node.id != HIGH_ERROR_RATE_ID)
        .map(|node| {
            CausalEdge::new(
                &node.id,
                HIGH_ERROR_RATE_ID,
                EdgeKind::Contributes,
                AGGREGATION_CONFIDENCE,
            )
            .with_reasoning("error events feed the aggregate error rate")
        })
        .collect()
}
