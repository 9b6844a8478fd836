//! Root-cause candidate scoring.
//!
//! Candidates are the graph's root nodes (no incoming edges). Each one gets
//! a heuristic confidence built from what the node itself looks like:
//!
//! - base `0.5` for being a root at all
//! - node kind: root-cause `+0.2`, event `+0.1`
//! - severity: critical `+0.15`, high `+0.10`, medium `+0.05`
//! - recurrence: frequency over 10 `+0.10`, over 5 `+0.05`
//! - blast radius: over 5 affected nodes `+0.10`, over 2 `+0.05`
//! - corroboration: more than 2 evidence lines `+0.05`
//!
//! The sum is clamped to `1.0`. Ties in confidence break on the combined
//! impact score, larger first.

use faultline_core::model::{CauseNode, NodeKind, Severity};

use crate::algo::{self, node_impact, NodeImpact};
use crate::store::CausalGraph;

use super::result::RankedCause;

const BASE_CONFIDENCE: f64 = 0.5;

/// Score every root candidate and keep the strongest `max_root_causes`.
pub(crate) fn rank_root_causes(graph: &CausalGraph, max_root_causes: usize) -> Vec<RankedCause> {
    let mut ranked: Vec<RankedCause> = algo::root_candidates(graph)
        .into_iter()
        .filter_map(|id| {
            let node = graph.node(&id)?;
            let impact = node_impact(graph, &id)?;
            Some(score_candidate(node, &impact))
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.confidence
            .total_cmp(&a.confidence)
            .then_with(|| b.impact_score.cmp(&a.impact_score))
    });
    ranked.truncate(max_root_causes);
    ranked
}

fn score_candidate(node: &CauseNode, impact: &NodeImpact) -> RankedCause {
    let mut confidence = BASE_CONFIDENCE;

    confidence += match node.kind {
        NodeKind::RootCause => 0.2,
        NodeKind::Event => 0.1,
        NodeKind::Symptom
        | NodeKind::State
        | NodeKind::Condition
        | NodeKind::Action
        | NodeKind::Component => 0.0,
    };
    confidence += match node.severity {
        Severity::Critical => 0.15,
        Severity::High => 0.10,
        Severity::Medium => 0.05,
        Severity::Low | Severity::None => 0.0,
    };
    confidence += if node.frequency > 10 {
        0.10
    } else if node.frequency > 5 {
        0.05
    } else {
        0.0
    };

    let affected_count = impact.affected_count();
    confidence += if affected_count > 5 {
        0.10
    } else if affected_count > 2 {
        0.05
    } else {
        0.0
    };

    if node.evidence.len() > 2 {
        confidence += 0.05;
    }

    RankedCause {
        node_id: node.id.clone(),
        confidence: confidence.min(1.0),
        impact_score: impact.combined_score(),
        affected_count,
        evidence: node.first_evidence().map(str::to_string),
    }
}
