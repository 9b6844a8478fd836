//! Forward reachability and blast-radius scoring for a single node.

use std::collections::{HashSet, VecDeque};

use petgraph::Direction;
use serde::{Deserialize, Serialize};

use crate::store::CausalGraph;

/// Depth cap on the forward reachability walk. Bounds pathological fan-out
/// on dense graphs.
pub const MAX_IMPACT_DEPTH: usize = 20;

/// Coarse blast-radius classification derived from [`NodeImpact`] scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactLevel {
    None,
    Low,
    Medium,
    High,
    Critical,
}

impl ImpactLevel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    /// Threshold the combined score (`affected * 2 + severity`).
    #[must_use]
    pub const fn from_combined_score(combined: u32) -> Self {
        match combined {
            0 => Self::None,
            1..=4 => Self::Low,
            5..=9 => Self::Medium,
            10..=19 => Self::High,
            _ => Self::Critical,
        }
    }
}

/// Downstream footprint of one node: everything it can reach within
/// [`MAX_IMPACT_DEPTH`] hops, plus severity-weighted scoring over that set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeImpact {
    pub origin: String,
    /// Reachable node ids, origin excluded, sorted for stable output.
    pub affected: Vec<String>,
    /// Sum of severity scores over the affected set.
    pub severity_score: u32,
    pub level: ImpactLevel,
}

impl NodeImpact {
    #[must_use]
    pub fn affected_count(&self) -> usize {
        self.affected.len()
    }

    /// `affected * 2 + severity`, the input to [`ImpactLevel::from_combined_score`].
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn combined_score(&self) -> u32 {
        (self.affected.len() as u32) * 2 + self.severity_score
    }
}

/// Walk forward from `node_id` and score the reachable set.
///
/// Returns `None` when the node is absent. Depth is counted in hops from
/// the origin; nodes past [`MAX_IMPACT_DEPTH`] are not collected.
#[must_use]
pub fn node_impact(graph: &CausalGraph, node_id: &str) -> Option<NodeImpact> {
    let origin = graph.node_index(node_id)?;

    let mut visited = HashSet::from([origin]);
    let mut queue = VecDeque::from([(origin, 0usize)]);
    let mut affected: Vec<String> = Vec::new();
    let mut severity_score: u32 = 0;

    while let Some((current, depth)) = queue.pop_front() {
        if depth >= MAX_IMPACT_DEPTH {
            continue;
        }
        for next in graph.neighbor_indices(current, Direction::Outgoing) {
            if !visited.insert(next) {
                continue;
            }
            if let Some(node) = graph.graph.node_weight(next) {
                affected.push(node.id.clone());
                severity_score += node.severity.score();
            }
            queue.push_back((next, depth + 1));
        }
    }

    affected.sort_unstable();
    let mut impact = NodeImpact {
        origin: node_id.to_owned(),
        affected,
        severity_score,
        level: ImpactLevel::None,
    };
    impact.level = ImpactLevel::from_combined_score(impact.combined_score());
    Some(impact)
}
