//! Output types for a completed analysis run.

use serde::{Deserialize, Serialize};

use faultline_core::model::{CausalChain, Severity};

use crate::algo::GraphSummary;

/// One root-cause candidate with its heuristic score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCause {
    pub node_id: String,
    /// Heuristic confidence in `[0.0, 1.0]`.
    pub confidence: f64,
    /// Combined downstream impact score for the candidate node.
    pub impact_score: u32,
    /// Number of nodes reachable downstream of the candidate.
    pub affected_count: usize,
    /// First recorded evidence line, when the node carries any.
    pub evidence: Option<String>,
}

/// How far an incident reaches across the deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactScope {
    SystemWide,
    MultipleServices,
    SingleService,
    Localized,
}

impl ImpactScope {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SystemWide => "system_wide",
            Self::MultipleServices => "multiple_services",
            Self::SingleService => "single_service",
            Self::Localized => "localized",
        }
    }
}

/// Blast radius aggregated over every ranked root cause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactAssessment {
    pub scope: ImpactScope,
    pub severity: Severity,
    /// Component tags seen on affected nodes, sorted and deduplicated.
    pub affected_components: Vec<String>,
    /// Nodes downstream of at least one ranked cause.
    pub affected_node_count: usize,
    /// Sum of severity scores over the affected set.
    pub total_severity_score: u32,
}

/// Everything one analysis run produced.
///
/// `primary_root_cause`, `recommendations`, `reasoning`, and
/// `overall_confidence` start out rule-based and may be overwritten by an
/// external refinement when one is configured and answers sensibly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Candidates sorted by confidence, strongest first.
    pub root_causes: Vec<RankedCause>,
    /// Chains sorted by confidence product; the first one is the critical path.
    pub chains: Vec<CausalChain>,
    /// `None` when no candidate survived ranking.
    pub impact: Option<ImpactAssessment>,
    /// Cycles found in the graph, each as a closed node-id walk.
    pub feedback_loops: Vec<Vec<String>>,
    pub graph: GraphSummary,
    /// Node id of the strongest candidate.
    pub primary_root_cause: Option<String>,
    pub recommendations: Vec<String>,
    /// Narrative explanation of the verdict.
    pub reasoning: String,
    pub overall_confidence: f64,
}

impl AnalysisResult {
    /// Result for a graph with no nodes. Nothing to rank, so every
    /// collection is empty and the narrative says why.
    #[must_use]
    pub fn empty(graph: GraphSummary) -> Self {
        Self {
            root_causes: Vec::new(),
            chains: Vec::new(),
            impact: None,
            feedback_loops: Vec::new(),
            graph,
            primary_root_cause: None,
            recommendations: Vec::new(),
            reasoning: "No signals produced any graph nodes; there is nothing to analyze."
                .to_string(),
            overall_confidence: 0.0,
        }
    }

    /// Highest-confidence chain, when any survived selection.
    #[must_use]
    pub fn critical_path(&self) -> Option<&CausalChain> {
        self.chains.first()
    }
}

#[cfg(test)]
mod tests {
    use super::{AnalysisResult, ImpactScope};
    use crate::algo::GraphSummary;
    use crate::store::CausalGraph;

    #[test]
    fn empty_result_explains_itself() {
        let summary = GraphSummary::compute(&CausalGraph::new());
        let result = AnalysisResult::empty(summary);
        assert!(result.root_causes.is_empty());
        assert!(result.impact.is_none());
        assert!(result.reasoning.contains("nothing to analyze"));
        assert!(result.critical_path().is_none());
    }

    #[test]
    fn scope_serializes_snake_case() {
        let json = serde_json::to_string(&ImpactScope::MultipleServices).unwrap();
        assert_eq!(json, "\"multiple_services\"");
        assert_eq!(ImpactScope::SystemWide.as_str(), "system_wide");
    }
}
