//! Optional external refinement of the rule-based analysis.
//!
//! The engine can hand a bounded summary of the causal graph to a
//! free-text reasoning service and merge whatever structured refinement
//! comes back. The call is best-effort end to end: every failure mode is
//! recovered by the caller and the rule-based result stands unchanged.
//!
//! [`Reasoner`] is the seam. [`http::HttpReasoner`] talks to a real
//! service; [`mock::MockReasoner`] replays canned payloads for tests.

pub mod extract;
pub mod http;
pub mod mock;

pub use http::HttpReasoner;
pub use mock::MockReasoner;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use faultline_core::config::ReasonConfig;
use faultline_core::error::ErrorCode;
use faultline_core::model::{EdgeKind, NodeKind, Severity};

use crate::store::CausalGraph;

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// Node digest sent to the reasoning service. A strict subset of
/// [`faultline_core::model::CauseNode`], small enough to keep the payload
/// bounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDigest {
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
    pub severity: Severity,
    pub frequency: u32,
    pub component: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeDigest {
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
    pub confidence: f64,
}

/// One ranked root-cause candidate, as the engine scored it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateDigest {
    pub node_id: String,
    pub name: String,
    pub confidence: f64,
}

/// The bounded graph summary handed to a reasoning service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasonRequest {
    pub nodes: Vec<NodeDigest>,
    pub edges: Vec<EdgeDigest>,
    pub root_candidates: Vec<CandidateDigest>,
    pub analysis_goal: String,
}

impl ReasonRequest {
    /// Digest `graph` down to the configured node/edge bounds, in snapshot
    /// order. Anything past the bounds is dropped rather than summarized
    /// further.
    #[must_use]
    pub fn from_graph(
        graph: &CausalGraph,
        root_candidates: Vec<CandidateDigest>,
        config: &ReasonConfig,
    ) -> Self {
        let nodes = graph
            .nodes()
            .take(config.max_summary_nodes)
            .map(|node| NodeDigest {
                id: node.id.clone(),
                name: node.name.clone(),
                kind: node.kind,
                severity: node.severity,
                frequency: node.frequency,
                component: node.component.clone(),
            })
            .collect();
        let edges = graph
            .edges()
            .take(config.max_summary_edges)
            .map(|edge| EdgeDigest {
                source: edge.source.clone(),
                target: edge.target.clone(),
                kind: edge.kind,
                confidence: edge.confidence,
            })
            .collect();
        Self {
            nodes,
            edges,
            root_candidates,
            analysis_goal: config.analysis_goal.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// The service's verdict on one node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CauseJudgment {
    pub node_id: String,
    pub name: String,
    pub confidence: f64,
    pub reasoning: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefinedImpact {
    pub scope: String,
    pub severity: String,
    pub affected_components: Vec<String>,
    pub business_impact: String,
}

/// Structured refinement returned by the reasoning service.
///
/// Every field defaults so a partial response still deserializes; the
/// engine merges only what is present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Refinement {
    pub primary_root_cause: Option<CauseJudgment>,
    pub secondary_root_causes: Vec<CauseJudgment>,
    pub propagation_path: String,
    pub impact_assessment: Option<RefinedImpact>,
    pub recommendations: Vec<String>,
    pub overall_confidence: Option<f64>,
}

impl Refinement {
    /// A refinement carrying no usable content is not worth merging.
    #[must_use]
    pub fn is_vacuous(&self) -> bool {
        self.primary_root_cause.is_none()
            && self.secondary_root_causes.is_empty()
            && self.propagation_path.is_empty()
            && self.impact_assessment.is_none()
            && self.recommendations.is_empty()
            && self.overall_confidence.is_none()
    }
}

// ---------------------------------------------------------------------------
// Errors and the seam
// ---------------------------------------------------------------------------

/// Failure modes of a refinement attempt. All of them are recovered by
/// the analysis engine; none aborts a pipeline run.
#[derive(Debug, Error)]
pub enum ReasonError {
    #[error("external reasoner is disabled")]
    Disabled,
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("reasoner rejected the request with HTTP {status}")]
    Rejected { status: u16, body: String },
    #[error("no structured refinement found in the response")]
    Malformed,
    #[error("retries exhausted: {0}")]
    Exhausted(String),
}

impl ReasonError {
    /// Stable machine-readable code for this failure.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Disabled => ErrorCode::ReasonerDisabled,
            Self::Transport(_) => ErrorCode::ReasonerTransport,
            Self::Rejected { .. } => ErrorCode::ReasonerRejected,
            Self::Malformed => ErrorCode::ReasonerMalformed,
            Self::Exhausted(_) => ErrorCode::ReasonerExhausted,
        }
    }
}

/// The refinement seam the engine depends on.
pub trait Reasoner: std::fmt::Debug + Send + Sync {
    /// Submit a graph summary and return the service's refinement.
    fn refine(&self, request: &ReasonRequest) -> Result<Refinement, ReasonError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use faultline_core::model::{CausalEdge, CauseNode};

    #[test]
    fn request_respects_summary_bounds() {
        let mut graph = CausalGraph::new();
        for i in 0..10 {
            graph.add_node(CauseNode::stub(&format!("n{i}")));
        }
        for i in 0..9 {
            graph.add_edge(CausalEdge::new(
                format!("n{i}"),
                format!("n{}", i + 1),
                EdgeKind::Causes,
                0.6,
            ));
        }

        let config = ReasonConfig {
            max_summary_nodes: 4,
            max_summary_edges: 3,
            ..ReasonConfig::default()
        };
        let request = ReasonRequest::from_graph(&graph, Vec::new(), &config);

        assert_eq!(request.nodes.len(), 4);
        assert_eq!(request.edges.len(), 3);
        assert_eq!(request.nodes[0].id, "n0");
        assert_eq!(request.edges[0].source, "n0");
    }

    #[test]
    fn partial_refinement_deserializes() {
        let refinement: Refinement =
            serde_json::from_str(r#"{"recommendations": ["restart the pool"]}"#).unwrap();
        assert_eq!(refinement.recommendations, vec!["restart the pool"]);
        assert!(refinement.primary_root_cause.is_none());
        assert!(!refinement.is_vacuous());
    }

    #[test]
    fn empty_object_is_vacuous() {
        let refinement: Refinement = serde_json::from_str("{}").unwrap();
        assert!(refinement.is_vacuous());
    }

    #[test]
    fn error_codes_map_one_to_one() {
        assert_eq!(ReasonError::Disabled.code(), ErrorCode::ReasonerDisabled);
        assert_eq!(
            ReasonError::Transport(String::new()).code(),
            ErrorCode::ReasonerTransport
        );
        assert_eq!(
            ReasonError::Rejected {
                status: 401,
                body: String::new()
            }
            .code(),
            ErrorCode::ReasonerRejected
        );
        assert_eq!(ReasonError::Malformed.code(), ErrorCode::ReasonerMalformed);
        assert_eq!(
            ReasonError::Exhausted(String::new()).code(),
            ErrorCode::ReasonerExhausted
        );
    }
}
