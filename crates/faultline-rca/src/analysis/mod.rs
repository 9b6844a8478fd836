//! Pipeline orchestration: signal batch in, [`AnalysisResult`] out.
//!
//! A run moves through fixed stages:
//!
//! ```text
//! Idle → Building → RootCauseRanking → ChainSelection → ImpactAssessment
//!      → ExternalRefinement (optional) → Done
//! ```
//!
//! Stages execute synchronously in order. A graph with zero nodes halts at
//! Building and yields [`AnalysisResult::empty`]. The refinement stage runs
//! only when a [`Reasoner`] is attached, and its failure never disturbs the
//! rule-based result computed by the earlier stages.

pub mod impact;
pub mod rank;
pub mod result;

pub use result::{AnalysisResult, ImpactAssessment, ImpactScope, RankedCause};

use tracing::{debug, instrument, warn};

use faultline_core::config::EngineConfig;
use faultline_core::model::{CausalChain, SignalBatch};

use crate::algo::{self, GraphSummary};
use crate::build::GraphBuilder;
use crate::reason::{
    CandidateDigest, HttpReasoner, ReasonError, ReasonRequest, Reasoner, Refinement,
};
use crate::store::CausalGraph;

/// Pipeline phases, in execution order. Emitted as a tracing field so log
/// lines can be tied to the phase that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// No run in progress.
    Idle,
    Building,
    RootCauseRanking,
    ChainSelection,
    ImpactAssessment,
    ExternalRefinement,
    Done,
}

impl Stage {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Building => "building",
            Self::RootCauseRanking => "root_cause_ranking",
            Self::ChainSelection => "chain_selection",
            Self::ImpactAssessment => "impact_assessment",
            Self::ExternalRefinement => "external_refinement",
            Self::Done => "done",
        }
    }
}

/// Runs the analysis pipeline over a [`SignalBatch`] or a pre-built graph.
///
/// Stateless across runs; every call allocates its own graph, so one engine
/// can serve concurrent callers behind a shared reference.
#[derive(Debug)]
pub struct AnalysisEngine {
    config: EngineConfig,
    reasoner: Option<Box<dyn Reasoner>>,
}

impl AnalysisEngine {
    /// Engine from configuration alone. An HTTP refinement backend is
    /// attached when `config.reason` enables one; a backend that cannot be
    /// constructed degrades the engine to rule-based analysis instead of
    /// failing it.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        let reasoner: Option<Box<dyn Reasoner>> = match HttpReasoner::from_config(&config.reason) {
            Ok(backend) => Some(Box::new(backend)),
            Err(ReasonError::Disabled) => None,
            Err(err) => {
                warn!(code = %err.code(), error = %err, "refinement backend unavailable");
                None
            }
        };
        Self { config, reasoner }
    }

    /// Engine with an explicit refinement backend, bypassing configuration.
    #[must_use]
    pub fn with_reasoner(config: EngineConfig, reasoner: Box<dyn Reasoner>) -> Self {
        Self {
            config,
            reasoner: Some(reasoner),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Build a causal graph from `batch` and analyze it.
    #[instrument(skip(self, batch))]
    #[must_use]
    pub fn analyze(&self, batch: &SignalBatch) -> AnalysisResult {
        debug!(stage = Stage::Building.as_str(), "building causal graph");
        let graph = GraphBuilder::new(self.config.builder.clone()).build(batch);
        self.analyze_graph(&graph)
    }

    /// Analyze a graph that was built elsewhere.
    #[instrument(skip(self, graph))]
    #[must_use]
    pub fn analyze_graph(&self, graph: &CausalGraph) -> AnalysisResult {
        let summary = GraphSummary::compute(graph);
        if graph.node_count() == 0 {
            debug!(stage = Stage::Building.as_str(), "graph is empty, halting");
            return AnalysisResult::empty(summary);
        }
        if summary.is_flat() {
            debug!("graph has no edges, every node is a root candidate");
        }

        debug!(
            stage = Stage::RootCauseRanking.as_str(),
            "ranking root candidates"
        );
        let root_causes = rank::rank_root_causes(graph, self.config.analysis.max_root_causes);

        debug!(
            stage = Stage::ChainSelection.as_str(),
            "selecting causal chains"
        );
        let mut chains = algo::find_causal_chains(
            graph,
            None,
            None,
            self.config.analysis.min_chain_confidence,
        );
        chains.truncate(self.config.analysis.max_chains);

        debug!(stage = Stage::ImpactAssessment.as_str(), "assessing impact");
        let impact = impact::assess_impact(graph, &root_causes);
        let feedback_loops = algo::detect_cycles(graph);

        let recommendations =
            rule_recommendations(graph, &root_causes, impact.as_ref(), &feedback_loops);
        let reasoning = narrative(&root_causes, &chains, impact.as_ref());
        let mut result = AnalysisResult {
            primary_root_cause: root_causes.first().map(|cause| cause.node_id.clone()),
            overall_confidence: root_causes.first().map_or(0.0, |cause| cause.confidence),
            reasoning,
            recommendations,
            root_causes,
            chains,
            impact,
            feedback_loops,
            graph: summary,
        };

        if let Some(reasoner) = self.reasoner.as_deref() {
            debug!(
                stage = Stage::ExternalRefinement.as_str(),
                "requesting refinement"
            );
            let request = ReasonRequest::from_graph(
                graph,
                candidate_digests(graph, &result.root_causes),
                &self.config.reason,
            );
            match reasoner.refine(&request) {
                Ok(refinement) => merge_refinement(&mut result, refinement),
                Err(err) => {
                    warn!(
                        code = %err.code(),
                        error = %err,
                        "refinement failed, keeping rule-based result"
                    );
                }
            }
        }

        debug!(
            stage = Stage::Done.as_str(),
            root_causes = result.root_causes.len(),
            chains = result.chains.len(),
            loops = result.feedback_loops.len(),
            "analysis complete"
        );
        result
    }
}

fn candidate_digests(graph: &CausalGraph, ranked: &[RankedCause]) -> Vec<CandidateDigest> {
    ranked
        .iter()
        .map(|cause| CandidateDigest {
            node_id: cause.node_id.clone(),
            name: graph
                .node(&cause.node_id)
                .map_or_else(|| cause.node_id.clone(), |node| node.name.clone()),
            confidence: cause.confidence,
        })
        .collect()
}

/// Rule-based reasoning text. Overwritten when a refinement supplies a
/// better one.
fn narrative(
    root_causes: &[RankedCause],
    chains: &[CausalChain],
    impact: Option<&ImpactAssessment>,
) -> String {
    let Some(top) = root_causes.first() else {
        return "Every node has an upstream edge, so no root-cause candidate stands out."
            .to_string();
    };
    let chain_part = chains.first().map_or_else(String::new, |chain| {
        format!(
            " The critical path covers {} node(s) at confidence {:.2}.",
            chain.nodes.len(),
            chain.total_confidence
        )
    });
    let impact_part = impact.map_or_else(String::new, |assessment| {
        format!(
            " Impact is {} across {} affected node(s).",
            assessment.scope.as_str(),
            assessment.affected_node_count
        )
    });
    format!(
        "Ranked {} root-cause candidate(s); the strongest is '{}' at confidence {:.2}.{chain_part}{impact_part}",
        root_causes.len(),
        top.node_id,
        top.confidence
    )
}

/// Rule-based next actions derived from the verdict. Replaced wholesale
/// when a refinement brings its own recommendation list.
fn rule_recommendations(
    graph: &CausalGraph,
    root_causes: &[RankedCause],
    impact: Option<&ImpactAssessment>,
    feedback_loops: &[Vec<String>],
) -> Vec<String> {
    let mut recommendations = Vec::new();
    if let Some(top) = root_causes.first() {
        let name = graph
            .node(&top.node_id)
            .map_or(top.node_id.as_str(), |node| node.name.as_str());
        recommendations.push(format!(
            "Investigate '{name}' first; it has no upstream cause in the graph and ranks highest."
        ));
    }
    if let Some(assessment) = impact {
        if assessment.affected_components.len() > 1 {
            recommendations.push(format!(
                "Coordinate across {}; the fault crosses component boundaries.",
                assessment.affected_components.join(", ")
            ));
        }
    }
    if !feedback_loops.is_empty() {
        recommendations.push(
            "Check for retry or restart storms; the graph contains a feedback loop.".to_string(),
        );
    }
    recommendations
}

/// Fold a refinement into the rule-based result. Only the narrative fields
/// are overwritten; ranked causes, chains, and the structured impact stay
/// heuristic. Secondary causes and the refined impact block arrive for
/// context and are not merged.
fn merge_refinement(result: &mut AnalysisResult, refinement: Refinement) {
    if refinement.is_vacuous() {
        debug!("refinement carried no content, keeping rule-based result");
        return;
    }
    if let Some(primary) = refinement.primary_root_cause {
        if !primary.node_id.is_empty() {
            result.primary_root_cause = Some(primary.node_id);
        }
        if !primary.reasoning.is_empty() {
            result.reasoning = primary.reasoning;
        }
    }
    let path = refinement.propagation_path.trim();
    if !path.is_empty() {
        result.reasoning.push_str(" Propagation: ");
        result.reasoning.push_str(path);
    }
    if !refinement.recommendations.is_empty() {
        result.recommendations = refinement.recommendations;
    }
    if let Some(confidence) = refinement.overall_confidence {
        result.overall_confidence = confidence.clamp(0.0, 1.0);
    }
    debug!("merged external refinement");
}
