//! Heuristic graph construction from raw failure signals.
//!
//! # Pipeline
//!
//! ```text
//!   log text ──► logs::extract_log_nodes ──────────────┐
//!   requests ──► requests::extract_request_nodes ──────┼──► CausalGraph
//!   events ────► events::extract_event_nodes ──────────┘         │
//!                                                                ▼
//!                                                      infer::infer_edges
//! ```
//!
//! Node extraction is budgeted: half of `max_nodes` goes to log-derived
//! nodes, half to request-derived nodes, and explicit events fill whatever
//! head-room remains. Edge inference then runs the rule sets in
//! [`infer`] over the populated graph.

pub(crate) mod events;
pub(crate) mod infer;
pub(crate) mod logs;
pub(crate) mod requests;
pub mod signatures;

pub use signatures::{ErrorSignature, COMPONENT_DEPENDENCIES, ERROR_SIGNATURES};

use tracing::{debug, instrument};

use faultline_core::config::BuilderConfig;
use faultline_core::model::SignalBatch;

use crate::store::CausalGraph;

/// Turns a [`SignalBatch`] into a populated [`CausalGraph`].
///
/// Stateless between runs; one builder may serve any number of batches.
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    config: BuilderConfig,
}

impl GraphBuilder {
    #[must_use]
    pub fn new(config: BuilderConfig) -> Self {
        Self { config }
    }

    /// Extract nodes from every signal source, then infer edges.
    ///
    /// Never fails: an empty or unusable batch simply yields an empty
    /// graph.
    #[instrument(skip(self, batch))]
    #[must_use]
    pub fn build(&self, batch: &SignalBatch) -> CausalGraph {
        let mut graph = CausalGraph::new();
        let per_source = self.config.max_nodes / 2;

        if let Some(log_content) = batch.log_content.as_deref() {
            for node in logs::extract_log_nodes(log_content, per_source) {
                graph.add_node(node);
            }
        }
        for node in requests::extract_request_nodes(&batch.requests, &self.config, per_source) {
            graph.add_node(node);
        }
        let remaining = self.config.max_nodes.saturating_sub(graph.node_count());
        for node in events::extract_event_nodes(&batch.events, remaining) {
            graph.add_node(node);
        }

        let inferred = infer::infer_edges(&mut graph, &self.config);
        debug!(
            nodes = graph.node_count(),
            edges = inferred,
            hash = %graph.content_hash(),
            "built causal graph"
        );
        graph
    }
}
