use serde::{Deserialize, Serialize};

use super::edge::CausalEdge;

/// A propagation path from a candidate root cause to an observed symptom.
///
/// `nodes` holds the ordered node ids; `edges` holds the edge connecting
/// each consecutive pair, so `edges.len() == nodes.len() - 1` for any chain
/// with at least one hop. Chains are derived data: built once from the
/// graph, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CausalChain {
    pub nodes: Vec<String>,
    pub edges: Vec<CausalEdge>,
    /// Product of the confidences of every edge in the chain.
    pub total_confidence: f64,
    /// Sum of the `delay_ms` of every edge in the chain.
    pub total_delay_ms: f64,
}

impl CausalChain {
    /// Assemble a chain from an ordered node sequence and its connecting
    /// edges, computing the aggregate confidence and delay.
    #[must_use]
    pub fn from_links(nodes: Vec<String>, edges: Vec<CausalEdge>) -> Self {
        let total_confidence = edges.iter().map(|e| e.confidence).product();
        let total_delay_ms = edges.iter().map(|e| e.delay_ms).sum();
        Self {
            nodes,
            edges,
            total_confidence,
            total_delay_ms,
        }
    }

    /// Number of hops (edges) in the chain.
    #[must_use]
    pub fn hop_count(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The candidate root cause this chain starts from.
    #[must_use]
    pub fn origin(&self) -> Option<&str> {
        self.nodes.first().map(String::as_str)
    }

    /// The terminal symptom this chain ends at.
    #[must_use]
    pub fn terminal(&self) -> Option<&str> {
        self.nodes.last().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::CausalChain;
    use crate::model::edge::{CausalEdge, EdgeKind};

    #[test]
    fn confidence_is_product_of_edges() {
        let chain = CausalChain::from_links(
            vec!["a".into(), "b".into(), "c".into()],
            vec![
                CausalEdge::new("a", "b", EdgeKind::Causes, 0.6).with_delay_ms(100.0),
                CausalEdge::new("b", "c", EdgeKind::Precedes, 0.5).with_delay_ms(250.0),
            ],
        );
        assert!((chain.total_confidence - 0.3).abs() < 1e-9);
        assert!((chain.total_delay_ms - 350.0).abs() < 1e-9);
        assert_eq!(chain.hop_count(), 2);
        assert_eq!(chain.origin(), Some("a"));
        assert_eq!(chain.terminal(), Some("c"));
    }

    #[test]
    fn empty_chain_has_unit_confidence() {
        // Product over zero edges is 1.0; callers never surface hopless
        // chains but the arithmetic should stay well defined.
        let chain = CausalChain::from_links(vec!["solo".into()], vec![]);
        assert!((chain.total_confidence - 1.0).abs() < f64::EPSILON);
        assert_eq!(chain.hop_count(), 0);
    }
}
