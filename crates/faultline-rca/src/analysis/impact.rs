//! Incident-wide impact rollup.
//!
//! Per-node blast radii ([`crate::algo::node_impact`]) are unioned across
//! every ranked root cause, then classified into a scope and severity:
//!
//! | condition                        | scope               | severity |
//! |----------------------------------|---------------------|----------|
//! | severity sum >= 15 or >= 3 comps | `system_wide`       | critical |
//! | severity sum >= 8 or >= 2 comps  | `multiple_services` | high     |
//! | severity sum >= 4                | `single_service`    | medium   |
//! | otherwise                        | `localized`         | low      |

use std::collections::BTreeSet;

use faultline_core::model::Severity;

use crate::algo::node_impact;
use crate::store::CausalGraph;

use super::result::{ImpactAssessment, ImpactScope, RankedCause};

/// Union the downstream footprints of all ranked causes and classify the
/// result. `None` when there are no ranked causes to start from.
pub(crate) fn assess_impact(
    graph: &CausalGraph,
    ranked: &[RankedCause],
) -> Option<ImpactAssessment> {
    if ranked.is_empty() {
        return None;
    }

    let mut affected: BTreeSet<String> = BTreeSet::new();
    for cause in ranked {
        if let Some(impact) = node_impact(graph, &cause.node_id) {
            affected.extend(impact.affected);
        }
    }

    let mut components: BTreeSet<String> = BTreeSet::new();
    let mut total_severity_score: u32 = 0;
    for id in &affected {
        if let Some(node) = graph.node(id) {
            if !node.component.is_empty() {
                components.insert(node.component.clone());
            }
            total_severity_score += node.severity.score();
        }
    }

    let (scope, severity) = classify(total_severity_score, components.len());
    Some(ImpactAssessment {
        scope,
        severity,
        affected_components: components.into_iter().collect(),
        affected_node_count: affected.len(),
        total_severity_score,
    })
}

const fn classify(total_severity_score: u32, component_count: usize) -> (ImpactScope, Severity) {
    if total_severity_score >= 15 || component_count >= 3 {
        (ImpactScope::SystemWide, Severity::Critical)
    } else if total_severity_score >= 8 || component_count >= 2 {
        (ImpactScope::MultipleServices, Severity::High)
    } else if total_severity_score >= 4 {
        (ImpactScope::SingleService, Severity::Medium)
    } else {
        (ImpactScope::Localized, Severity::Low)
    }
}

#[cfg(test)]
mod tests {
    use super::{assess_impact, classify};
    use crate::analysis::result::{ImpactScope, RankedCause};
    use crate::store::CausalGraph;
    use faultline_core::model::{CausalEdge, CauseNode, EdgeKind, NodeKind, Severity, SignalSource};

    fn node(id: &str, component: &str, severity: Severity) -> CauseNode {
        let mut n = CauseNode::new(id, id, NodeKind::Event, SignalSource::Log);
        n.component = component.to_string();
        n.severity = severity;
        n
    }

    fn cause(id: &str) -> RankedCause {
        RankedCause {
            node_id: id.to_string(),
            confidence: 0.5,
            impact_score: 0,
            affected_count: 0,
            evidence: None,
        }
    }

    fn link(graph: &mut CausalGraph, source: &str, target: &str) {
        graph.add_edge(CausalEdge::new(source, target, EdgeKind::Causes, 0.6));
    }

    #[test]
    fn no_causes_means_no_assessment() {
        let graph = CausalGraph::new();
        assert!(assess_impact(&graph, &[]).is_none());
    }

    #[test]
    fn single_component_moderate_severity_is_single_service() {
        let mut graph = CausalGraph::new();
        graph.add_node(node("root", "database", Severity::Critical));
        graph.add_node(node("a", "api", Severity::Medium));
        graph.add_node(node("b", "api", Severity::Medium));
        link(&mut graph, "root", "a");
        link(&mut graph, "a", "b");

        let assessment = assess_impact(&graph, &[cause("root")]).unwrap();
        assert_eq!(assessment.scope, ImpactScope::SingleService);
        assert_eq!(assessment.severity, Severity::Medium);
        assert_eq!(assessment.affected_components, vec!["api"]);
        assert_eq!(assessment.affected_node_count, 2);
        assert_eq!(assessment.total_severity_score, 4);
    }

    #[test]
    fn two_components_escalate_to_multiple_services() {
        let mut graph = CausalGraph::new();
        graph.add_node(node("root", "", Severity::Critical));
        graph.add_node(node("a", "api", Severity::Low));
        graph.add_node(node("b", "database", Severity::Low));
        link(&mut graph, "root", "a");
        link(&mut graph, "root", "b");

        let assessment = assess_impact(&graph, &[cause("root")]).unwrap();
        assert_eq!(assessment.scope, ImpactScope::MultipleServices);
        assert_eq!(assessment.severity, Severity::High);
        assert_eq!(assessment.affected_components, vec!["api", "database"]);
    }

    #[test]
    fn heavy_footprint_is_system_wide() {
        let mut graph = CausalGraph::new();
        graph.add_node(node("root", "", Severity::Critical));
        for i in 0..5 {
            let id = format!("svc{i}");
            graph.add_node(node(&id, "api", Severity::High));
            link(&mut graph, "root", &id);
        }

        let assessment = assess_impact(&graph, &[cause("root")]).unwrap();
        // Severity sum 15 trips the top tier even with one component.
        assert_eq!(assessment.scope, ImpactScope::SystemWide);
        assert_eq!(assessment.severity, Severity::Critical);
        assert_eq!(assessment.total_severity_score, 15);
    }

    #[test]
    fn overlapping_footprints_union_without_double_counting() {
        let mut graph = CausalGraph::new();
        graph.add_node(node("r1", "", Severity::High));
        graph.add_node(node("r2", "", Severity::High));
        graph.add_node(node("shared", "cache", Severity::Medium));
        link(&mut graph, "r1", "shared");
        link(&mut graph, "r2", "shared");

        let assessment = assess_impact(&graph, &[cause("r1"), cause("r2")]).unwrap();
        assert_eq!(assessment.affected_node_count, 1);
        assert_eq!(assessment.total_severity_score, 2);
        assert_eq!(assessment.scope, ImpactScope::Localized);
        assert_eq!(assessment.severity, Severity::Low);
    }

    #[test]
    fn untagged_nodes_do_not_count_as_components() {
        let mut graph = CausalGraph::new();
        graph.add_node(node("root", "", Severity::High));
        graph.add_node(node("a", "", Severity::Low));
        link(&mut graph, "root", "a");

        let assessment = assess_impact(&graph, &[cause("root")]).unwrap();
        assert!(assessment.affected_components.is_empty());
        assert_eq!(assessment.scope, ImpactScope::Localized);
    }

    #[test]
    fn tier_boundaries() {
        assert_eq!(classify(15, 0).0, ImpactScope::SystemWide);
        assert_eq!(classify(0, 3).0, ImpactScope::SystemWide);
        assert_eq!(classify(14, 2).0, ImpactScope::MultipleServices);
        assert_eq!(classify(8, 0).0, ImpactScope::MultipleServices);
        assert_eq!(classify(7, 1).0, ImpactScope::SingleService);
        assert_eq!(classify(4, 0).0, ImpactScope::SingleService);
        assert_eq!(classify(3, 1).0, ImpactScope::Localized);
    }
}
