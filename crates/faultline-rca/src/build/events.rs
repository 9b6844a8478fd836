//! Node extraction from explicit, externally supplied events.
//!
//! Events map field-for-field onto nodes. Classification strings are
//! parsed leniently so a misbehaving upstream cannot fail the batch.

use tracing::{debug, warn};

use faultline_core::model::{CauseNode, ExternalEvent, NodeKind, Severity, SignalSource};

/// Convert events into nodes, up to `max_nodes`. Events with a blank id
/// are skipped with a warning; everything else is accepted.
pub(crate) fn extract_event_nodes(events: &[ExternalEvent], max_nodes: usize) -> Vec<CauseNode> {
    let mut nodes: Vec<CauseNode> = Vec::new();

    for event in events {
        if nodes.len() >= max_nodes {
            break;
        }
        let id = event.id.trim();
        if id.is_empty() {
            warn!(name = %event.name, "skipping event with empty id");
            continue;
        }

        let name = if event.name.trim().is_empty() {
            id
        } else {
            event.name.trim()
        };
        let mut node = CauseNode::new(
            id,
            name,
            NodeKind::parse_lenient(&event.kind),
            SignalSource::Event,
        );
        node.description = event.description.clone();
        node.timestamp = event.timestamp;
        node.severity = Severity::parse_lenient(&event.severity);
        node.component = if event.component.trim().is_empty() {
            event.service.trim().to_string()
        } else {
            event.component.trim().to_string()
        };
        for snippet in &event.evidence {
            node.push_evidence(snippet.clone());
        }
        let service = event.service.trim();
        if !service.is_empty() && service != node.component {
            node.metadata
                .insert("service".to_string(), service.to_string());
        }

        nodes.push(node);
    }

    let dropped = events.len().saturating_sub(nodes.len());
    if dropped > 0 {
        debug!(dropped, "event budget reached or ids missing");
    }
    nodes
}
