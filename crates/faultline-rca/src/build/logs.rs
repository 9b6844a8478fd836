//! Node extraction from raw log text.
//!
//! Lines are matched case-insensitively against the signature table. The
//! first matching line per signature creates one aggregated node (id
//! `log_<signature>`); later matches increment `frequency` and append
//! evidence instead of creating duplicates.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDateTime, Utc};

use faultline_core::model::{CauseNode, SignalSource};

use super::signatures::{ERROR_SIGNATURES, LOG_NODE_PREFIX};

/// Extract aggregated signature nodes from newline-delimited log text.
///
/// At most `max_nodes` distinct signature nodes are created; lines that
/// would only create nodes past the cap are dropped, while lines matching
/// an already-created node still aggregate into it.
pub(crate) fn extract_log_nodes(log_content: &str, max_nodes: usize) -> Vec<CauseNode> {
    let mut nodes: Vec<CauseNode> = Vec::new();
    let mut slot_by_signature: HashMap<&'static str, usize> = HashMap::new();

    for line in log_content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let lowered = trimmed.to_lowercase();

        for sig in ERROR_SIGNATURES {
            if !sig.patterns.iter().any(|pattern| lowered.contains(pattern)) {
                continue;
            }
            if let Some(&slot) = slot_by_signature.get(sig.name) {
                let node = &mut nodes[slot];
                node.frequency += 1;
                node.push_evidence(trimmed);
                continue;
            }
            if slot_by_signature.len() >= max_nodes {
                continue;
            }

            let mut node = CauseNode::new(
                format!("{LOG_NODE_PREFIX}{}", sig.name),
                sig.name,
                sig.kind,
                SignalSource::Log,
            );
            node.description = format!("Log lines matching the {} signature", sig.name);
            node.severity = sig.severity;
            node.component = sig.component.to_string();
            node.timestamp = parse_line_timestamp(trimmed);
            node.push_evidence(trimmed);

            slot_by_signature.insert(sig.name, nodes.len());
            nodes.push(node);
        }
    }

    nodes
}

/// Parse a leading `YYYY-MM-DD HH:MM:SS` / `YYYY-MM-DDTHH:MM:SS` prefix,
/// with optional fractional seconds. Anything else yields `None`.
fn parse_line_timestamp(line: &str) -> Option<DateTime<Utc>> {
    let bytes = line.as_bytes();
    if bytes.len() < 19 {
        return None;
    }
    let shaped = bytes[4] == b'-'
        && bytes[7] == b'-'
        && (bytes[10] == b'T' || bytes[10] == b' ')
        && bytes[13] == b':'
        && bytes[16] == b':';
    if !shaped {
        return None;
    }

    let mut end = 19;
    if bytes.len() > end + 1 && bytes[end] == b'.' && bytes[end + 1].is_ascii_digit() {
        end += 1;
        while bytes.len() > end && bytes[end].is_ascii_digit() {
            end += 1;
        }
    }

    let format = if bytes[10] == b'T' {
        "%Y-%m-%dT%H:%M:%S%.f"
    } else {
        "%Y-%m-%d %H:%M:%S%.f"
    };
    // line.get: `end` may fall inside a multibyte char on garbage input.
    NaiveDateTime::parse_from_str(line.get(..end)?, format)
        .ok()
        .map(|naive| naive.and_utc())
}
