//! Node extraction from structured request records.
//!
//! Failing records are grouped by `(normalized_url, status_class)` and each
//! group becomes one aggregated node. A record counts as failing when it
//! carries an error flag, a 4xx/5xx status, or a response time above the
//! slow-request threshold. When the overall error ratio exceeds the
//! configured threshold a synthetic `high_error_rate` node is appended.

use std::collections::HashMap;

use faultline_core::config::BuilderConfig;
use faultline_core::model::{CauseNode, NodeKind, RequestRecord, Severity, SignalSource};

use super::signatures::HIGH_ERROR_RATE_ID;

struct RequestGroup {
    url: String,
    class: String,
    method: String,
    count: u32,
    status_sum: u64,
    latency_sum_ms: f64,
    evidence: Vec<String>,
}

/// Group failing requests into aggregated nodes.
///
/// At most `max_nodes` group nodes are created; the error-rate aggregate
/// rides outside that budget because it summarizes the whole batch rather
/// than one endpoint.
pub(crate) fn extract_request_nodes(
    requests: &[RequestRecord],
    config: &BuilderConfig,
    max_nodes: usize,
) -> Vec<CauseNode> {
    if requests.is_empty() {
        return Vec::new();
    }

    let mut groups: Vec<RequestGroup> = Vec::new();
    let mut slot_by_key: HashMap<(String, String), usize> = HashMap::new();
    let mut error_count: usize = 0;

    for record in requests {
        if record.has_error || record.status >= 400 {
            error_count += 1;
        }
        let failed = record.has_error
            || record.status >= 400
            || record.response_time_ms > config.slow_request_ms;
        if !failed {
            continue;
        }

        let url = normalize_url(&record.url);
        let class = status_class(record.status);
        let key = (url.clone(), class.clone());

        let slot = match slot_by_key.get(&key) {
            Some(&slot) => slot,
            None => {
                if groups.len() >= max_nodes {
                    continue;
                }
                let slot = groups.len();
                groups.push(RequestGroup {
                    url,
                    class,
                    method: record.method.clone(),
                    count: 0,
                    status_sum: 0,
                    latency_sum_ms: 0.0,
                    evidence: Vec::new(),
                });
                slot_by_key.insert(key, slot);
                slot
            }
        };

        let group = &mut groups[slot];
        group.count += 1;
        group.status_sum += u64::from(record.status);
        group.latency_sum_ms += record.response_time_ms;
        if group.evidence.len() < faultline_core::model::EVIDENCE_CAP {
            group.evidence.push(describe_record(record));
        }
    }

    let mut nodes: Vec<CauseNode> = groups
        .into_iter()
        .map(|group| group_node(group, config))
        .collect();

    let ratio = error_ratio(error_count, requests.len());
    if ratio > config.error_rate_threshold {
        nodes.push(error_rate_node(error_count, ratio));
    }

    nodes
}

#[allow(clippy::cast_precision_loss)]
fn error_ratio(error_count: usize, total: usize) -> f64 {
    error_count as f64 / total as f64
}

#[allow(clippy::cast_precision_loss)]
fn group_node(group: RequestGroup, config: &BuilderConfig) -> CauseNode {
    let avg_status = group.status_sum as f64 / f64::from(group.count.max(1));
    let avg_latency_ms = group.latency_sum_ms / f64::from(group.count.max(1));
    let (kind, severity) = classify_group(avg_status, avg_latency_ms, config.slow_request_ms);

    let id = sanitize_id(&format!("req_{}_{}_{}", group.method, group.url, group.class));
    let mut node = CauseNode::new(
        id,
        format!("{} {} {}", group.method, group.url, group.class),
        kind,
        SignalSource::Request,
    );
    node.description = format!("{} failing requests to {}", group.count, group.url);
    node.severity = severity;
    node.frequency = group.count;
    node.component = component_of(&group.url);
    node.evidence = group.evidence;
    node.metadata
        .insert("avg_status".to_string(), format!("{avg_status:.0}"));
    node.metadata
        .insert("avg_latency_ms".to_string(), format!("{avg_latency_ms:.0}"));
    node
}

fn classify_group(
    avg_status: f64,
    avg_latency_ms: f64,
    slow_request_ms: f64,
) -> (NodeKind, Severity) {
    if avg_status >= 500.0 {
        let severity = if avg_latency_ms > slow_request_ms {
            Severity::Critical
        } else {
            Severity::High
        };
        (NodeKind::Symptom, severity)
    } else if avg_status >= 400.0 {
        (NodeKind::Event, Severity::Medium)
    } else {
        // Slow but nominally successful endpoints.
        (NodeKind::Symptom, Severity::Medium)
    }
}

#[allow(clippy::cast_possible_truncation)]
fn error_rate_node(error_count: usize, ratio: f64) -> CauseNode {
    let mut node = CauseNode::new(
        HIGH_ERROR_RATE_ID,
        "high error rate",
        NodeKind::State,
        SignalSource::Request,
    );
    node.severity = Severity::High;
    node.description = format!("{:.0}% of sampled requests errored", ratio * 100.0);
    node.frequency = (error_count as u32).max(1);
    node.metadata
        .insert("error_ratio".to_string(), format!("{ratio:.3}"));
    node
}

fn describe_record(record: &RequestRecord) -> String {
    let mut line = format!(
        "{} {} -> {} in {:.0} ms",
        record.method, record.url, record.status, record.response_time_ms
    );
    if let Some(message) = record.error_message.as_deref() {
        if !message.is_empty() {
            line.push_str(": ");
            line.push_str(message);
        }
    }
    line
}

/// Strip the query/fragment and replace id-like path segments with `:id`
/// so retries of the same endpoint group together.
pub(crate) fn normalize_url(url: &str) -> String {
    let without_query = url.split(['?', '#']).next().unwrap_or_default();

    let mut normalized = String::new();
    for segment in without_query.split('/') {
        if segment.is_empty() {
            continue;
        }
        normalized.push('/');
        if is_id_segment(segment) {
            normalized.push_str(":id");
        } else {
            normalized.push_str(segment);
        }
    }
    if normalized.is_empty() {
        "/".to_string()
    } else {
        normalized
    }
}

/// Purely numeric segments, or hex/UUID-shaped tokens of 8+ characters
/// containing at least one digit.
fn is_id_segment(segment: &str) -> bool {
    if segment.chars().all(|c| c.is_ascii_digit()) {
        return true;
    }
    segment.len() >= 8
        && segment.chars().any(|c| c.is_ascii_digit())
        && segment
            .chars()
            .all(|c| c.is_ascii_hexdigit() || c == '-')
}

fn status_class(status: u16) -> String {
    format!("{}xx", status / 100)
}

fn component_of(normalized_url: &str) -> String {
    normalized_url
        .trim_start_matches('/')
        .split('/')
        .next()
        .unwrap_or_default()
        .to_string()
}

fn sanitize_id(raw: &str) -> String {
    let mut id = String::with_capacity(raw.len());
    let mut last_was_underscore = false;
    for c in raw.chars() {
        let mapped = if c.is_ascii_alphanumeric() {
            c.to_ascii_lowercase()
        } else {
            '_'
        };
        if mapped == '_' {
            if last_was_underscore {
                continue;
            }
            last_was_underscore = true;
        } else {
            last_was_underscore = false;
        }
        id.push(mapped);
    }
    id.trim_matches('_').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use faultline_core::config::BuilderConfig;
    use faultline_core::model::RequestRecord;

    fn record(url: &str, status: u16, response_time_ms: f64) -> RequestRecord {
        RequestRecord {
            url: url.to_string(),
            status,
            response_time_ms,
            ..RequestRecord::default()
        }
    }

    #[test]
    fn url_normalization() {
        assert_eq!(normalize_url("/api/users/42?page=2"), "/api/users/:id");
        assert_eq!(
            normalize_url("/api/orders/550e8400-e29b-41d4-a716-446655440000/items"),
            "/api/orders/:id/items"
        );
        assert_eq!(normalize_url("/health"), "/health");
        assert_eq!(normalize_url(""), "/");
        // Plain words survive even when hex-alphabet only.
        assert_eq!(normalize_url("/api/feedback"), "/api/feedback");
    }

    #[test]
    fn retries_of_one_endpoint_group_together() {
        let requests = vec![
            record("/api/users/1", 503, 120.0),
            record("/api/users/2", 503, 180.0),
            record("/api/users/3", 500, 90.0),
        ];
        let nodes = extract_request_nodes(&requests, &BuilderConfig::default(), 25);

        let group = nodes
            .iter()
            .find(|n| n.id == "req_get_api_users_id_5xx")
            .expect("grouped node");
        assert_eq!(group.frequency, 3);
        assert_eq!(group.component, "api");
        assert_eq!(group.kind, NodeKind::Symptom);
        assert_eq!(group.severity, Severity::High);
        assert_eq!(group.evidence.len(), 3);
    }

    #[test]
    fn slow_5xx_group_is_critical() {
        let requests = vec![
            record("/api/report", 502, 4500.0),
            record("/api/report", 504, 5200.0),
        ];
        let nodes = extract_request_nodes(&requests, &BuilderConfig::default(), 25);
        assert_eq!(nodes[0].severity, Severity::Critical);
        assert_eq!(nodes[0].kind, NodeKind::Symptom);
    }

    #[test]
    fn client_errors_are_events() {
        let requests = vec![record("/api/login", 401, 50.0)];
        let nodes = extract_request_nodes(&requests, &BuilderConfig::default(), 25);
        assert_eq!(nodes[0].kind, NodeKind::Event);
        assert_eq!(nodes[0].severity, Severity::Medium);
    }

    #[test]
    fn slow_success_is_a_medium_symptom() {
        let requests = vec![record("/api/search", 200, 4800.0)];
        let nodes = extract_request_nodes(&requests, &BuilderConfig::default(), 25);
        assert_eq!(nodes[0].kind, NodeKind::Symptom);
        assert_eq!(nodes[0].severity, Severity::Medium);
        // Slow 2xx traffic is failure for grouping but not an error.
        assert!(!nodes.iter().any(|n| n.id == HIGH_ERROR_RATE_ID));
    }

    #[test]
    fn error_rate_node_appears_past_threshold() {
        let mut requests = vec![record("/api/ok", 200, 80.0); 8];
        requests.push(record("/api/users/7", 500, 100.0));
        requests.push(record("/api/users/8", 500, 110.0));
        // 2 errors out of 10 = 20% > 10%.
        let nodes = extract_request_nodes(&requests, &BuilderConfig::default(), 25);

        let aggregate = nodes
            .iter()
            .find(|n| n.id == HIGH_ERROR_RATE_ID)
            .expect("aggregate node");
        assert_eq!(aggregate.kind, NodeKind::State);
        assert_eq!(aggregate.severity, Severity::High);
        assert_eq!(aggregate.frequency, 2);
    }

    #[test]
    fn error_rate_node_absent_below_threshold() {
        let mut requests = vec![record("/api/ok", 200, 80.0); 19];
        requests.push(record("/api/users/7", 500, 100.0));
        // 1 error out of 20 = 5%.
        let nodes = extract_request_nodes(&requests, &BuilderConfig::default(), 25);
        assert!(!nodes.iter().any(|n| n.id == HIGH_ERROR_RATE_ID));
    }

    #[test]
    fn group_budget_is_enforced() {
        let requests = vec![
            record("/api/a", 500, 10.0),
            record("/api/b", 500, 10.0),
            record("/api/a", 500, 12.0),
        ];
        let nodes = extract_request_nodes(&requests, &BuilderConfig::default(), 1);

        // Only the first group fits; its later record still aggregates.
        let ids: Vec<&str> = nodes
            .iter()
            .filter(|n| n.id != HIGH_ERROR_RATE_ID)
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(ids, vec!["req_get_api_a_5xx"]);
        assert_eq!(nodes[0].frequency, 2);
    }

    #[test]
    fn healthy_batch_yields_nothing() {
        let requests = vec![record("/api/ok", 200, 45.0); 5];
        let nodes = extract_request_nodes(&requests, &BuilderConfig::default(), 25);
        assert!(nodes.is_empty());
    }
}
