use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One observed HTTP request, as reported by an upstream collector.
///
/// A request counts as failed when `has_error` is set, the status is 400 or
/// above, or the response time exceeds the configured slow-request
/// threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestRecord {
    pub url: String,
    pub method: String,
    pub status: u16,
    pub response_time_ms: f64,
    pub has_error: bool,
    pub error_message: Option<String>,
}

impl Default for RequestRecord {
    fn default() -> Self {
        Self {
            url: String::new(),
            method: "GET".to_string(),
            status: 200,
            response_time_ms: 0.0,
            has_error: false,
            error_message: None,
        }
    }
}

/// An explicit, externally supplied event.
///
/// `kind` and `severity` arrive as free text and are parsed leniently:
/// unrecognized values map to event/medium rather than failing the batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalEvent {
    pub id: String,
    pub name: String,
    pub kind: String,
    pub description: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub severity: String,
    pub component: String,
    pub service: String,
    pub evidence: Vec<String>,
}

/// Raw inputs for one analysis run. All parts are optional; an entirely
/// empty batch yields an empty graph and an empty analysis result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalBatch {
    /// Raw newline-delimited log text.
    pub log_content: Option<String>,
    pub requests: Vec<RequestRecord>,
    pub events: Vec<ExternalEvent>,
}

impl SignalBatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.log_content.as_deref().is_none_or(str::is_empty)
            && self.requests.is_empty()
            && self.events.is_empty()
    }
}
