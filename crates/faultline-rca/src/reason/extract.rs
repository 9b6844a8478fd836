//! Refinement extraction from free-text service responses.
//!
//! Reasoning services rarely return clean JSON: payloads arrive fenced in
//! markdown, wrapped in prose, or cut off mid-stream. Three strategies run
//! in order before the caller gives up: direct parse, fenced-block parse,
//! then the widest brace-delimited substring.

use tracing::trace;

use super::Refinement;

/// Try all extraction strategies against `text`. `None` means the response
/// carried no usable structured refinement.
#[must_use]
pub fn refinement_from_text(text: &str) -> Option<Refinement> {
    if let Ok(refinement) = serde_json::from_str::<Refinement>(text) {
        trace!("refinement parsed directly");
        return Some(refinement);
    }
    if let Some(block) = fenced_block(text) {
        if let Ok(refinement) = serde_json::from_str::<Refinement>(block) {
            trace!("refinement parsed from fenced block");
            return Some(refinement);
        }
    }
    if let Some(substring) = braced_substring(text) {
        if let Ok(refinement) = serde_json::from_str::<Refinement>(substring) {
            trace!("refinement parsed from brace-delimited substring");
            return Some(refinement);
        }
    }
    None
}

/// The body of the first ``` fence pair, with an optional `json` language
/// tag stripped.
fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let after = &text[start + 3..];
    let after = after.strip_prefix("json").unwrap_or(after);
    let end = after.find("```")?;
    Some(after[..end].trim())
}

/// The widest `{ ... }` substring, from the first opening brace to the
/// last closing one.
fn braced_substring(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end > start {
        Some(&text[start..=end])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::refinement_from_text;

    const CLEAN: &str = r#"{
        "primary_root_cause": {
            "node_id": "log_database_error",
            "name": "database_error",
            "confidence": 0.85,
            "reasoning": "connection pool exhaustion preceded every timeout"
        },
        "recommendations": ["increase pool size", "add circuit breaker"],
        "overall_confidence": 0.8
    }"#;

    #[test]
    fn direct_json_parses() {
        let refinement = refinement_from_text(CLEAN).expect("clean payload");
        let primary = refinement.primary_root_cause.expect("primary");
        assert_eq!(primary.node_id, "log_database_error");
        assert_eq!(refinement.recommendations.len(), 2);
    }

    #[test]
    fn fenced_markdown_parses() {
        let fenced = format!("Here is my analysis:\n\n```json\n{CLEAN}\n```\n\nHope that helps!");
        let refinement = refinement_from_text(&fenced).expect("fenced payload");
        assert_eq!(
            refinement.primary_root_cause.expect("primary").node_id,
            "log_database_error"
        );
    }

    #[test]
    fn fence_without_language_tag_parses() {
        let fenced = format!("```\n{CLEAN}\n```");
        assert!(refinement_from_text(&fenced).is_some());
    }

    #[test]
    fn json_buried_in_prose_parses() {
        let prose = format!("The most likely culprit follows. {CLEAN} Let me know if unclear.");
        let refinement = refinement_from_text(&prose).expect("buried payload");
        assert!((refinement.overall_confidence.expect("confidence") - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn truncated_json_yields_none() {
        let truncated = &CLEAN[..CLEAN.len() / 2];
        assert!(refinement_from_text(truncated).is_none());
    }

    #[test]
    fn plain_prose_yields_none() {
        assert!(refinement_from_text("I could not determine a root cause.").is_none());
        assert!(refinement_from_text("").is_none());
    }

    #[test]
    fn empty_object_parses_as_defaults() {
        let refinement = refinement_from_text("{}").expect("empty object");
        assert!(refinement.is_vacuous());
    }
}
