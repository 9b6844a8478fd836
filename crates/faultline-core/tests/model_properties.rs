//! Property tests for the lenient enum parsers and evidence aggregation.

use std::str::FromStr;

use proptest::collection;
use proptest::prelude::*;

use faultline_core::model::{CauseNode, NodeKind, Severity, SignalSource, EVIDENCE_CAP};

fn arb_kind() -> impl Strategy<Value = NodeKind> {
    prop_oneof![
        Just(NodeKind::Event),
        Just(NodeKind::State),
        Just(NodeKind::Symptom),
        Just(NodeKind::RootCause),
        Just(NodeKind::Condition),
        Just(NodeKind::Action),
        Just(NodeKind::Component),
    ]
}

fn arb_severity() -> impl Strategy<Value = Severity> {
    prop_oneof![
        Just(Severity::Critical),
        Just(Severity::High),
        Just(Severity::Medium),
        Just(Severity::Low),
        Just(Severity::None),
    ]
}

proptest! {
    // Cheap string properties, so a higher case count costs little.
    #![proptest_config(proptest::test_runner::Config::with_cases(1000))]

    /// External classification strings must never be rejected, whatever
    /// they contain. When strict parsing does succeed, the lenient parser
    /// must agree with it.
    #[test]
    fn lenient_parsers_accept_anything(s in ".*") {
        let kind = NodeKind::parse_lenient(&s);
        if let Ok(strict) = NodeKind::from_str(&s) {
            prop_assert_eq!(kind, strict);
        }

        let severity = Severity::parse_lenient(&s);
        if let Ok(strict) = Severity::from_str(&s) {
            prop_assert_eq!(severity, strict);
        }
    }

    /// Case and surrounding whitespace carry no meaning.
    #[test]
    fn parsing_ignores_case_and_padding(
        kind in arb_kind(),
        severity in arb_severity(),
        lead in "[ \t\r\n]{0,4}",
        trail in "[ \t\r\n]{0,4}",
        shout in any::<bool>(),
    ) {
        let mut kind_text = kind.as_str().to_string();
        let mut severity_text = severity.as_str().to_string();
        if shout {
            kind_text.make_ascii_uppercase();
            severity_text.make_ascii_uppercase();
        }

        prop_assert_eq!(
            NodeKind::parse_lenient(&format!("{lead}{kind_text}{trail}")),
            kind
        );
        prop_assert_eq!(
            Severity::parse_lenient(&format!("{lead}{severity_text}{trail}")),
            severity
        );
    }

    /// The evidence list stops growing at the cap but keeps the earliest
    /// snippets, in arrival order.
    #[test]
    fn evidence_never_exceeds_the_cap(snippets in collection::vec(".*", 0..20)) {
        let mut node = CauseNode::new("n", "n", NodeKind::Event, SignalSource::Log);
        for snippet in &snippets {
            node.push_evidence(snippet.clone());
        }

        prop_assert_eq!(node.evidence.len(), snippets.len().min(EVIDENCE_CAP));
        for (kept, pushed) in node.evidence.iter().zip(&snippets) {
            prop_assert_eq!(kept, pushed);
        }
    }
}
