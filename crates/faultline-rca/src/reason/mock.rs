//! Canned-response reasoner for tests.

use std::sync::Mutex;

use super::extract::refinement_from_text;
use super::{ReasonError, ReasonRequest, Reasoner, Refinement};

/// Replays raw response texts in order, cycling once exhausted.
///
/// Payloads go through the same extraction path as real responses, so a
/// test can exercise fenced, prose-wrapped, or junk payloads end to end.
#[derive(Debug)]
pub struct MockReasoner {
    state: Mutex<MockState>,
}

#[derive(Debug)]
struct MockState {
    canned: Vec<String>,
    index: usize,
}

impl MockReasoner {
    #[must_use]
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            state: Mutex::new(MockState {
                canned: responses,
                index: 0,
            }),
        }
    }

    #[must_use]
    pub fn with_response(response: impl Into<String>) -> Self {
        Self::new(vec![response.into()])
    }
}

impl Reasoner for MockReasoner {
    fn refine(&self, _request: &ReasonRequest) -> Result<Refinement, ReasonError> {
        let mut state = self.state.lock().expect("mock state lock poisoned");
        if state.canned.is_empty() {
            return Err(ReasonError::Transport("no canned responses".to_string()));
        }
        let content = state.canned[state.index].clone();
        state.index = (state.index + 1) % state.canned.len();
        refinement_from_text(&content).ok_or(ReasonError::Malformed)
    }
}
