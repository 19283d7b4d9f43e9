//! Per-session state for the web UI
//!
//! One entry per UI session, keyed by the session cookie. The state is an
//! explicit tag rather than key-presence checks: `Idle` before the first
//! generation, `Generating` while an invocation is in flight, `Rendered`
//! once a result (possibly the tolerated empty one) is available.

use crate::pipeline::GenerationResult;
use dashmap::DashMap;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Generating,
    Rendered { result: Option<GenerationResult> },
}

/// In-memory session store; entries live until the store is dropped
#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<String, SessionState>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state for a session; unknown sessions are `Idle`
    pub fn state(&self, session_id: &str) -> SessionState {
        self.sessions
            .get(session_id)
            .map(|s| s.clone())
            .unwrap_or(SessionState::Idle)
    }

    /// Mark an invocation in flight
    pub fn begin(&self, session_id: &str) {
        self.sessions
            .insert(session_id.to_string(), SessionState::Generating);
    }

    /// Store a finished generation, overwriting any previous result
    pub fn finish(&self, session_id: &str, result: Option<GenerationResult>) {
        self.sessions
            .insert(session_id.to_string(), SessionState::Rendered { result });
    }

    /// Return a session to `Idle` after a failed invocation
    pub fn fail(&self, session_id: &str) {
        self.sessions
            .insert(session_id.to_string(), SessionState::Idle);
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
