// Copyright 2026 The parley authors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Session context: current model, transcript, and ambient prompt context.
//!
//! A [`Session`] is an explicit value passed into each dispatch call rather
//! than ambient process state, so multiple independent sessions can coexist
//! and tests can drive one directly. The core never persists a session; an
//! embedding shell may serialize it opaquely across visibility transitions.

use serde::{Deserialize, Serialize};

use crate::types::{FileContext, Turn};

/// Context for one chat session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Name of the model requests are sent to.
    pub model: String,
    /// Ordered, append-only conversation log.
    pub transcript: Vec<Turn>,
    /// Optional workspace-wide context prefixed to plain chat input.
    pub workspace_context: Option<String>,
    /// Optional current-file context; overrides workspace context when both
    /// are set because it is checked last.
    pub file_context: Option<FileContext>,
}

impl Session {
    /// Create a session for the given model with an empty transcript.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            transcript: Vec::new(),
            workspace_context: None,
            file_context: None,
        }
    }

    /// Append one turn to the transcript.
    pub fn push(&mut self, turn: Turn) {
        self.transcript.push(turn);
    }

    /// Atomically clear the transcript. Not undoable.
    pub fn clear_transcript(&mut self) {
        self.transcript.clear();
    }

    /// Switch the current model, invalidating accumulated context.
    pub fn switch_model(&mut self, model: impl Into<String>) {
        self.model = model.into();
        self.clear_transcript();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;

    #[test]
    fn test_session_new() {
        let session = Session::new("llama3.2");
        assert_eq!(session.model, "llama3.2");
        assert!(session.transcript.is_empty());
        assert!(session.workspace_context.is_none());
        assert!(session.file_context.is_none());
    }

    #[test]
    fn test_push_preserves_order() {
        let mut session = Session::new("m");
        session.push(Turn::user("one"));
        session.push(Turn::assistant("two"));
        session.push(Turn::user("three"));

        let contents: Vec<&str> = session
            .transcript
            .iter()
            .map(|t| t.content.as_str())
            .collect();
        assert_eq!(contents, vec!["one", "two", "three"]);
        assert_eq!(session.transcript[1].role, Role::Assistant);
    }

    #[test]
    fn test_switch_model_clears_transcript() {
        let mut session = Session::new("a");
        session.push(Turn::user("hi"));
        session.switch_model("b");
        assert_eq!(session.model, "b");
        assert!(session.transcript.is_empty());
    }

    #[test]
    fn test_session_serde_round_trip() {
        let mut session = Session::new("llama3.2");
        session.push(Turn::user("hello"));
        session.push(Turn::assistant("hi"));

        let json = serde_json::to_string(&session).unwrap();
        let restored: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.model, "llama3.2");
        assert_eq!(restored.transcript.len(), 2);
        assert_eq!(restored.transcript[0].content, "hello");
    }
}
