// Copyright 2026 The parley authors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Plain chat flow for non-command input.
//!
//! Unlike the dispatcher, this path is transcript-carrying: the full history
//! is sent on every request so the model keeps conversational state. Ambient
//! context (workspace summary, current file) is prefixed onto the outgoing
//! copy of the newest message only; the transcript itself stores the user's
//! raw text. Errors propagate typed, the session loop decides how to show
//! them.

use crate::client::InferenceClient;
use crate::error::InferenceError;
use crate::session::Session;
use crate::types::{ChatMessage, Turn};

/// Send one plain chat message and record both turns.
///
/// The user turn is appended before the request so the transcript reflects
/// what was asked even if the request fails. The assistant turn is appended
/// only on success.
pub async fn send_message(
    client: &dyn InferenceClient,
    session: &mut Session,
    input: &str,
) -> Result<String, InferenceError> {
    session.push(Turn::user(input));

    let mut messages: Vec<ChatMessage> =
        session.transcript.iter().map(ChatMessage::from).collect();
    if let Some(last) = messages.last_mut() {
        last.content = with_ambient_context(session, &last.content);
    }

    let reply = client.chat(&session.model, &messages).await?;
    session.push(Turn::assistant(&reply));
    Ok(reply)
}

/// Prefix ambient context onto outgoing text. The two context kinds override
/// each other rather than stack: file context is applied after the workspace
/// check, so it wins when both are set.
fn with_ambient_context(session: &Session, content: &str) -> String {
    if let Some(file) = &session.file_context {
        return format!(
            "Current file ({}):\n{}\n\n{content}",
            file.path, file.content
        );
    }
    if let Some(workspace) = &session.workspace_context {
        return format!("Workspace context:\n{workspace}\n\n{content}");
    }
    content.to_string()
}
