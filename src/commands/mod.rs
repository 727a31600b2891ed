// Copyright 2026 The parley authors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Command dispatcher.
//!
//! Takes one `@`-sigil input line, resolves it against the registry, gathers
//! whatever side context the command needs (file contents, directory listing,
//! diagnostics), and returns a single textual result.
//!
//! Turn bookkeeping is asymmetric on purpose: the dispatcher appends the user
//! turn (the raw command text) itself, while the surrounding session loop
//! appends the assistant turn from the returned text. Context-gathering
//! commands (`@workspace`, `@read`, `@understand`) send an isolated one-message
//! request instead of the full transcript.
//!
//! No error escapes [`Dispatcher::handle_command`]: every internal failure is
//! rendered as an `"Error executing command: ..."` string.

pub mod registry;

use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use tracing::debug;

use crate::client::InferenceClient;
use crate::error::{Result, WorkspaceError};
use crate::inspect::{
    self, COMPLEX_FUNCTION_THRESHOLD, DUPLICATE_WINDOW, HIGH_COMPLEXITY_THRESHOLD,
    LONG_FUNCTION_LINES,
};
use crate::session::Session;
use crate::types::{ChatMessage, Turn};
use crate::workspace::Workspace;

use registry::ResolvedCommand;

static EDIT_ARGS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^@edit\s+(\S+)\s+(\d+)\s+(.+)$").unwrap());

/// Resolves command input and runs the matched operation.
pub struct Dispatcher {
    client: Arc<dyn InferenceClient>,
    workspace: Arc<dyn Workspace>,
}

impl Dispatcher {
    pub fn new(client: Arc<dyn InferenceClient>, workspace: Arc<dyn Workspace>) -> Self {
        Self { client, workspace }
    }

    /// Handle one command line. Always returns display text, never an error.
    ///
    /// The raw input is appended to the transcript as a user turn before any
    /// branch runs; appending the assistant turn is the caller's job.
    pub async fn handle_command(&self, session: &mut Session, input: &str) -> String {
        session.push(Turn::user(input));

        let trimmed = input.trim();
        if trimmed == "@" {
            return registry::command_names().join("\n");
        }

        let Some(resolved) = registry::resolve(trimmed) else {
            let token = trimmed
                .split_once(':')
                .map(|(before, _)| before.trim_end())
                .unwrap_or(trimmed);
            return format!("Unknown command: {token}. Type @help for available commands.");
        };

        debug!(command = resolved.spec.keyword.trim_end(), "Dispatching command");

        match self.run(session, &resolved, trimmed).await {
            Ok(text) => text,
            Err(e) => format!("Error executing command: {e}"),
        }
    }

    async fn run(
        &self,
        session: &mut Session,
        resolved: &ResolvedCommand<'_>,
        raw: &str,
    ) -> Result<String> {
        match resolved.spec.keyword {
            "@help" => Ok(registry::reference_text()),
            "@list" => self.list_models().await,
            "@clear" => {
                session.clear_transcript();
                Ok("Conversation history cleared.".to_string())
            }
            "@info" => Ok(format!("Current model: {}", session.model)),
            "@model " => self.switch_model(session, resolved.args).await,
            "@workspace" => self.workspace_query(session, resolved.query).await,
            "@read " => self.read_query(session, resolved.args, resolved.query).await,
            "@understand " => self.understand(session, resolved.args).await,
            "@analyze " => self.analyze(resolved.args).await,
            "@search " => self.search(resolved.args).await,
            "@edit " => self.edit(raw).await,
            "@explain " => self.explain(resolved.args).await,
            "@refactor " => self.refactor(resolved.args).await,
            "@deps " => self.deps(resolved.args).await,
            other => Ok(format!(
                "Unknown command: {other}. Type @help for available commands."
            )),
        }
    }

    /// Send an isolated one-message request, outside the transcript.
    async fn isolated_request(&self, session: &Session, prompt: String) -> Result<String> {
        let reply = self
            .client
            .chat(&session.model, &[ChatMessage::user(prompt)])
            .await?;
        Ok(reply)
    }

    async fn list_models(&self) -> Result<String> {
        let models = self.client.list_models().await?;
        if models.is_empty() {
            return Ok("No models found on the server.".to_string());
        }
        let mut lines = vec!["Available models:".to_string()];
        for model in &models {
            lines.push(format!("- {} ({})", model.name, format_size(model.size)));
        }
        Ok(lines.join("\n"))
    }

    async fn switch_model(&self, session: &mut Session, name: &str) -> Result<String> {
        if name.is_empty() {
            return Ok("Usage: @model <name>".to_string());
        }
        let models = self.client.list_models().await?;
        if models.iter().any(|m| m.name == name) {
            session.switch_model(name);
            Ok(format!(
                "Switched to model '{name}'. Conversation history cleared."
            ))
        } else {
            Ok(format!(
                "Model '{name}' not found on the server. Use @list to see available models."
            ))
        }
    }

    async fn workspace_query(&self, session: &Session, query: &str) -> Result<String> {
        if query.is_empty() {
            return Ok(
                "Please provide a query, e.g. @workspace: what does this project do?".to_string(),
            );
        }
        let files = match self.workspace.list_files().await {
            Ok(files) => files,
            Err(WorkspaceError::NoWorkspace) => {
                return Ok(WorkspaceError::NoWorkspace.to_string())
            }
            Err(e) => return Err(e.into()),
        };

        let tree = files.join("\n");
        let prompt = format!(
            "You are looking at a project with the following files:\n\n{tree}\n\nQuestion: {query}"
        );
        self.isolated_request(session, prompt).await
    }

    async fn read_query(&self, session: &Session, file: &str, query: &str) -> Result<String> {
        if file.is_empty() {
            return Ok("Usage: @read <file>: <query>".to_string());
        }
        if query.is_empty() {
            return Ok("Please provide a query, e.g. @read src/app.js: what does this file do?"
                .to_string());
        }
        let content = match self.workspace.read_file(file).await {
            Ok(content) => content,
            Err(WorkspaceError::NoWorkspace) => {
                return Ok(WorkspaceError::NoWorkspace.to_string())
            }
            Err(e) => return Err(e.into()),
        };

        let prompt =
            format!("Here is the content of {file}:\n\n{content}\n\nQuestion: {query}");
        self.isolated_request(session, prompt).await
    }

    async fn understand(&self, session: &Session, file: &str) -> Result<String> {
        if file.is_empty() {
            return Ok("Usage: @understand <file>".to_string());
        }
        let content = match self.workspace.read_file(file).await {
            Ok(content) => content,
            Err(WorkspaceError::NoWorkspace) => {
                return Ok(WorkspaceError::NoWorkspace.to_string())
            }
            Err(e) => return Err(e.into()),
        };

        let prompt = format!(
            "Analyze the file {file} and provide:\n\
             1. A short overview of what it does\n\
             2. The key functions and their responsibilities\n\
             3. The main data structures\n\
             4. External dependencies\n\
             5. Areas that could be improved\n\n\
             File content:\n\n{content}"
        );
        self.isolated_request(session, prompt).await
    }

    async fn analyze(&self, file: &str) -> Result<String> {
        if file.is_empty() {
            return Ok("Usage: @analyze <file>".to_string());
        }
        let content = self.workspace.read_file(file).await?;
        let stats = inspect::statistics(&content);
        let diagnostics = self.workspace.diagnostics(file).await;

        let mut lines = vec![
            format!("Analysis of {file}:"),
            format!("- Total lines: {}", stats.total_lines),
            format!("- Non-empty lines: {}", stats.non_empty_lines),
        ];
        if diagnostics.is_empty() {
            lines.push("- Diagnostics: none".to_string());
        } else {
            lines.push(format!("- Diagnostics: {}", diagnostics.len()));
            for diag in &diagnostics {
                lines.push(format!(
                    "  line {} [{}]: {}",
                    diag.line, diag.severity, diag.message
                ));
            }
        }
        Ok(lines.join("\n"))
    }

    async fn search(&self, query: &str) -> Result<String> {
        if query.is_empty() {
            return Ok("Usage: @search <query>".to_string());
        }
        let files = match self.workspace.list_files().await {
            Ok(files) => files,
            Err(WorkspaceError::NoWorkspace) => {
                return Ok(WorkspaceError::NoWorkspace.to_string())
            }
            Err(e) => return Err(e.into()),
        };

        let needle = query.to_lowercase();
        let mut hits = Vec::new();
        for path in &files {
            let Ok(content) = self.workspace.read_file(path).await else {
                continue;
            };
            for (idx, line) in content.lines().enumerate() {
                if line.to_lowercase().contains(&needle) {
                    hits.push(format!("{path}:{}: {}", idx + 1, line.trim()));
                }
            }
        }

        if hits.is_empty() {
            Ok(format!("No matches found for '{query}'."))
        } else {
            Ok(hits.join("\n"))
        }
    }

    async fn edit(&self, raw: &str) -> Result<String> {
        let Some(caps) = EDIT_ARGS.captures(raw) else {
            return Ok("Invalid format. Usage: @edit <file> <line> <content>".to_string());
        };
        let file = &caps[1];
        let line: usize = caps[2]
            .parse()
            .map_err(|_| WorkspaceError::Io(format!("Invalid line number: {}", &caps[2])))?;
        let content = &caps[3];

        self.workspace.apply_line_edit(file, line, content).await?;
        Ok(format!("Replaced line {line} in {file}."))
    }

    async fn explain(&self, file: &str) -> Result<String> {
        if file.is_empty() {
            return Ok("Usage: @explain <file>".to_string());
        }
        let content = self.workspace.read_file(file).await?;
        let stats = inspect::statistics(&content);
        let imports = inspect::extract_imports(&content);
        let functions = inspect::extract_functions(&content);
        let classes = inspect::extract_classes(&content);
        let score = inspect::complexity(&content);
        let diagnostics = self.workspace.diagnostics(file).await;

        let mut lines = vec![
            format!("Explanation of {file}:"),
            format!(
                "- {} lines ({} non-empty)",
                stats.total_lines, stats.non_empty_lines
            ),
            format!("- Imports: {}", imports.len()),
            format!("- Functions: {}", functions.len()),
            format!("- Classes: {}", classes.len()),
            format!("- Complexity score: {score}"),
        ];
        if score > HIGH_COMPLEXITY_THRESHOLD {
            lines.push("- This file has high complexity".to_string());
        }
        if !diagnostics.is_empty() {
            lines.push(format!("- Open diagnostics: {}", diagnostics.len()));
        }
        Ok(lines.join("\n"))
    }

    async fn refactor(&self, file: &str) -> Result<String> {
        if file.is_empty() {
            return Ok("Usage: @refactor <file>".to_string());
        }
        let content = self.workspace.read_file(file).await?;

        let mut suggestions = Vec::new();
        for function in inspect::extract_functions(&content) {
            if function.line_count > LONG_FUNCTION_LINES {
                suggestions.push(format!(
                    "Function '{}' is {} lines long; consider splitting it.",
                    function.name, function.line_count
                ));
            }
            let score = inspect::complexity(&function.body);
            if score > COMPLEX_FUNCTION_THRESHOLD {
                suggestions.push(format!(
                    "Function '{}' is complex (score {score}); consider simplifying its branching.",
                    function.name
                ));
            }
        }
        for window in inspect::find_duplicate_windows(&content, DUPLICATE_WINDOW) {
            suggestions.push(format!(
                "Lines {}-{} are duplicated later in the file; consider extracting a helper.",
                window.start_line, window.end_line
            ));
        }
        suggestions.extend(inspect::check_naming(&content));

        if suggestions.is_empty() {
            Ok(format!("No major refactoring suggestions for {file}."))
        } else {
            Ok(format!(
                "Suggestions for {file}:\n{}",
                suggestions.join("\n")
            ))
        }
    }

    async fn deps(&self, file: &str) -> Result<String> {
        if file.is_empty() {
            return Ok("Usage: @deps <file>".to_string());
        }
        let content = self.workspace.read_file(file).await?;
        let imports = inspect::extract_imports(&content);
        let unused = inspect::find_unused_imports(&content, &imports);

        let mut lines = vec![format!("Dependencies of {file}:")];
        if imports.is_empty() {
            lines.push("- No imports".to_string());
        } else {
            lines.push(format!("- Imports ({}):", imports.len()));
            for import in &imports {
                lines.push(format!("  {}", import.trim()));
            }
        }
        if !unused.is_empty() {
            lines.push(format!("- Unused imports ({}):", unused.len()));
            for import in &unused {
                lines.push(format!("  {}", import.trim()));
            }
        }
        match self.workspace.manifest_dependencies().await {
            Ok(deps) if !deps.is_empty() => {
                lines.push(format!("- Declared in manifest: {}", deps.join(", ")));
            }
            Ok(_) => lines.push("- No declared manifest dependencies".to_string()),
            Err(_) => lines.push("- No project manifest found".to_string()),
        }
        Ok(lines.join("\n"))
    }
}

/// Human-readable byte size.
fn format_size(bytes: u64) -> String {
    const GB: f64 = 1024.0 * 1024.0 * 1024.0;
    const MB: f64 = 1024.0 * 1024.0;
    const KB: f64 = 1024.0;

    let bytes = bytes as f64;
    if bytes >= GB {
        format!("{:.1} GB", bytes / GB)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes / MB)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes / KB)
    } else {
        format!("{bytes} B")
    }
}
