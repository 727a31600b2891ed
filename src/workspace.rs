// Copyright 2026 The parley authors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Workspace accessor - reading, enumerating, and editing project files.
//!
//! The [`Workspace`] trait is the seam the dispatcher consumes. The bundled
//! [`LocalWorkspace`] delegates to the local file system; an editor shell can
//! supply its own implementation to surface buffers and real diagnostics.

use async_trait::async_trait;
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::WorkspaceError;

/// Directories excluded from enumeration regardless of configuration.
const DEFAULT_EXCLUDES: &[&str] = &["node_modules", ".git", "target", "dist", ".venv"];

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Info => write!(f, "info"),
        }
    }
}

/// A compiler or linter finding for one file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    /// 1-based line number.
    pub line: usize,
    pub message: String,
    pub severity: Severity,
}

/// Access to the project file tree.
#[async_trait]
pub trait Workspace: Send + Sync {
    /// Enumerate project files as workspace-relative paths.
    async fn list_files(&self) -> Result<Vec<String>, WorkspaceError>;

    /// Read one file's full text.
    async fn read_file(&self, relative_path: &str) -> Result<String, WorkspaceError>;

    /// Best-effort diagnostics for one file. Returns an empty list when no
    /// diagnostic source is available; never fails the caller flow.
    async fn diagnostics(&self, relative_path: &str) -> Vec<Diagnostic>;

    /// Replace one full line (1-based) with new content.
    async fn apply_line_edit(
        &self,
        relative_path: &str,
        line: usize,
        new_content: &str,
    ) -> Result<(), WorkspaceError>;

    /// Declared dependency names from the project manifest.
    async fn manifest_dependencies(&self) -> Result<Vec<String>, WorkspaceError>;
}

/// Workspace over a local directory.
pub struct LocalWorkspace {
    root: Option<PathBuf>,
    exclude: GlobSet,
}

impl LocalWorkspace {
    /// Create a workspace rooted at `root`, or a closed workspace when `None`.
    pub fn new(root: Option<PathBuf>) -> Self {
        Self::with_excludes(root, &[])
    }

    /// Create a workspace with extra exclusion globs on top of the defaults.
    pub fn with_excludes(root: Option<PathBuf>, extra_globs: &[String]) -> Self {
        let mut builder = GlobSetBuilder::new();
        for dir in DEFAULT_EXCLUDES {
            if let Ok(glob) = Glob::new(&format!("**/{dir}/**")) {
                builder.add(glob);
            }
            if let Ok(glob) = Glob::new(&format!("{dir}/**")) {
                builder.add(glob);
            }
        }
        for pattern in extra_globs {
            if let Ok(glob) = Glob::new(pattern) {
                builder.add(glob);
            }
        }
        let exclude = builder.build().unwrap_or_else(|_| GlobSet::empty());

        Self { root, exclude }
    }

    fn root(&self) -> Result<&Path, WorkspaceError> {
        self.root.as_deref().ok_or(WorkspaceError::NoWorkspace)
    }

    fn resolve(&self, relative_path: &str) -> Result<PathBuf, WorkspaceError> {
        let path = self.root()?.join(relative_path);
        if !path.is_file() {
            return Err(WorkspaceError::FileNotFound(relative_path.to_string()));
        }
        Ok(path)
    }
}

#[async_trait]
impl Workspace for LocalWorkspace {
    async fn list_files(&self) -> Result<Vec<String>, WorkspaceError> {
        let root = self.root()?;

        let mut files = Vec::new();
        for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = match entry.path().strip_prefix(root) {
                Ok(rel) => rel.to_string_lossy().replace('\\', "/"),
                Err(_) => continue,
            };
            if self.exclude.is_match(&relative) {
                continue;
            }
            files.push(relative);
        }
        files.sort();

        debug!(count = files.len(), "Enumerated workspace files");
        Ok(files)
    }

    async fn read_file(&self, relative_path: &str) -> Result<String, WorkspaceError> {
        let path = self.resolve(relative_path)?;
        let text = tokio::fs::read_to_string(&path).await?;
        Ok(text)
    }

    async fn diagnostics(&self, _relative_path: &str) -> Vec<Diagnostic> {
        // No diagnostic source attached to the bare filesystem.
        Vec::new()
    }

    async fn apply_line_edit(
        &self,
        relative_path: &str,
        line: usize,
        new_content: &str,
    ) -> Result<(), WorkspaceError> {
        let path = self.resolve(relative_path)?;
        let text = tokio::fs::read_to_string(&path).await?;

        let had_trailing_newline = text.ends_with('\n');
        let mut lines: Vec<&str> = text.lines().collect();

        if line == 0 || line > lines.len() {
            return Err(WorkspaceError::LineOutOfRange {
                line,
                total: lines.len(),
            });
        }
        lines[line - 1] = new_content;

        let mut updated = lines.join("\n");
        if had_trailing_newline {
            updated.push('\n');
        }
        tokio::fs::write(&path, updated).await?;

        debug!(path = %path.display(), line, "Applied line edit");
        Ok(())
    }

    async fn manifest_dependencies(&self) -> Result<Vec<String>, WorkspaceError> {
        let manifest = self.root()?.join("package.json");
        if !manifest.is_file() {
            return Err(WorkspaceError::FileNotFound("package.json".to_string()));
        }

        let text = tokio::fs::read_to_string(&manifest).await?;
        let parsed: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| WorkspaceError::Io(format!("Invalid package.json: {e}")))?;

        let mut deps = Vec::new();
        for section in ["dependencies", "devDependencies"] {
            if let Some(map) = parsed.get(section).and_then(|v| v.as_object()) {
                deps.extend(map.keys().cloned());
            }
        }
        deps.sort();
        deps.dedup();
        Ok(deps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn workspace_at(path: &Path) -> LocalWorkspace {
        LocalWorkspace::new(Some(path.to_path_buf()))
    }

    #[tokio::test]
    async fn test_list_files_excludes_dependency_dirs() {
        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join("main.js"), "x").unwrap();
        std::fs::create_dir_all(temp.path().join("node_modules/pkg")).unwrap();
        std::fs::write(temp.path().join("node_modules/pkg/index.js"), "y").unwrap();

        let ws = workspace_at(temp.path());
        let files = ws.list_files().await.unwrap();
        assert_eq!(files, vec!["main.js"]);
    }

    #[tokio::test]
    async fn test_list_files_no_workspace() {
        let ws = LocalWorkspace::new(None);
        let result = ws.list_files().await;
        assert!(matches!(result, Err(WorkspaceError::NoWorkspace)));
    }

    #[tokio::test]
    async fn test_read_file() {
        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join("a.txt"), "content").unwrap();

        let ws = workspace_at(temp.path());
        assert_eq!(ws.read_file("a.txt").await.unwrap(), "content");
    }

    #[tokio::test]
    async fn test_read_file_not_found() {
        let temp = tempdir().unwrap();
        let ws = workspace_at(temp.path());
        let result = ws.read_file("missing.txt").await;
        assert!(matches!(result, Err(WorkspaceError::FileNotFound(_))));
    }

    #[tokio::test]
    async fn test_apply_line_edit() {
        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join("f.txt"), "one\ntwo\nthree\n").unwrap();

        let ws = workspace_at(temp.path());
        ws.apply_line_edit("f.txt", 2, "TWO").await.unwrap();

        let text = std::fs::read_to_string(temp.path().join("f.txt")).unwrap();
        assert_eq!(text, "one\nTWO\nthree\n");
    }

    #[tokio::test]
    async fn test_apply_line_edit_out_of_range() {
        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join("f.txt"), "only line").unwrap();

        let ws = workspace_at(temp.path());
        let result = ws.apply_line_edit("f.txt", 5, "x").await;
        assert!(matches!(
            result,
            Err(WorkspaceError::LineOutOfRange { line: 5, total: 1 })
        ));
    }

    #[tokio::test]
    async fn test_manifest_dependencies() {
        let temp = tempdir().unwrap();
        std::fs::write(
            temp.path().join("package.json"),
            r#"{"dependencies": {"react": "^18.0.0"}, "devDependencies": {"eslint": "^9.0.0"}}"#,
        )
        .unwrap();

        let ws = workspace_at(temp.path());
        let deps = ws.manifest_dependencies().await.unwrap();
        assert_eq!(deps, vec!["eslint", "react"]);
    }

    #[tokio::test]
    async fn test_diagnostics_empty_without_source() {
        let temp = tempdir().unwrap();
        let ws = workspace_at(temp.path());
        assert!(ws.diagnostics("anything.js").await.is_empty());
    }
}
