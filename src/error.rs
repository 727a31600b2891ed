// Copyright 2026 The parley authors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Error types for parley.
//!
//! Each component surfaces its own strongly-typed error via `thiserror`;
//! application-level code propagates with `anyhow`.

use thiserror::Error;

/// Errors from the remote inference client.
#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("API error: {message}")]
    Api {
        message: String,
        status_code: Option<u16>,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Response parsing error: {0}")]
    Parse(String),
}

impl InferenceError {
    /// Create an API error with status code.
    pub fn api(message: impl Into<String>, status_code: u16) -> Self {
        Self::Api {
            message: message.into(),
            status_code: Some(status_code),
        }
    }
}

/// Errors from the workspace accessor.
#[derive(Error, Debug)]
pub enum WorkspaceError {
    #[error("No workspace folder is open.")]
    NoWorkspace,

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Line {line} out of range (file has {total} lines)")]
    LineOutOfRange { line: usize, total: usize },

    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for WorkspaceError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::FileNotFound(err.to_string()),
            _ => Self::Io(err.to_string()),
        }
    }
}

/// Errors from configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(String),

    #[error("YAML parsing error: {0}")]
    YamlError(String),

    #[error("IO error reading config: {0}")]
    IoError(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(err.to_string()),
            _ => Self::IoError(err.to_string()),
        }
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::YamlError(err.to_string())
    }
}

/// Result type alias using anyhow for flexible error handling.
pub type Result<T> = anyhow::Result<T>;
