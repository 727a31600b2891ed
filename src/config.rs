// Copyright 2026 The parley authors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Configuration loading and merging.
//!
//! Settings come from three layers, lowest priority first: the global file
//! (`~/.config/parley/config.yaml`), the workspace file (`parley.yaml` in the
//! working directory), and `PARLEY_*` environment variables. Every field is
//! optional; [`Config::resolve`] fills in the defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::client::OLLAMA_BASE_URL;
use crate::error::ConfigError;

/// Workspace config file name.
pub const CONFIG_FILE: &str = "parley.yaml";

/// Global config directory under the platform config dir.
pub const GLOBAL_CONFIG_DIR: &str = "parley";

/// Default model when nothing is configured.
pub const DEFAULT_MODEL: &str = "llama3.2";

/// One layer of configuration. All fields optional so layers can merge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Inference server base URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Model name to use.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Extra glob patterns excluded from workspace enumeration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Vec<String>>,
}

impl Config {
    /// Merge `other` on top of `self`: fields set in `other` win.
    pub fn merge(mut self, other: Config) -> Config {
        if other.endpoint.is_some() {
            self.endpoint = other.endpoint;
        }
        if other.model.is_some() {
            self.model = other.model;
        }
        if other.exclude.is_some() {
            self.exclude = other.exclude;
        }
        self
    }

    /// Apply `PARLEY_ENDPOINT` / `PARLEY_MODEL` overrides.
    pub fn with_env_overrides(self) -> Config {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Override from a variable source. Empty values are treated as unset.
    fn with_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Config {
        if let Some(endpoint) = var("PARLEY_ENDPOINT").filter(|v| !v.is_empty()) {
            self.endpoint = Some(endpoint);
        }
        if let Some(model) = var("PARLEY_MODEL").filter(|v| !v.is_empty()) {
            self.model = Some(model);
        }
        self
    }

    /// Final values with defaults filled in.
    pub fn resolve(self) -> ResolvedConfig {
        ResolvedConfig {
            endpoint: self
                .endpoint
                .unwrap_or_else(|| OLLAMA_BASE_URL.to_string()),
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            exclude: self.exclude.unwrap_or_default(),
        }
    }
}

/// Fully resolved configuration, no optional fields left.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub endpoint: String,
    pub model: String,
    pub exclude: Vec<String>,
}

/// Path of the global config file, if a config dir exists on this platform.
pub fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(GLOBAL_CONFIG_DIR).join("config.yaml"))
}

/// Load one YAML config file.
pub fn load_config_file(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config = serde_yaml::from_str(&content)?;
    Ok(config)
}

/// Load a config file if it exists, `None` otherwise.
fn load_optional(path: &Path) -> Result<Option<Config>, ConfigError> {
    if !path.is_file() {
        return Ok(None);
    }
    load_config_file(path).map(Some)
}

/// Load all layers for the given workspace directory and merge them.
///
/// Order: global file, then workspace `parley.yaml`, then environment.
pub fn load(workspace_dir: Option<&Path>) -> Result<Config, ConfigError> {
    let mut config = Config::default();

    if let Some(global) = global_config_path() {
        if let Some(layer) = load_optional(&global)? {
            config = config.merge(layer);
        }
    }
    if let Some(dir) = workspace_dir {
        if let Some(layer) = load_optional(&dir.join(CONFIG_FILE))? {
            config = config.merge(layer);
        }
    }

    Ok(config.with_env_overrides())
}
