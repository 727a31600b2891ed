// Copyright 2026 The parley authors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Parley - a chat client for local models with workspace commands.
//!
//! Parley talks to a local Ollama server and layers a small `@`-command
//! grammar on top of plain chat: workspace questions, file reads, line edits,
//! and heuristic code reports.
//!
//! # Architecture
//!
//! - [`types`] - Core type definitions (Turn, ChatMessage, ModelDescriptor)
//! - [`error`] - Error types and result alias
//! - [`config`] - Configuration loading and merging
//! - [`client`] - Inference server HTTP client
//! - [`workspace`] - Project file access behind the [`workspace::Workspace`] trait
//! - [`inspect`] - Heuristic source analysis (statistics, complexity, duplication)
//! - [`session`] - Conversation state
//! - [`commands`] - The `@`-command registry and dispatcher
//! - [`chat`] - The plain, transcript-carrying chat flow
//! - [`telemetry`] - Tracing setup

pub mod chat;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod inspect;
pub mod session;
pub mod telemetry;
pub mod types;
pub mod workspace;

pub use client::{InferenceClient, OllamaClient};
pub use commands::Dispatcher;
pub use error::Result;
pub use session::Session;
pub use types::{ChatMessage, ModelDescriptor, Role, Turn};

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
