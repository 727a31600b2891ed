// Copyright 2026 The parley authors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Parley main entry point - CLI and REPL.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::info;

use parley::chat;
use parley::client::OllamaClient;
use parley::commands::Dispatcher;
use parley::config;
use parley::session::Session;
use parley::types::Turn;
use parley::workspace::LocalWorkspace;

/// Parley - chat with local models about your code.
#[derive(Parser)]
#[command(name = "parley")]
#[command(author, version, about = "Chat with local models about your code", long_about = None)]
struct Cli {
    /// Inference server base URL
    #[arg(short, long, env = "PARLEY_ENDPOINT")]
    endpoint: Option<String>,

    /// Model to use
    #[arg(short, long, env = "PARLEY_MODEL")]
    model: Option<String>,

    /// Workspace directory (defaults to the current directory; pass
    /// --no-workspace to run without one)
    #[arg(short, long)]
    workspace: Option<PathBuf>,

    /// Run without a workspace folder
    #[arg(long)]
    no_workspace: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    parley::telemetry::init(cli.verbose)?;

    let workspace_dir = if cli.no_workspace {
        None
    } else {
        match cli.workspace {
            Some(dir) => Some(dir),
            None => Some(std::env::current_dir()?),
        }
    };

    let mut config = config::load(workspace_dir.as_deref())?;
    if cli.endpoint.is_some() {
        config.endpoint = cli.endpoint;
    }
    if cli.model.is_some() {
        config.model = cli.model;
    }
    let resolved = config.resolve();

    info!(endpoint = %resolved.endpoint, model = %resolved.model, "Starting parley");

    let client = Arc::new(OllamaClient::with_base_url(&resolved.endpoint));
    let workspace = Arc::new(LocalWorkspace::with_excludes(
        workspace_dir.clone(),
        &resolved.exclude,
    ));
    let dispatcher = Dispatcher::new(client.clone(), workspace);
    let mut session = Session::new(&resolved.model);

    println!("{}", format!("parley {}", parley::VERSION).bold());
    println!(
        "Model: {}  Server: {}",
        resolved.model.cyan(),
        resolved.endpoint.cyan()
    );
    match &workspace_dir {
        Some(dir) => println!("Workspace: {}", dir.display().to_string().cyan()),
        None => println!("{}", "No workspace folder is open.".yellow()),
    }
    println!("Type {} for commands, Ctrl-D to exit.\n", "@help".green());

    let mut editor = DefaultEditor::new()?;

    loop {
        match editor.readline("> ") {
            Ok(line) => {
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(input);

                if input.starts_with('@') {
                    let reply = dispatcher.handle_command(&mut session, input).await;
                    session.push(Turn::assistant(&reply));
                    println!("{reply}\n");
                } else {
                    match chat::send_message(client.as_ref(), &mut session, input).await {
                        Ok(reply) => println!("{reply}\n"),
                        Err(e) => eprintln!("{}\n", format!("Error: {e}").red()),
                    }
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}", format!("Input error: {e}").red());
                break;
            }
        }
    }

    println!("{}", "Goodbye.".bright_black());
    Ok(())
}
