// SPDX-FileCopyrightText: 2026 Famulus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Famulus - a WhatsApp-native personal assistant agent.
//!
//! This is the binary entry point: it parses the CLI, loads and validates
//! configuration, and dispatches to the serve loop.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use clap::{Parser, Subcommand};
use miette::IntoDiagnostic;

mod serve;

/// Famulus - a WhatsApp-native personal assistant agent.
#[derive(Parser, Debug)]
#[command(name = "famulus", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Famulus agent (default).
    Serve,
    /// Load and validate configuration, then exit.
    CheckConfig,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match famulus_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            famulus_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) | None => {
            if let Err(report) = serve::run_serve(config).await.into_diagnostic() {
                eprintln!("{report:?}");
                std::process::exit(1);
            }
        }
        Some(Commands::CheckConfig) => {
            println!(
                "famulus: configuration OK (bridge {}, gateway {}:{}, database {})",
                config.whatsapp.bridge_url,
                config.gateway.host,
                config.gateway.port,
                config.storage.database_path
            );
        }
    }
}
