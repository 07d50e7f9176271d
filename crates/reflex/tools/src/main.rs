// Dotlanth
// Copyright (C) 2025 Synerthink

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Reflex CLI Tool
//!
//! Main entry point for the `reflex` command-line interface.

use anyhow::Result;
use clap::{Parser, Subcommand};
use reflex_tools::config::resolve_config;
use reflex_tools::{InspectArgs, ReplArgs, ResolveArgs, run_inspect, run_repl, run_resolve};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "reflex")]
#[command(about = "Reflex - C++ type catalog inspection and dynamic lookup")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file (TOML), overrides $REFLEX_CONFIG
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log registrations and lookups
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a dictionary and list its types and scopes
    Inspect(InspectArgs),
    /// Resolve one name against a dictionary
    Resolve(ResolveArgs),
    /// Start an interactive session over a dictionary
    Repl(ReplArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();

    let config = resolve_config(cli.config)?;
    let stdout = io::stdout();

    match cli.command {
        Commands::Inspect(args) => run_inspect(&args, &config, &mut stdout.lock())?,
        Commands::Resolve(args) => run_resolve(&args, &config, &mut stdout.lock())?,
        Commands::Repl(args) => {
            let stdin = io::stdin();
            run_repl(&args, &config, &mut stdin.lock(), &mut stdout.lock())?
        }
    }

    Ok(())
}
