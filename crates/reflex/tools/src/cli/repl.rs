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

//! Interactive session over a loaded dictionary
//!
//! Each input line is a name to evaluate. Lines starting with `.` are
//! commands. Lookup failures are reported and the session continues.

use super::session::{Evaluation, Session};
use anyhow::Result;
use clap::Args;
use reflex_core::{ReflexConfig, ScopeId};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::warn;

/// Arguments for the repl command
#[derive(Args, Debug)]
pub struct ReplArgs {
    /// Dictionary file (JSON)
    #[arg(value_name = "DICTIONARY")]
    pub dictionary: PathBuf,

    /// Scope to start in (overrides the configured initial scope)
    #[arg(long)]
    pub scope: Option<String>,
}

const HELP: &str = "\
.scope <name>   change the current scope (`::` for the global scope)
.types          list registered types
.symbols        list symbols available to dynamic lookup
.help           show this help
.quit           leave the session
<name>          evaluate a name, e.g. `Color::Green` or `x`";

/// Execute the repl command on the given input and output streams
pub fn run_repl(args: &ReplArgs, config: &ReflexConfig, input: &mut dyn BufRead, out: &mut dyn Write) -> Result<()> {
    let session = Session::open(&args.dictionary, config)?;
    let initial = args.scope.as_deref().unwrap_or(&config.repl.initial_scope);
    let mut scope = match session.scope_named(initial) {
        Some(scope) => scope,
        None => {
            warn!(scope = initial, "unknown initial scope, starting in the global scope");
            session.catalog.global_scope()
        }
    };

    writeln!(out, "{} types loaded from '{}'. Type .help for commands.", session.catalog.type_count(), session.report.dictionary)?;
    loop {
        write!(out, "{}", config.repl.prompt)?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match line.split_once(char::is_whitespace).map_or((line, ""), |(command, rest)| (command, rest.trim())) {
            (".quit" | ".q", _) => break,
            (".help", _) => writeln!(out, "{}", HELP)?,
            (".scope", "") => writeln!(out, "{}", scope_name(&session, scope))?,
            (".scope", name) => match session.scope_named(name) {
                Some(next) => scope = next,
                None => writeln!(out, "error: no scope named '{}'", name)?,
            },
            (".types", _) => {
                for entry in session.catalog.types() {
                    writeln!(out, "{}", entry)?;
                }
            }
            (".symbols", _) => {
                for name in session.symbols.names() {
                    writeln!(out, "{}", name)?;
                }
            }
            (command, _) if command.starts_with('.') => writeln!(out, "error: unknown command '{}'", command)?,
            _ => evaluate_line(&session, scope, line, out)?,
        }
    }
    Ok(())
}

fn scope_name(session: &Session, scope: ScopeId) -> String {
    session.catalog.scope(scope).map(|info| info.display_name().to_string()).unwrap_or_else(|| scope.to_string())
}

fn evaluate_line(session: &Session, scope: ScopeId, name: &str, out: &mut dyn Write) -> Result<()> {
    match session.evaluate(scope, name) {
        Ok(Evaluation::Value(text)) | Ok(Evaluation::Declaration(text)) => writeln!(out, "{}", text)?,
        Err(err) => writeln!(out, "error: {}", err)?,
    }
    Ok(())
}
