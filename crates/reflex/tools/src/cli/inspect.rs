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

//! Inspect command: load a dictionary and dump the resulting catalog

use super::session::Session;
use anyhow::Result;
use clap::Args;
use reflex_core::{ReflexConfig, ScopeId, ScopeMember};
use std::io::Write;
use std::path::PathBuf;

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Dictionary file (JSON)
    #[arg(value_name = "DICTIONARY")]
    pub dictionary: PathBuf,

    /// Only list types, not the scope tree
    #[arg(long)]
    pub types_only: bool,
}

/// Execute the inspect command
pub fn run_inspect(args: &InspectArgs, config: &ReflexConfig, out: &mut dyn Write) -> Result<()> {
    let session = Session::open(&args.dictionary, config)?;
    let catalog = &session.catalog;

    writeln!(out, "dictionary: {}", session.report.dictionary)?;
    writeln!(out, "declarations applied: {}, skipped: {}", session.report.applied, session.report.skipped.len())?;
    for skipped in &session.report.skipped {
        writeln!(out, "  skipped #{} {}: {}", skipped.index, skipped.name, skipped.error)?;
    }
    writeln!(out, "symbols defined: {}, skipped: {}", session.symbol_report.applied, session.symbol_report.skipped.len())?;
    for skipped in &session.symbol_report.skipped {
        writeln!(out, "  skipped symbol #{} {}: {}", skipped.index, skipped.name, skipped.error)?;
    }

    writeln!(out, "\ntypes ({}):", catalog.type_count())?;
    for entry in catalog.types() {
        writeln!(out, "  {:>4}  {:<18} {:>5}  {}", entry.handle(), entry.kind(), entry.size(), entry.name())?;
    }

    if !args.types_only {
        writeln!(out, "\nscopes:")?;
        write_scope(&session, catalog.global_scope(), 1, out)?;
    }

    if !session.symbols.is_empty() {
        writeln!(out, "\nsymbols:")?;
        for name in session.symbols.names() {
            if let Some(value) = session.symbols.get(&name) {
                writeln!(out, "  {} = {}", name, session.format_value(&value))?;
            }
        }
    }
    Ok(())
}

fn write_scope(session: &Session, id: ScopeId, depth: usize, out: &mut dyn Write) -> Result<()> {
    let catalog = &session.catalog;
    let Some(info) = catalog.scope(id) else {
        return Ok(());
    };
    let indent = "  ".repeat(depth);
    writeln!(out, "{}{} {}", indent, info.kind, info.display_name())?;

    for (name, member) in catalog.members(id).unwrap_or_default() {
        match member {
            ScopeMember::Scope(child) => write_scope(session, child, depth + 1, out)?,
            ScopeMember::Enumerator { value, .. } => writeln!(out, "{}  {} = {}", indent, name, value)?,
            other => writeln!(out, "{}  {} {}", indent, other.describe(), name)?,
        }
    }
    Ok(())
}
