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

//! Resolve command: look a single name up in a dictionary

use super::session::{Evaluation, Session};
use anyhow::{Result, anyhow};
use clap::Args;
use reflex_core::ReflexConfig;
use std::io::Write;
use std::path::PathBuf;

/// Arguments for the resolve command
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Dictionary file (JSON)
    #[arg(value_name = "DICTIONARY")]
    pub dictionary: PathBuf,

    /// Name to resolve, optionally qualified (`a::b::c`)
    pub name: String,

    /// Scope to start resolution from
    #[arg(long, default_value = "::")]
    pub scope: String,
}

/// Execute the resolve command
pub fn run_resolve(args: &ResolveArgs, config: &ReflexConfig, out: &mut dyn Write) -> Result<()> {
    let session = Session::open(&args.dictionary, config)?;
    let scope = session.scope_named(&args.scope).ok_or_else(|| anyhow!("unknown scope '{}'", args.scope))?;

    match session.evaluate(scope, &args.name)? {
        Evaluation::Value(text) | Evaluation::Declaration(text) => writeln!(out, "{}", text)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{TempDir, tempdir};

    fn dictionary() -> (TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("geo.json");
        std::fs::write(
            &path,
            r#"{
                "name": "geo",
                "declarations": [
                    { "kind": "fundamental", "name": "double", "size": 8 },
                    { "kind": "class", "name": "geo::Point", "size": 16 },
                    { "kind": "data_member", "scope": "geo::Point", "name": "x", "type": "double", "offset": 0, "modifiers": ["public"] },
                    { "kind": "typedef", "name": "geo::x", "target": "double" }
                ],
                "symbols": [{ "name": "scale", "type": "double", "value": 0.5 }]
            }"#,
        )
        .unwrap();
        (dir, path)
    }

    fn resolve(path: &PathBuf, name: &str, scope: &str) -> Result<String> {
        let args = ResolveArgs { dictionary: path.clone(), name: name.to_string(), scope: scope.to_string() };
        let mut out = Vec::new();
        run_resolve(&args, &ReflexConfig::default(), &mut out)?;
        Ok(String::from_utf8(out)?.trim_end().to_string())
    }

    #[test]
    fn test_resolve_from_scope() {
        let (_dir, path) = dictionary();
        assert_eq!(resolve(&path, "x", "geo::Point").unwrap(), "data member x : double at offset 0 [public]");
        assert_eq!(resolve(&path, "x", "geo").unwrap(), "typedef geo::x (8 bytes)");
        assert_eq!(resolve(&path, "geo::Point", "::").unwrap(), "class geo::Point (1 members, 16 bytes)");
    }

    #[test]
    fn test_falls_back_to_symbols() {
        let (_dir, path) = dictionary();
        assert_eq!(resolve(&path, "scale", "::").unwrap(), "(double) 0.5");

        let err = resolve(&path, "nothing", "::").unwrap_err();
        assert_eq!(err.to_string(), "use of undeclared identifier 'nothing'");
        assert!(resolve(&path, "x", "nowhere").is_err());
    }
}
