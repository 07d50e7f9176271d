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

//! Dictionary files
//!
//! A dictionary is a JSON description of the types a library provides. Its
//! declarations are applied in order; later declarations may refer to names
//! introduced by earlier ones.

mod loader;

pub use loader::{DictionaryLoader, LoadReport, SkippedDeclaration};

use crate::error::ReflexResult;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Parsed dictionary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dictionary {
    pub name: String,
    #[serde(default)]
    pub declarations: Vec<Declaration>,
    /// Values made available to dynamic lookup
    #[serde(default)]
    pub symbols: Vec<SymbolDecl>,
}

/// One declaration. Names are fully qualified (`a::b::C`); missing enclosing
/// namespaces are created on the fly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Declaration {
    Fundamental {
        name: String,
        size: usize,
    },
    Namespace {
        name: String,
    },
    Class(ClassDecl),
    Struct(ClassDecl),
    Union(ClassDecl),
    Typedef {
        name: String,
        target: String,
    },
    Pointer {
        target: String,
    },
    Enum {
        name: String,
        #[serde(default)]
        key: Option<String>,
        #[serde(default = "default_underlying")]
        underlying: String,
        #[serde(default)]
        enumerators: Vec<EnumeratorDecl>,
    },
    Function {
        scope: String,
        name: String,
        signature: String,
        #[serde(default)]
        modifiers: Vec<String>,
    },
    DataMember {
        scope: String,
        name: String,
        #[serde(rename = "type")]
        ty: String,
        #[serde(default)]
        offset: usize,
        #[serde(default)]
        modifiers: Vec<String>,
    },
}

fn default_underlying() -> String {
    "int".to_string()
}

impl Declaration {
    /// Name the declaration introduces, for diagnostics
    pub fn name(&self) -> String {
        match self {
            Declaration::Fundamental { name, .. }
            | Declaration::Namespace { name }
            | Declaration::Typedef { name, .. }
            | Declaration::Enum { name, .. } => name.clone(),
            Declaration::Class(class) | Declaration::Struct(class) | Declaration::Union(class) => class.name.clone(),
            Declaration::Pointer { target } => format!("{} *", target),
            Declaration::Function { scope, name, .. } | Declaration::DataMember { scope, name, .. } => format!("{}::{}", scope, name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDecl {
    pub name: String,
    /// Mangled symbol; the qualified name is used when absent
    #[serde(default)]
    pub key: Option<String>,
    pub size: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumeratorDecl {
    pub name: String,
    pub value: i64,
}

/// A named value of a declared type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    pub value: serde_json::Value,
}

impl Dictionary {
    pub fn from_json(source: &str) -> ReflexResult<Self> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> ReflexResult<Self> {
        let source = fs::read_to_string(path)?;
        Self::from_json(&source)
    }
}
