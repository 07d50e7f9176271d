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

//! A dictionary loaded into a fresh catalog, with dynamic lookup over its symbols

use anyhow::{Context, Result};
use reflex_core::{
    Catalog, Dictionary, DictionaryLoader, DynamicLookup, LoadReport, LookupError, Modifiers, ReflexConfig, Scalar, ScopeId, ScopeMember, SymbolTable,
    TypeHandle, Value, ValuePrinter, lookup_bounded,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

pub struct Session {
    pub catalog: Arc<Catalog>,
    pub lookup: Arc<DynamicLookup>,
    pub symbols: Arc<SymbolTable>,
    pub printer: ValuePrinter,
    pub report: LoadReport,
    pub symbol_report: LoadReport,
}

/// What a name evaluated to
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    /// A value, already formatted
    Value(String),
    /// A declaration found through the scope tree
    Declaration(String),
}

impl Session {
    pub fn open(path: &Path, config: &ReflexConfig) -> Result<Self> {
        let dictionary = Dictionary::load(path).with_context(|| format!("loading dictionary {}", path.display()))?;
        Ok(Self::from_dictionary(&dictionary, config))
    }

    pub fn from_dictionary(dictionary: &Dictionary, config: &ReflexConfig) -> Self {
        let catalog = Arc::new(Catalog::with_config(config.catalog.clone()));
        let report = DictionaryLoader::load(&catalog, dictionary);

        let symbols = Arc::new(SymbolTable::new());
        let symbol_report = DictionaryLoader::load_symbols(&catalog, dictionary, &symbols);

        let lookup = Arc::new(DynamicLookup::with_config(config.lookup.clone()));
        lookup.register(symbols.clone());
        info!(dictionary = %dictionary.name, types = catalog.type_count(), symbols = symbols.len(), "session ready");

        Self { catalog, lookup, symbols, printer: ValuePrinter::new(), report, symbol_report }
    }

    pub fn scope_named(&self, name: &str) -> Option<ScopeId> {
        if name.is_empty() || name == "::" { Some(self.catalog.global_scope()) } else { self.catalog.scope_by_name(name) }
    }

    pub fn format_value(&self, value: &Value) -> String {
        self.printer.to_display_string(&self.catalog, value)
    }

    /// Resolve `name` from `scope` through the scope tree, falling back to dynamic lookup
    pub fn evaluate(&self, scope: ScopeId, name: &str) -> Result<Evaluation, LookupError> {
        if let Some(member) = self.catalog.resolve_qualified(scope, name) {
            debug!(name, member = member.describe(), "resolved statically");
            return Ok(self.describe(name, member));
        }
        let value = lookup_bounded(&self.lookup, name)?;
        Ok(Evaluation::Value(self.format_value(&value)))
    }

    fn type_name(&self, handle: TypeHandle) -> String {
        self.catalog.by_handle(handle).map(|entry| entry.name().to_string()).unwrap_or_else(|| handle.to_string())
    }

    fn describe(&self, name: &str, member: ScopeMember) -> Evaluation {
        match member {
            ScopeMember::Enumerator { owner, value } => Evaluation::Value(self.format_value(&Value::scalar(owner, Scalar::Signed(value)))),
            ScopeMember::Type(handle) => match self.catalog.by_handle(handle) {
                Some(entry) => Evaluation::Declaration(entry.to_string()),
                None => Evaluation::Declaration(format!("type {}", handle)),
            },
            ScopeMember::Scope(id) => match self.catalog.scope(id) {
                Some(info) => {
                    let facet = info.type_facet.and_then(|handle| self.catalog.by_handle(handle));
                    let size = facet.map(|entry| format!(", {} bytes", entry.size())).unwrap_or_default();
                    Evaluation::Declaration(format!("{} {} ({} members{})", info.kind, info.display_name(), info.member_count, size))
                }
                None => Evaluation::Declaration(id.to_string()),
            },
            ScopeMember::Function { signature, modifiers } => {
                Evaluation::Declaration(format!("function {} : {}{}", name, self.type_name(signature), qualifiers(modifiers)))
            }
            ScopeMember::DataMember { ty, offset, modifiers } => {
                Evaluation::Declaration(format!("data member {} : {} at offset {}{}", name, self.type_name(ty), offset, qualifiers(modifiers)))
            }
        }
    }
}

fn qualifiers(modifiers: Modifiers) -> String {
    if modifiers.is_empty() { String::new() } else { format!(" [{}]", modifiers) }
}
