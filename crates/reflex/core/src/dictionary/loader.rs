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

//! Applying dictionaries to a catalog

use super::{ClassDecl, Declaration, Dictionary, SymbolDecl};
use crate::builders::FundamentalClass;
use crate::catalog::{Catalog, TypeEntry, TypeKey, TypeKind};
use crate::error::{ReflexError, ReflexResult};
use crate::lookup::SymbolTable;
use crate::scope::{Modifiers, ScopeId, ScopeKind, ScopeMember};
use crate::value::{Scalar, Value};
use metrics::counter;
use std::sync::Arc;
use tracing::{debug, info, warn};

const POINTER_SIZE: usize = std::mem::size_of::<usize>();

/// A declaration that could not be applied
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedDeclaration {
    pub index: usize,
    pub name: String,
    pub error: ReflexError,
}

/// Outcome of loading a dictionary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub dictionary: String,
    pub applied: usize,
    pub skipped: Vec<SkippedDeclaration>,
}

impl LoadReport {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    fn record(&mut self, index: usize, name: String, result: ReflexResult<()>) {
        match result {
            Ok(()) => self.applied += 1,
            Err(error) => {
                warn!(dictionary = %self.dictionary, index, name = %name, error = %error, "skipping declaration");
                counter!("reflex_dictionary_declarations_skipped", 1);
                self.skipped.push(SkippedDeclaration { index, name, error });
            }
        }
    }
}

/// Applies dictionary declarations one at a time, skipping those that fail
pub struct DictionaryLoader;

impl DictionaryLoader {
    /// Apply every declaration of `dictionary` in order
    pub fn load(catalog: &Catalog, dictionary: &Dictionary) -> LoadReport {
        let mut report = LoadReport { dictionary: dictionary.name.clone(), ..LoadReport::default() };
        for (index, declaration) in dictionary.declarations.iter().enumerate() {
            report.record(index, declaration.name(), Self::apply(catalog, declaration));
        }
        info!(dictionary = %dictionary.name, applied = report.applied, skipped = report.skipped.len(), "loaded dictionary");
        report
    }

    /// Define the dictionary's symbols in `table`
    pub fn load_symbols(catalog: &Catalog, dictionary: &Dictionary, table: &SymbolTable) -> LoadReport {
        let mut report = LoadReport { dictionary: dictionary.name.clone(), ..LoadReport::default() };
        for (index, symbol) in dictionary.symbols.iter().enumerate() {
            let result = symbol_value(catalog, symbol).map(|value| {
                table.insert(symbol.name.clone(), value);
            });
            report.record(index, symbol.name.clone(), result);
        }
        report
    }

    pub fn apply(catalog: &Catalog, declaration: &Declaration) -> ReflexResult<()> {
        match declaration {
            Declaration::Fundamental { name, size } => catalog.build_fundamental(name, *size).map(drop),
            Declaration::Namespace { name } => ensure_namespace(catalog, name).map(drop),
            Declaration::Class(class) => declare_class(catalog, class, TypeKind::Class),
            Declaration::Struct(class) => declare_class(catalog, class, TypeKind::Struct),
            Declaration::Union(class) => declare_class(catalog, class, TypeKind::Union),
            Declaration::Typedef { name, target } => {
                let target = require_type(catalog, target)?;
                let (parent, simple) = split_qualified(name);
                let parent = ensure_namespace(catalog, parent)?;
                let entry = catalog.register(TypeKey::named(name.as_str()), TypeKind::Typedef, target.size(), name)?;
                catalog.add_member(parent, simple, ScopeMember::Type(entry.handle()))
            }
            Declaration::Pointer { target } => {
                require_type(catalog, target)?;
                let name = format!("{} *", target);
                catalog.register(TypeKey::named(name.as_str()), TypeKind::Pointer, POINTER_SIZE, &name).map(drop)
            }
            Declaration::Enum { name, key, underlying, enumerators } => {
                let (parent, simple) = split_qualified(name);
                let parent = ensure_namespace(catalog, parent)?;
                let entry = catalog.build_enum(parent, simple, type_key(key.as_deref(), name), underlying)?;
                let existing = catalog.enumerators(&entry);
                for enumerator in enumerators {
                    if existing.iter().any(|e| e.name == enumerator.name && e.value == enumerator.value) {
                        continue;
                    }
                    catalog.add_enumerator(&entry, &enumerator.name, enumerator.value)?;
                }
                Ok(())
            }
            Declaration::Function { scope, name, signature, modifiers } => {
                let scope = require_scope(catalog, scope)?;
                let modifiers = parse_modifiers(modifiers)?;
                let signature = catalog.register(TypeKey::named(signature.as_str()), TypeKind::Function, 0, signature)?;
                catalog.add_member(scope, name, ScopeMember::Function { signature: signature.handle(), modifiers })
            }
            Declaration::DataMember { scope, name, ty, offset, modifiers } => {
                let scope = require_scope(catalog, scope)?;
                let modifiers = parse_modifiers(modifiers)?;
                let ty = require_type(catalog, ty)?;
                catalog.add_member(scope, name, ScopeMember::DataMember { ty: ty.handle(), offset: *offset, modifiers })
            }
        }
    }
}

/// `a::b::C` into (`a::b`, `C`)
fn split_qualified(name: &str) -> (&str, &str) {
    let name = name.strip_prefix("::").unwrap_or(name);
    name.rsplit_once("::").unwrap_or(("", name))
}

fn type_key(key: Option<&str>, name: &str) -> TypeKey {
    match key {
        Some(symbol) => TypeKey::mangled(symbol),
        None => TypeKey::named(name.strip_prefix("::").unwrap_or(name)),
    }
}

fn declare_class(catalog: &Catalog, class: &ClassDecl, kind: TypeKind) -> ReflexResult<()> {
    let (parent, simple) = split_qualified(&class.name);
    let parent = ensure_namespace(catalog, parent)?;
    catalog.declare_class(parent, simple, type_key(class.key.as_deref(), &class.name), kind, class.size).map(drop)
}

/// Find the scope `path`, declaring missing components as namespaces
fn ensure_namespace(catalog: &Catalog, path: &str) -> ReflexResult<ScopeId> {
    let path = path.strip_prefix("::").unwrap_or(path);
    if let Some(id) = catalog.scope_by_name(path) {
        return Ok(id);
    }
    let mut current = catalog.global_scope();
    let mut prefix = String::new();
    for component in path.split("::") {
        if !prefix.is_empty() {
            prefix.push_str("::");
        }
        prefix.push_str(component);
        current = match catalog.scope_by_name(&prefix) {
            Some(id) => id,
            None => {
                debug!(scope = %prefix, "declaring namespace");
                catalog.declare_scope(current, component, ScopeKind::Namespace)?
            }
        };
    }
    Ok(current)
}

fn require_scope(catalog: &Catalog, name: &str) -> ReflexResult<ScopeId> {
    catalog.scope_by_name(name).ok_or_else(|| ReflexError::UnknownType(name.to_string()))
}

fn require_type(catalog: &Catalog, name: &str) -> ReflexResult<Arc<TypeEntry>> {
    catalog.lookup_name(name).ok_or_else(|| ReflexError::UnknownType(name.to_string()))
}

fn parse_modifiers(names: &[String]) -> ReflexResult<Modifiers> {
    Modifiers::from_names(names.iter().map(String::as_str)).map_err(|unknown| ReflexError::Dictionary(format!("unknown modifier '{}'", unknown)))
}

fn symbol_value(catalog: &Catalog, symbol: &SymbolDecl) -> ReflexResult<Value> {
    let entry = require_type(catalog, &symbol.ty)?;
    let json = &symbol.value;
    let mismatch = || ReflexError::Dictionary(format!("value {} of symbol '{}' does not fit type '{}'", json, symbol.name, entry.name()));

    let scalar = match entry.kind() {
        TypeKind::Fundamental => match FundamentalClass::classify(entry.simple_name()) {
            Some(FundamentalClass::Void) => return Ok(Value::empty(entry.handle())),
            Some(FundamentalClass::Bool) => json.as_bool().map(Scalar::Bool),
            Some(FundamentalClass::Character) => json.as_i64().or_else(|| single_char(json)).map(Scalar::Signed),
            Some(FundamentalClass::Signed) => json.as_i64().map(Scalar::Signed),
            Some(FundamentalClass::Unsigned) => json.as_u64().map(Scalar::Unsigned),
            Some(FundamentalClass::Floating) if entry.size() == 4 => json.as_f64().map(|v| Scalar::F32(v as f32)),
            Some(FundamentalClass::Floating) => json.as_f64().map(Scalar::F64),
            None => None,
        },
        TypeKind::Enum => json.as_i64().or_else(|| enumerator_value(catalog, &entry, json)).map(Scalar::Signed),
        TypeKind::Pointer => (if json.is_null() { Some(0) } else { json.as_u64() }).map(Scalar::Address),
        _ => {
            let bytes = json.as_array().and_then(|items| items.iter().map(|item| item.as_u64().and_then(|b| u8::try_from(b).ok())).collect::<Option<Vec<u8>>>());
            return bytes.map(|bytes| Value::bytes(entry.handle(), bytes)).ok_or_else(mismatch);
        }
    };
    scalar.map(|scalar| Value::scalar(entry.handle(), scalar)).ok_or_else(mismatch)
}

fn single_char(json: &serde_json::Value) -> Option<i64> {
    let text = json.as_str()?;
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c as i64),
        _ => None,
    }
}

fn enumerator_value(catalog: &Catalog, entry: &TypeEntry, json: &serde_json::Value) -> Option<i64> {
    let name = json.as_str()?;
    let entry = catalog.enum_entry(entry.handle())?;
    catalog.enumerators(&entry).into_iter().find(|e| e.name == name).map(|e| e.value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geo() -> Dictionary {
        Dictionary::from_json(
            r#"{
                "name": "geo",
                "declarations": [
                    { "kind": "fundamental", "name": "int", "size": 4 },
                    { "kind": "fundamental", "name": "double", "size": 8 },
                    { "kind": "namespace", "name": "geo::detail" },
                    { "kind": "class", "name": "geo::Point", "key": "_ZN3geo5PointE", "size": 16 },
                    { "kind": "data_member", "scope": "geo::Point", "name": "x", "type": "double", "offset": 0, "modifiers": ["public"] },
                    { "kind": "data_member", "scope": "geo::Point", "name": "y", "type": "double", "offset": 8, "modifiers": ["public"] },
                    { "kind": "function", "scope": "geo::Point", "name": "norm", "signature": "double ()", "modifiers": ["public", "const"] },
                    { "kind": "typedef", "name": "geo::Coord", "target": "double" },
                    { "kind": "pointer", "target": "geo::Point" },
                    { "kind": "enum", "name": "geo::Color", "enumerators": [
                        { "name": "Red", "value": 0 }, { "name": "Green", "value": 1 }
                    ] }
                ],
                "symbols": [
                    { "name": "answer", "type": "int", "value": 42 },
                    { "name": "favorite", "type": "geo::Color", "value": "Green" },
                    { "name": "origin", "type": "geo::Point *", "value": null }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_load_full_dictionary() {
        let catalog = Catalog::new("test");
        let report = DictionaryLoader::load(&catalog, &geo());
        assert!(report.is_complete(), "{:?}", report.skipped);
        assert_eq!(report.applied, 10);

        let global = catalog.global_scope();
        assert!(catalog.scope_by_name("geo::detail").is_some());
        assert!(matches!(catalog.resolve_qualified(global, "geo::Point::y"), Some(ScopeMember::DataMember { offset: 8, .. })));
        match catalog.resolve_qualified(global, "geo::Point::norm") {
            Some(ScopeMember::Function { modifiers, .. }) => assert!(modifiers.contains(Modifiers::CONST)),
            other => panic!("unexpected member {:?}", other),
        }
        assert_eq!(catalog.lookup_name("geo::Coord").unwrap().size(), 8);
        assert_eq!(catalog.lookup_name("geo::Point *").unwrap().kind(), TypeKind::Pointer);
        assert_eq!(catalog.lookup(&TypeKey::mangled("_ZN3geo5PointE")).unwrap().name(), "geo::Point");
    }

    #[test]
    fn test_reload_is_idempotent() {
        let catalog = Catalog::new("test");
        DictionaryLoader::load(&catalog, &geo());
        let types = catalog.type_count();

        let report = DictionaryLoader::load(&catalog, &geo());
        assert!(report.is_complete(), "{:?}", report.skipped);
        assert_eq!(catalog.type_count(), types);
    }

    #[test]
    fn test_bad_declarations_are_skipped() {
        let dictionary = Dictionary::from_json(
            r#"{
                "name": "broken",
                "declarations": [
                    { "kind": "fundamental", "name": "int", "size": 4 },
                    { "kind": "fundamental", "name": "int24", "size": 3 },
                    { "kind": "typedef", "name": "Alias", "target": "Missing" },
                    { "kind": "data_member", "scope": "Nowhere", "name": "x", "type": "int" },
                    { "kind": "class", "name": "Shape", "size": 8 },
                    { "kind": "enum", "name": "Shape", "underlying": "int" },
                    { "kind": "data_member", "scope": "Shape", "name": "sides", "type": "int", "modifiers": ["mutable"] },
                    { "kind": "data_member", "scope": "Shape", "name": "id", "type": "int", "offset": 4 }
                ]
            }"#,
        )
        .unwrap();

        let catalog = Catalog::new("test");
        let report = DictionaryLoader::load(&catalog, &dictionary);

        assert_eq!(report.applied, 3);
        let skipped: Vec<usize> = report.skipped.iter().map(|s| s.index).collect();
        assert_eq!(skipped, [1, 2, 3, 5, 6]);
        assert!(matches!(report.skipped[0].error, ReflexError::UnsupportedSize { size: 3, .. }));
        assert!(matches!(report.skipped[1].error, ReflexError::UnknownType(_)));
        assert!(matches!(report.skipped[4].error, ReflexError::Dictionary(_)));

        assert_eq!(catalog.lookup_name("Shape").unwrap().kind(), TypeKind::Class);
        assert!(catalog.resolve_qualified(catalog.global_scope(), "Shape::id").is_some());
    }

    #[test]
    fn test_symbols() {
        let catalog = Catalog::new("test");
        let dictionary = geo();
        DictionaryLoader::load(&catalog, &dictionary);

        let table = SymbolTable::new();
        let report = DictionaryLoader::load_symbols(&catalog, &dictionary, &table);
        assert!(report.is_complete(), "{:?}", report.skipped);

        assert_eq!(table.get("answer").unwrap().as_scalar(), Some(Scalar::Signed(42)));
        assert_eq!(table.get("favorite").unwrap().as_scalar(), Some(Scalar::Signed(1)));
        assert_eq!(table.get("origin").unwrap().as_scalar(), Some(Scalar::Address(0)));
    }

    #[test]
    fn test_split_qualified() {
        assert_eq!(split_qualified("a::b::C"), ("a::b", "C"));
        assert_eq!(split_qualified("::C"), ("", "C"));
        assert_eq!(split_qualified("C"), ("", "C"));
    }
}
