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

//! Name to value table usable as a lookup callback

use super::{DynamicLookup, InterpreterCallbacks, LookupError};
use crate::value::Value;
use indexmap::IndexMap;
use parking_lot::RwLock;

/// Symbols known to a session, in definition order
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: RwLock<IndexMap<String, Value>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define or redefine `name`, returning the previous value
    pub fn insert(&self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.symbols.write().insert(name.into(), value)
    }

    pub fn remove(&self, name: &str) -> Option<Value> {
        self.symbols.write().shift_remove(name)
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.symbols.read().get(name).cloned()
    }

    pub fn names(&self) -> Vec<String> {
        self.symbols.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.symbols.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.read().is_empty()
    }
}

impl InterpreterCallbacks for SymbolTable {
    fn lookup_object(&self, name: &str, _lookup: &DynamicLookup) -> Result<Option<Value>, LookupError> {
        Ok(self.get(name.strip_prefix("::").unwrap_or(name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TypeHandle;
    use crate::value::Scalar;
    use std::sync::Arc;

    #[test]
    fn test_table_as_resolver() {
        let table = Arc::new(SymbolTable::new());
        table.insert("answer", Value::scalar(TypeHandle(0), Scalar::Signed(42)));
        table.insert("pi", Value::scalar(TypeHandle(1), Scalar::F64(2.5)));

        let lookup = DynamicLookup::new();
        lookup.register(table.clone());

        assert_eq!(lookup.lookup_object("::answer").unwrap().as_scalar(), Some(Scalar::Signed(42)));
        assert!(matches!(lookup.lookup_object("tau"), Err(LookupError::UnresolvedSymbol(_))));
        assert_eq!(table.names(), ["answer", "pi"]);

        table.remove("answer");
        assert!(lookup.lookup_object("answer").is_err());
        assert_eq!(table.len(), 1);
    }
}
