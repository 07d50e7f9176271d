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

//! Type-directed value printing
//!
//! Formatters are looked up by exact type key first, then by type kind.
//! Values of any other type go through a generic fallback, so printing
//! always produces output.

mod formatters;

use crate::catalog::{Catalog, TypeEntry, TypeKey, TypeKind};
use crate::value::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Everything a formatter gets to see
pub struct PrintContext<'a> {
    pub catalog: &'a Catalog,
    pub value: &'a Value,
    pub entry: &'a TypeEntry,
}

/// A formatter for one type or kind
pub type Formatter = Arc<dyn Fn(&PrintContext<'_>, &mut dyn fmt::Write) -> fmt::Result + Send + Sync>;

/// Registry of formatters
#[derive(Clone)]
pub struct ValuePrinter {
    by_key: HashMap<TypeKey, Formatter>,
    by_kind: HashMap<TypeKind, Formatter>,
}

impl Default for ValuePrinter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ValuePrinter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValuePrinter").field("keys", &self.by_key.len()).field("kinds", &self.by_kind.keys().collect::<Vec<_>>()).finish()
    }
}

impl ValuePrinter {
    /// Printer with formatters for fundamentals, enums and pointers
    pub fn new() -> Self {
        let mut printer = Self::bare();
        printer.register_kind(TypeKind::Fundamental, Arc::new(formatters::fundamental));
        printer.register_kind(TypeKind::Enum, Arc::new(formatters::enumeration));
        printer.register_kind(TypeKind::Pointer, Arc::new(formatters::pointer));
        printer
    }

    /// Printer that only knows the fallback
    pub fn bare() -> Self {
        Self { by_key: HashMap::new(), by_kind: HashMap::new() }
    }

    pub fn register_key(&mut self, key: TypeKey, formatter: Formatter) -> Option<Formatter> {
        self.by_key.insert(key, formatter)
    }

    pub fn register_kind(&mut self, kind: TypeKind, formatter: Formatter) -> Option<Formatter> {
        self.by_kind.insert(kind, formatter)
    }

    /// Print `value`, resolving its type through `catalog`
    pub fn format(&self, catalog: &Catalog, value: &Value, out: &mut dyn fmt::Write) -> fmt::Result {
        match catalog.by_handle(value.ty()) {
            Some(entry) => self.format_with(value, &entry, catalog, out),
            None => write!(out, "(<unknown type {}>)", value.ty()),
        }
    }

    pub fn format_with(&self, value: &Value, entry: &TypeEntry, catalog: &Catalog, out: &mut dyn fmt::Write) -> fmt::Result {
        let ctx = PrintContext { catalog, value, entry };
        match self.by_key.get(entry.key()).or_else(|| self.by_kind.get(&entry.kind())) {
            Some(formatter) => formatter(&ctx, out),
            None => formatters::fallback(&ctx, out),
        }
    }

    pub fn to_display_string(&self, catalog: &Catalog, value: &Value) -> String {
        let mut out = String::new();
        // writing into a String cannot fail unless a formatter reports an error
        if self.format(catalog, value, &mut out).is_err() {
            out.push_str(" <formatting error>");
        }
        out
    }
}
