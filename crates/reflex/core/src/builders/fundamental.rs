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

//! Fundamental type construction and classification

use crate::catalog::{Catalog, CatalogState, RegistrationEvent, TypeEntry, TypeKey, TypeKind};
use crate::error::{ReflexError, ReflexResult};
use crate::scope::{ScopeId, ScopeMember};
use std::sync::Arc;
use tracing::{debug, info};

/// C++ fundamental types with their LP64 sizes
pub const BUILTIN_FUNDAMENTALS: &[(&str, usize)] = &[
    ("void", 0),
    ("bool", 1),
    ("char", 1),
    ("signed char", 1),
    ("unsigned char", 1),
    ("wchar_t", 4),
    ("short", 2),
    ("unsigned short", 2),
    ("int", 4),
    ("unsigned int", 4),
    ("long", 8),
    ("unsigned long", 8),
    ("long long", 8),
    ("unsigned long long", 8),
    ("float", 4),
    ("double", 8),
    ("long double", 16),
];

/// Broad category of a fundamental type, derived from its name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FundamentalClass {
    Void,
    Bool,
    Character,
    Signed,
    Unsigned,
    Floating,
}

impl FundamentalClass {
    /// Classify a fundamental type name. Both C++ spellings and Rust
    /// primitive names are recognised.
    pub fn classify(name: &str) -> Option<FundamentalClass> {
        let class = match name {
            "void" | "()" => FundamentalClass::Void,
            "bool" => FundamentalClass::Bool,
            "char" | "signed char" | "unsigned char" | "wchar_t" | "char16_t" | "char32_t" => FundamentalClass::Character,
            "short" | "short int" | "signed short" | "int" | "signed" | "signed int" | "long" | "long int" | "signed long" | "long long"
            | "long long int" | "signed long long" | "i8" | "i16" | "i32" | "i64" | "i128" | "isize" => FundamentalClass::Signed,
            "unsigned short" | "unsigned short int" | "unsigned" | "unsigned int" | "unsigned long" | "unsigned long int" | "unsigned long long"
            | "unsigned long long int" | "u8" | "u16" | "u32" | "u64" | "u128" | "usize" => FundamentalClass::Unsigned,
            "float" | "double" | "long double" | "f32" | "f64" => FundamentalClass::Floating,
            _ => return None,
        };
        Some(class)
    }

    /// Whether values of the named character type are unsigned
    pub fn is_unsigned_character(name: &str) -> bool {
        matches!(name, "unsigned char" | "char16_t" | "char32_t")
    }

    /// Whether the type can back an enum
    pub fn is_integral(self) -> bool {
        matches!(self, FundamentalClass::Bool | FundamentalClass::Character | FundamentalClass::Signed | FundamentalClass::Unsigned)
    }
}

impl CatalogState {
    /// Register a fundamental and bind it in the global scope unless the
    /// name is already taken there
    pub(crate) fn fundamental(&mut self, events: &mut Vec<RegistrationEvent>, key: TypeKey, name: &str, size: usize) -> ReflexResult<Arc<TypeEntry>> {
        let entry = self.register(events, key, TypeKind::Fundamental, size, name)?;
        match self.scopes.member(ScopeId::GLOBAL, name) {
            None => self.add_member(events, ScopeId::GLOBAL, name, ScopeMember::Type(entry.handle()))?,
            Some(ScopeMember::Type(handle)) if handle == entry.handle() => {}
            Some(other) => debug!(name, existing = other.describe(), "global name already bound, fundamental left unbound"),
        }
        Ok(entry)
    }
}

impl Catalog {
    fn check_width(&self, name: &str, size: usize) -> ReflexResult<()> {
        if self.config().supports_width(size) { Ok(()) } else { Err(ReflexError::UnsupportedSize { name: name.to_string(), size }) }
    }

    /// Register a fundamental type by name
    pub fn build_fundamental(&self, name: &str, size: usize) -> ReflexResult<Arc<TypeEntry>> {
        self.check_width(name, size)?;
        self.write(|state, events| state.fundamental(events, TypeKey::named(name), name, size))
    }

    /// Register a fundamental backed by the Rust type `T`
    pub fn build_fundamental_for<T: 'static>(&self, name: &str) -> ReflexResult<Arc<TypeEntry>> {
        let size = std::mem::size_of::<T>();
        self.check_width(name, size)?;
        self.write(|state, events| state.fundamental(events, TypeKey::of::<T>(), name, size))
    }

    /// Register every entry of [`BUILTIN_FUNDAMENTALS`]
    pub fn register_builtin_fundamentals(&self) -> ReflexResult<Vec<Arc<TypeEntry>>> {
        let entries = BUILTIN_FUNDAMENTALS.iter().map(|(name, size)| self.build_fundamental(name, *size)).collect::<ReflexResult<Vec<_>>>()?;
        info!(catalog = self.name(), count = entries.len(), "registered builtin fundamentals");
        Ok(entries)
    }
}
