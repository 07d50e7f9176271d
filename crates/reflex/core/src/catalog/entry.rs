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

//! Type identities and catalog entries

use serde::{Deserialize, Serialize};
use std::any::TypeId;
use std::fmt;

/// Unique identity of a type within a catalog
///
/// Registering the same key twice yields the same entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeKey {
    /// A Rust type, identified by its `TypeId`
    Native { id: TypeId, name: &'static str },
    /// A mangled symbol name supplied by a dictionary
    Mangled(String),
    /// A plain name, used for types that only have a name (fundamentals built by name)
    Named(String),
}

impl TypeKey {
    pub fn of<T: ?Sized + 'static>() -> Self {
        TypeKey::Native { id: TypeId::of::<T>(), name: std::any::type_name::<T>() }
    }

    pub fn mangled(symbol: impl Into<String>) -> Self {
        TypeKey::Mangled(symbol.into())
    }

    pub fn named(name: impl Into<String>) -> Self {
        TypeKey::Named(name.into())
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeKey::Native { name, .. } => write!(f, "native:{}", name),
            TypeKey::Mangled(symbol) => write!(f, "{}", symbol),
            TypeKey::Named(name) => write!(f, "name:{}", name),
        }
    }
}

/// Catalog-local handle of a registered type (its registration index)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeHandle(pub(crate) u32);

impl TypeHandle {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&format!("#{}", self.0))
    }
}

/// Kind of a registered type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Class,
    Struct,
    Enum,
    Function,
    Array,
    Fundamental,
    Pointer,
    PointerToMember,
    Typedef,
    Union,
    TypeTemplateInstance,
    Unresolved,
}

impl TypeKind {
    /// Kinds whose entries also own a scope
    pub fn is_scoped(self) -> bool {
        matches!(self, TypeKind::Class | TypeKind::Struct | TypeKind::Union | TypeKind::Enum | TypeKind::TypeTemplateInstance)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Struct => "struct",
            TypeKind::Enum => "enum",
            TypeKind::Function => "function",
            TypeKind::Array => "array",
            TypeKind::Fundamental => "fundamental",
            TypeKind::Pointer => "pointer",
            TypeKind::PointerToMember => "pointer to member",
            TypeKind::Typedef => "typedef",
            TypeKind::Union => "union",
            TypeKind::TypeTemplateInstance => "template instance",
            TypeKind::Unresolved => "unresolved",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A registered type
///
/// Entries are immutable once registered. Members hang off the scope that
/// carries the entry as its type facet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeEntry {
    handle: TypeHandle,
    key: TypeKey,
    kind: TypeKind,
    size: usize,
    name: String,
}

impl TypeEntry {
    pub(crate) fn new(handle: TypeHandle, key: TypeKey, kind: TypeKind, size: usize, name: String) -> Self {
        Self { handle, key, kind, size, name }
    }

    pub fn handle(&self) -> TypeHandle {
        self.handle
    }

    pub fn key(&self) -> &TypeKey {
        &self.key
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Size in bytes
    pub fn size(&self) -> usize {
        self.size
    }

    /// Canonical (fully qualified) name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unqualified name, the part after the last `::`
    pub fn simple_name(&self) -> &str {
        self.name.rsplit("::").next().unwrap_or(&self.name)
    }

    pub fn is_fundamental(&self) -> bool {
        self.kind == TypeKind::Fundamental
    }

    pub fn is_enum(&self) -> bool {
        self.kind == TypeKind::Enum
    }
}

impl fmt::Display for TypeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({} bytes)", self.kind, self.name, self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_keys_follow_rust_type_identity() {
        assert_eq!(TypeKey::of::<i32>(), TypeKey::of::<i32>());
        assert_ne!(TypeKey::of::<i32>(), TypeKey::of::<u32>());
        assert!(TypeKey::of::<i32>().to_string().contains("i32"));
    }

    #[test]
    fn test_simple_name() {
        let entry = TypeEntry::new(TypeHandle(0), TypeKey::mangled("_ZN3geo5PointE"), TypeKind::Class, 16, "geo::Point".to_string());
        assert_eq!(entry.simple_name(), "Point");
        assert_eq!(entry.to_string(), "class geo::Point (16 bytes)");
    }

    #[test]
    fn test_scoped_kinds() {
        assert!(TypeKind::Class.is_scoped());
        assert!(TypeKind::Enum.is_scoped());
        assert!(!TypeKind::Fundamental.is_scoped());
        assert!(!TypeKind::Typedef.is_scoped());
    }
}
