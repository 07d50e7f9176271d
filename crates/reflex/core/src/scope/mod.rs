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

//! Scope model
//!
//! Namespaces, classes and enums are scopes owning named members. Scopes
//! form a tree rooted at the global scope; a name that is not found in a
//! scope is looked up in its enclosing scopes, innermost first.

mod modifiers;
mod tree;

pub use modifiers::Modifiers;
pub(crate) use tree::{Declared, ScopeTree};

use crate::catalog::{TypeHandle, TypeKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle of a scope within a catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub(crate) u32);

impl ScopeId {
    /// The global scope of every catalog
    pub const GLOBAL: ScopeId = ScopeId(0);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scope#{}", self.0)
    }
}

/// Kind of a scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeKind {
    Namespace,
    Class,
    Struct,
    Union,
    Enum,
}

impl ScopeKind {
    /// Scope kind carried by a type of the given kind, if any
    pub fn for_type(kind: TypeKind) -> Option<ScopeKind> {
        match kind {
            TypeKind::Class | TypeKind::TypeTemplateInstance => Some(ScopeKind::Class),
            TypeKind::Struct => Some(ScopeKind::Struct),
            TypeKind::Union => Some(ScopeKind::Union),
            TypeKind::Enum => Some(ScopeKind::Enum),
            _ => None,
        }
    }
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScopeKind::Namespace => "namespace",
            ScopeKind::Class => "class",
            ScopeKind::Struct => "struct",
            ScopeKind::Union => "union",
            ScopeKind::Enum => "enum",
        };
        f.write_str(name)
    }
}

/// Something bound to a name inside a scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeMember {
    /// A type without a scope of its own (fundamental, typedef, pointer...)
    Type(TypeHandle),
    /// A nested namespace, class or enum
    Scope(ScopeId),
    Enumerator { owner: TypeHandle, value: i64 },
    Function { signature: TypeHandle, modifiers: Modifiers },
    DataMember { ty: TypeHandle, offset: usize, modifiers: Modifiers },
}

impl ScopeMember {
    pub fn as_scope(&self) -> Option<ScopeId> {
        match self {
            ScopeMember::Scope(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_type(&self) -> Option<TypeHandle> {
        match self {
            ScopeMember::Type(handle) => Some(*handle),
            _ => None,
        }
    }

    /// Type handle the member refers to, if any
    pub(crate) fn referenced_type(&self) -> Option<TypeHandle> {
        match self {
            ScopeMember::Type(handle) => Some(*handle),
            ScopeMember::Scope(_) => None,
            ScopeMember::Enumerator { owner, .. } => Some(*owner),
            ScopeMember::Function { signature, .. } => Some(*signature),
            ScopeMember::DataMember { ty, .. } => Some(*ty),
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            ScopeMember::Type(_) => "type",
            ScopeMember::Scope(_) => "scope",
            ScopeMember::Enumerator { .. } => "enumerator",
            ScopeMember::Function { .. } => "function",
            ScopeMember::DataMember { .. } => "data member",
        }
    }
}

/// Snapshot of a scope's attributes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeInfo {
    pub id: ScopeId,
    pub name: String,
    /// `a::b::C`, empty for the global scope
    pub qualified_name: String,
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    /// Type entry of a class or enum scope
    pub type_facet: Option<TypeHandle>,
    pub member_count: usize,
}

impl ScopeInfo {
    pub fn is_global(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_type(&self) -> bool {
        self.type_facet.is_some()
    }

    /// Qualified name as printed in diagnostics
    pub fn display_name(&self) -> &str {
        if self.qualified_name.is_empty() { "::" } else { &self.qualified_name }
    }
}
