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

//! Registration-time errors for the type catalog and scope tree
//!
//! Every variant describes a malformed dictionary declaration. They are
//! reported to whoever loaded the dictionary, which may skip the offending
//! declaration and keep loading the rest.

use crate::catalog::{TypeHandle, TypeKey, TypeKind};
use crate::scope::{ScopeId, ScopeKind};
use thiserror::Error;

/// Errors raised while populating a catalog
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReflexError {
    #[error("type {key} already registered as {existing_kind} ({existing_size} bytes), requested {requested_kind} ({requested_size} bytes)")]
    DuplicateKindMismatch {
        key: TypeKey,
        existing_kind: TypeKind,
        existing_size: usize,
        requested_kind: TypeKind,
        requested_size: usize,
    },

    #[error("scope '{name}' already declared as {existing}, requested {requested}")]
    ScopeKindMismatch { name: String, existing: ScopeKind, requested: ScopeKind },

    #[error("member '{name}' already bound in scope '{scope}'")]
    DuplicateMember { scope: String, name: String },

    #[error("unsupported size {size} for fundamental type '{name}'")]
    UnsupportedSize { name: String, size: usize },

    #[error("unknown scope {0}")]
    UnknownScope(ScopeId),

    #[error("unknown type: {0}")]
    UnknownType(String),

    #[error("type '{name}' cannot be the underlying type of enum '{enum_name}'")]
    InvalidUnderlyingType { enum_name: String, name: String },

    #[error("enum '{enum_name}' was declared over {existing}, not {requested}")]
    UnderlyingTypeMismatch { enum_name: String, existing: String, requested: String },

    #[error("scope '{scope}' already carries type {existing}, cannot attach {requested}")]
    TypeFacetConflict { scope: String, existing: TypeHandle, requested: TypeHandle },

    #[error("scope '{name}' is owned by another scope and cannot be added to '{scope}'")]
    ScopeReparent { scope: String, name: String },

    #[error("{kind} type '{name}' does not own a scope")]
    NotAScopeType { name: String, kind: TypeKind },

    #[error("type {0} is not registered in this catalog")]
    UnknownHandle(TypeHandle),

    #[error("dictionary error: {0}")]
    Dictionary(String),
}

impl From<serde_json::Error> for ReflexError {
    fn from(err: serde_json::Error) -> Self {
        ReflexError::Dictionary(err.to_string())
    }
}

impl From<std::io::Error> for ReflexError {
    fn from(err: std::io::Error) -> Self {
        ReflexError::Dictionary(err.to_string())
    }
}

/// Type alias for catalog operation results
pub type ReflexResult<T> = Result<T, ReflexError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_offender() {
        let err = ReflexError::DuplicateKindMismatch {
            key: TypeKey::mangled("_Z3Foo"),
            existing_kind: TypeKind::Class,
            existing_size: 8,
            requested_kind: TypeKind::Enum,
            requested_size: 4,
        };
        let message = err.to_string();
        assert!(message.contains("_Z3Foo"));
        assert!(message.contains("class"));
        assert!(message.contains("enum"));

        let err = ReflexError::UnsupportedSize { name: "int24".to_string(), size: 3 };
        assert_eq!(err.to_string(), "unsupported size 3 for fundamental type 'int24'");
    }

    #[test]
    fn test_json_error_converts_to_dictionary_error() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{ not json");
        let err: ReflexError = parse.unwrap_err().into();
        assert!(matches!(err, ReflexError::Dictionary(_)));
    }
}
