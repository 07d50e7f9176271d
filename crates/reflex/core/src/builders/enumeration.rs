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

//! Enum types
//!
//! An enum is both a type and a scope: its entry has kind [`TypeKind::Enum`]
//! and its enumerators are members of the scope carrying that entry.

use super::FundamentalClass;
use crate::catalog::{Catalog, CatalogState, RegistrationEvent, TypeEntry, TypeHandle, TypeKey, TypeKind};
use crate::error::{ReflexError, ReflexResult};
use crate::scope::{ScopeId, ScopeMember};
use std::sync::Arc;

/// An enum's type entry together with its scope
#[derive(Debug, Clone, PartialEq)]
pub struct EnumEntry {
    pub ty: Arc<TypeEntry>,
    pub scope: ScopeId,
    pub underlying: TypeHandle,
}

impl EnumEntry {
    pub fn handle(&self) -> TypeHandle {
        self.ty.handle()
    }

    pub fn name(&self) -> &str {
        self.ty.name()
    }
}

/// A named enum constant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enumerator {
    pub name: String,
    pub value: i64,
}

impl CatalogState {
    fn enumeration(&mut self, events: &mut Vec<RegistrationEvent>, parent: ScopeId, name: &str, key: TypeKey, base: Arc<TypeEntry>) -> ReflexResult<EnumEntry> {
        let integral = base.is_fundamental() && FundamentalClass::classify(base.simple_name()).is_some_and(FundamentalClass::is_integral);
        if !integral {
            return Err(ReflexError::InvalidUnderlyingType { enum_name: name.to_string(), name: base.name().to_string() });
        }

        // a re-declaration must name the underlying type it was first built with
        if let Some(existing) = self.types.lookup(&key).and_then(|entry| self.enum_underlying.get(&entry.handle()).copied())
            && existing != base.handle()
        {
            let existing = self.types.get(existing).map(|entry| entry.name().to_string()).unwrap_or_else(|| existing.to_string());
            return Err(ReflexError::UnderlyingTypeMismatch { enum_name: name.to_string(), existing, requested: base.name().to_string() });
        }

        let scope = self.declare_class(events, parent, name, key, TypeKind::Enum, base.size())?;
        let ty = self.scopes.info(scope).and_then(|info| info.type_facet).and_then(|handle| self.types.get(handle).cloned()).ok_or(ReflexError::UnknownScope(scope))?;
        self.enum_underlying.entry(ty.handle()).or_insert(base.handle());
        Ok(EnumEntry { ty, scope, underlying: base.handle() })
    }
}

impl Catalog {
    /// Register an enum whose size is that of the type named `underlying`
    pub fn build_enum(&self, parent: ScopeId, name: &str, key: TypeKey, underlying: &str) -> ReflexResult<EnumEntry> {
        self.write(|state, events| {
            let base = state.types.lookup_name(underlying).map(|found| found.entry).ok_or_else(|| ReflexError::UnknownType(underlying.to_string()))?;
            state.enumeration(events, parent, name, key, base)
        })
    }

    /// Register an enum over an already registered underlying type
    pub fn build_enum_with(&self, parent: ScopeId, name: &str, key: TypeKey, underlying: TypeHandle) -> ReflexResult<EnumEntry> {
        self.write(|state, events| {
            let base = state.require_type(underlying)?.clone();
            state.enumeration(events, parent, name, key, base)
        })
    }

    /// Append an enumerator. Enumerator names are unique within an enum.
    pub fn add_enumerator(&self, entry: &EnumEntry, name: &str, value: i64) -> ReflexResult<()> {
        self.write(|state, events| {
            if state.scopes.member(entry.scope, name).is_some() {
                let scope = entry.ty.name().to_string();
                return Err(ReflexError::DuplicateMember { scope, name: name.to_string() });
            }
            state.add_member(events, entry.scope, name, ScopeMember::Enumerator { owner: entry.handle(), value })
        })
    }

    /// Enumerators in declaration order
    pub fn enumerators(&self, entry: &EnumEntry) -> Vec<Enumerator> {
        self.read(|state| {
            state
                .scopes
                .members(entry.scope)
                .unwrap_or_default()
                .into_iter()
                .filter_map(|(name, member)| match member {
                    ScopeMember::Enumerator { owner, value } if owner == entry.handle() => Some(Enumerator { name, value }),
                    _ => None,
                })
                .collect()
        })
    }

    /// Enum view of a registered enum type
    pub fn enum_entry(&self, handle: TypeHandle) -> Option<EnumEntry> {
        self.read(|state| {
            let ty = state.types.get(handle).filter(|entry| entry.is_enum())?.clone();
            let scope = state.scopes.by_type(handle)?;
            let underlying = *state.enum_underlying.get(&handle)?;
            Some(EnumEntry { ty, scope, underlying })
        })
    }
}
