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

//! Catalog state guarded by the catalog's writer lock
//!
//! Every mutation records the events it caused so the catalog can notify
//! observers once the lock is released.

use super::entry::{TypeEntry, TypeHandle, TypeKey, TypeKind};
use super::notify::RegistrationEvent;
use super::registry::{Registration, TypeRegistry};
use crate::error::{ReflexError, ReflexResult};
use crate::scope::{Declared, ScopeId, ScopeKind, ScopeMember, ScopeTree};
use metrics::counter;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Default)]
pub(crate) struct CatalogState {
    pub(crate) types: TypeRegistry,
    pub(crate) scopes: ScopeTree,
    /// Underlying integral type of each enum
    pub(crate) enum_underlying: HashMap<TypeHandle, TypeHandle>,
}

impl CatalogState {
    pub(crate) fn register(&mut self, events: &mut Vec<RegistrationEvent>, key: TypeKey, kind: TypeKind, size: usize, name: &str) -> ReflexResult<Arc<TypeEntry>> {
        match self.types.register(key, kind, size, name)? {
            Registration::Created(entry) => {
                debug!(handle = %entry.handle(), kind = %kind, size, name = entry.name(), "registered type");
                counter!("reflex_types_registered", 1);
                events.push(RegistrationEvent::TypeRegistered(entry.clone()));
                Ok(entry)
            }
            Registration::Existing(entry) => Ok(entry),
        }
    }

    pub(crate) fn declare_scope(&mut self, events: &mut Vec<RegistrationEvent>, parent: ScopeId, name: &str, kind: ScopeKind) -> ReflexResult<ScopeId> {
        match self.scopes.declare(parent, name, kind)? {
            Declared::Created(id) => {
                if let Some(info) = self.scopes.info(id) {
                    debug!(scope = %id, kind = %kind, name = info.display_name(), "declared scope");
                    events.push(RegistrationEvent::ScopeDeclared(info));
                }
                Ok(id)
            }
            Declared::Existing(id) => Ok(id),
        }
    }

    pub(crate) fn add_member(&mut self, events: &mut Vec<RegistrationEvent>, scope: ScopeId, name: &str, member: ScopeMember) -> ReflexResult<()> {
        if let Some(handle) = member.referenced_type() {
            self.require_type(handle)?;
        }
        if self.scopes.add_member(scope, name, member)? {
            events.push(RegistrationEvent::MemberAdded { scope, name: name.to_string(), member });
        }
        Ok(())
    }

    pub(crate) fn attach_type(&mut self, scope: ScopeId, handle: TypeHandle) -> ReflexResult<()> {
        self.require_type(handle)?;
        self.scopes.attach_type(scope, handle)
    }

    /// Register a class-like type together with the scope that carries it
    pub(crate) fn declare_class(
        &mut self,
        events: &mut Vec<RegistrationEvent>,
        parent: ScopeId,
        name: &str,
        key: TypeKey,
        kind: TypeKind,
        size: usize,
    ) -> ReflexResult<ScopeId> {
        let scope_kind = ScopeKind::for_type(kind).ok_or_else(|| ReflexError::NotAScopeType { name: name.to_string(), kind })?;
        self.types.check(&key, kind, size)?;

        if !self.scopes.contains(parent) {
            return Err(ReflexError::UnknownScope(parent));
        }
        if let Some(existing) = self.scopes.member(parent, name) {
            self.check_facet(parent, name, existing, &key)?;
        }

        let scope = self.declare_scope(events, parent, name, scope_kind)?;
        let qualified_name = self.scopes.info(scope).map(|info| info.qualified_name).unwrap_or_else(|| name.to_string());
        let entry = self.register(events, key, kind, size, &qualified_name)?;
        self.scopes.attach_type(scope, entry.handle())?;
        Ok(scope)
    }

    /// A re-declared class must carry the same type it was first declared with
    fn check_facet(&self, parent: ScopeId, name: &str, existing: ScopeMember, key: &TypeKey) -> ReflexResult<()> {
        let Some(scope) = existing.as_scope() else {
            return Ok(());
        };
        let Some(facet) = self.scopes.info(scope).and_then(|info| info.type_facet) else {
            return Ok(());
        };
        match self.types.get(facet) {
            Some(entry) if entry.key() != key => {
                let scope_name = self.scopes.info(parent).map(|info| info.display_name().to_string()).unwrap_or_default();
                Err(ReflexError::DuplicateMember { scope: scope_name, name: name.to_string() })
            }
            _ => Ok(()),
        }
    }

    pub(crate) fn require_type(&self, handle: TypeHandle) -> ReflexResult<&Arc<TypeEntry>> {
        self.types.get(handle).ok_or(ReflexError::UnknownHandle(handle))
    }
}
