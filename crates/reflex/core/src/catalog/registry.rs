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

//! Key and name indices over registered types

use super::entry::{TypeEntry, TypeHandle, TypeKey, TypeKind};
use crate::error::{ReflexError, ReflexResult};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

/// Outcome of a registration
#[derive(Debug, Clone)]
pub(crate) enum Registration {
    Created(Arc<TypeEntry>),
    Existing(Arc<TypeEntry>),
}

impl Registration {
    #[cfg(test)]
    pub(crate) fn into_entry(self) -> Arc<TypeEntry> {
        match self {
            Registration::Created(entry) | Registration::Existing(entry) => entry,
        }
    }
}

/// Result of a name lookup: the winning entry plus how many visible
/// registrations share the name
pub(crate) struct NameMatch {
    pub(crate) entry: Arc<TypeEntry>,
    pub(crate) candidates: usize,
}

/// Types in registration order with a primary key index and a secondary
/// name index
#[derive(Debug, Default)]
pub(crate) struct TypeRegistry {
    entries: Vec<Arc<TypeEntry>>,
    by_key: HashMap<TypeKey, TypeHandle>,
    by_name: HashMap<String, Vec<TypeHandle>>,
    hidden: HashSet<TypeHandle>,
}

/// Strip a leading global-scope qualifier
pub(crate) fn normalize_name(name: &str) -> &str {
    name.strip_prefix("::").unwrap_or(name)
}

impl TypeRegistry {
    /// Check that `key` is either free or already registered with the same kind and size
    pub(crate) fn check(&self, key: &TypeKey, kind: TypeKind, size: usize) -> ReflexResult<Option<&Arc<TypeEntry>>> {
        match self.lookup(key) {
            Some(existing) if existing.kind() != kind || existing.size() != size => Err(ReflexError::DuplicateKindMismatch {
                key: key.clone(),
                existing_kind: existing.kind(),
                existing_size: existing.size(),
                requested_kind: kind,
                requested_size: size,
            }),
            found => Ok(found),
        }
    }

    pub(crate) fn register(&mut self, key: TypeKey, kind: TypeKind, size: usize, name: &str) -> ReflexResult<Registration> {
        if let Some(existing) = self.check(&key, kind, size)? {
            return Ok(Registration::Existing(existing.clone()));
        }

        let name = normalize_name(name).to_string();
        let handle = TypeHandle(self.entries.len() as u32);
        let entry = Arc::new(TypeEntry::new(handle, key.clone(), kind, size, name.clone()));

        let same_name = self.by_name.entry(name).or_default();
        if !same_name.is_empty() {
            debug!(name = entry.name(), key = %key, "type name already registered under another key");
        }
        same_name.push(handle);

        self.by_key.insert(key, handle);
        self.entries.push(entry.clone());
        Ok(Registration::Created(entry))
    }

    pub(crate) fn get(&self, handle: TypeHandle) -> Option<&Arc<TypeEntry>> {
        self.entries.get(handle.index())
    }

    pub(crate) fn lookup(&self, key: &TypeKey) -> Option<&Arc<TypeEntry>> {
        self.by_key.get(key).and_then(|handle| self.get(*handle))
    }

    /// First visible registration under `name`, in registration order
    pub(crate) fn lookup_name(&self, name: &str) -> Option<NameMatch> {
        let handles = self.by_name.get(normalize_name(name))?;
        let mut visible = handles.iter().filter(|handle| !self.hidden.contains(*handle));
        let first = *visible.next()?;
        let candidates = 1 + visible.count();
        Some(NameMatch { entry: self.entries[first.index()].clone(), candidates })
    }

    pub(crate) fn set_hidden(&mut self, handle: TypeHandle, hidden: bool) -> ReflexResult<bool> {
        if self.get(handle).is_none() {
            return Err(ReflexError::UnknownHandle(handle));
        }
        Ok(if hidden { self.hidden.insert(handle) } else { self.hidden.remove(&handle) })
    }

    pub(crate) fn is_hidden(&self, handle: TypeHandle) -> bool {
        self.hidden.contains(&handle)
    }

    pub(crate) fn entries(&self) -> &[Arc<TypeEntry>] {
        &self.entries
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
