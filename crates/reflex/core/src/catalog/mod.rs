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

//! Type catalog
//!
//! A catalog maps type identities to immutable [`TypeEntry`] records and
//! carries the scope tree those entries are linked into. All state sits
//! behind a single reader/writer lock: lookups and resolution run
//! concurrently, registrations are serialized.

mod entry;
mod global;
mod notify;
mod registry;
mod state;

pub use entry::{TypeEntry, TypeHandle, TypeKey, TypeKind};
pub use global::{global, init_global, teardown_global};
pub use notify::{CallbackId, NotifySelection, RegistrationCallback, RegistrationEvent};

pub(crate) use state::CatalogState;

use crate::config::CatalogConfig;
use crate::error::ReflexResult;
use crate::scope::{ScopeId, ScopeInfo, ScopeKind, ScopeMember};
use notify::Notifier;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

/// Registry of types and scopes
pub struct Catalog {
    config: CatalogConfig,
    state: RwLock<CatalogState>,
    notifier: RwLock<Notifier>,
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("Catalog").field("name", &self.config.name).field("types", &state.types.len()).field("scopes", &state.scopes.len()).finish()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::with_config(CatalogConfig::default())
    }
}

impl Catalog {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(CatalogConfig::named(name))
    }

    pub fn with_config(config: CatalogConfig) -> Self {
        info!(catalog = %config.name, "creating type catalog");
        Self { config, state: RwLock::new(CatalogState::default()), notifier: RwLock::new(Notifier::default()) }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Run a mutation under the writer lock, then notify observers of
    /// whatever it registered
    pub(crate) fn write<R>(&self, mutate: impl FnOnce(&mut CatalogState, &mut Vec<RegistrationEvent>) -> ReflexResult<R>) -> ReflexResult<R> {
        let mut events = Vec::new();
        let result = {
            let mut state = self.state.write();
            mutate(&mut state, &mut events)
        };
        self.dispatch(&events);
        result
    }

    pub(crate) fn read<R>(&self, query: impl FnOnce(&CatalogState) -> R) -> R {
        query(&self.state.read())
    }

    fn dispatch(&self, events: &[RegistrationEvent]) {
        if events.is_empty() {
            return;
        }
        for event in events {
            let callbacks = {
                let notifier = self.notifier.read();
                if notifier.is_empty() {
                    return;
                }
                notifier.interested(event)
            };
            for callback in callbacks {
                callback.notify(event);
            }
        }
    }

    // Types

    /// Register a type, or return the entry already registered under `key`
    pub fn register(&self, key: TypeKey, kind: TypeKind, size: usize, name: &str) -> ReflexResult<Arc<TypeEntry>> {
        self.write(|state, events| state.register(events, key, kind, size, name))
    }

    pub fn lookup(&self, key: &TypeKey) -> Option<Arc<TypeEntry>> {
        self.read(|state| state.types.lookup(key).cloned())
    }

    pub fn by_handle(&self, handle: TypeHandle) -> Option<Arc<TypeEntry>> {
        self.read(|state| state.types.get(handle).cloned())
    }

    /// Look a type up by its qualified name
    ///
    /// When several keys were registered under the same name, the first
    /// visible registration wins.
    pub fn lookup_name(&self, name: &str) -> Option<Arc<TypeEntry>> {
        let found = self.read(|state| state.types.lookup_name(name))?;
        if found.candidates > 1 && self.config.warn_on_ambiguous_names {
            warn!(catalog = %self.config.name, name, candidates = found.candidates, chosen = %found.entry.handle(), "ambiguous type name");
        }
        Some(found.entry)
    }

    /// All entries in registration order
    pub fn types(&self) -> Vec<Arc<TypeEntry>> {
        self.read(|state| state.types.entries().to_vec())
    }

    pub fn type_at(&self, nth: usize) -> Option<Arc<TypeEntry>> {
        self.read(|state| state.types.entries().get(nth).cloned())
    }

    pub fn type_count(&self) -> usize {
        self.read(|state| state.types.len())
    }

    /// Hide a type from name lookup. Returns `false` if it was already hidden.
    pub fn hide_type(&self, handle: TypeHandle) -> ReflexResult<bool> {
        self.write(|state, _| state.types.set_hidden(handle, true))
    }

    pub fn unhide_type(&self, handle: TypeHandle) -> ReflexResult<bool> {
        self.write(|state, _| state.types.set_hidden(handle, false))
    }

    pub fn is_hidden(&self, handle: TypeHandle) -> bool {
        self.read(|state| state.types.is_hidden(handle))
    }

    // Scopes

    pub fn global_scope(&self) -> ScopeId {
        ScopeId::GLOBAL
    }

    pub fn declare_scope(&self, parent: ScopeId, name: &str, kind: ScopeKind) -> ReflexResult<ScopeId> {
        self.write(|state, events| state.declare_scope(events, parent, name, kind))
    }

    pub fn add_member(&self, scope: ScopeId, name: &str, member: ScopeMember) -> ReflexResult<()> {
        self.write(|state, events| state.add_member(events, scope, name, member))
    }

    /// Make `handle` the type facet of `scope`
    pub fn attach_type(&self, scope: ScopeId, handle: TypeHandle) -> ReflexResult<()> {
        self.write(|state, _| state.attach_type(scope, handle))
    }

    /// Register a class, struct, union or enum type and the scope carrying it
    pub fn declare_class(&self, parent: ScopeId, name: &str, key: TypeKey, kind: TypeKind, size: usize) -> ReflexResult<ScopeId> {
        self.write(|state, events| state.declare_class(events, parent, name, key, kind, size))
    }

    pub fn scope(&self, id: ScopeId) -> Option<ScopeInfo> {
        self.read(|state| state.scopes.info(id))
    }

    /// Direct members of a scope in insertion order
    pub fn members(&self, id: ScopeId) -> Option<Vec<(String, ScopeMember)>> {
        self.read(|state| state.scopes.members(id))
    }

    /// Resolve `name` from `start` outward to the global scope
    pub fn resolve(&self, start: ScopeId, name: &str) -> Option<ScopeMember> {
        self.read(|state| state.scopes.resolve(start, name))
    }

    pub fn resolve_qualified(&self, start: ScopeId, path: &str) -> Option<ScopeMember> {
        self.read(|state| state.scopes.resolve_qualified(start, path))
    }

    pub fn scope_by_name(&self, qualified_name: &str) -> Option<ScopeId> {
        self.read(|state| state.scopes.by_name(qualified_name))
    }

    pub fn scope_of_type(&self, handle: TypeHandle) -> Option<ScopeId> {
        self.read(|state| state.scopes.by_type(handle))
    }

    pub fn scopes(&self) -> Vec<ScopeInfo> {
        self.read(|state| (0..state.scopes.len()).filter_map(|index| state.scopes.info(ScopeId(index as u32))).collect())
    }

    pub fn scope_count(&self) -> usize {
        self.read(|state| state.scopes.len())
    }

    // Notifications

    pub fn register_callback(&self, callback: Arc<dyn RegistrationCallback>, selection: NotifySelection) -> CallbackId {
        self.notifier.write().subscribe(callback, selection)
    }

    pub fn unregister_callback(&self, id: CallbackId) -> bool {
        self.notifier.write().unsubscribe(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReflexError;
    use parking_lot::Mutex;

    #[test]
    fn test_idempotent_registration() {
        let catalog = Catalog::new("test");
        let before = catalog.type_count();

        let first = catalog.register(TypeKey::mangled("_Z3Foo"), TypeKind::Class, 8, "Foo").unwrap();
        let second = catalog.register(TypeKey::mangled("_Z3Foo"), TypeKind::Class, 8, "Foo").unwrap();

        assert_eq!(first.handle(), second.handle());
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(catalog.type_count(), before + 1);
    }

    #[test]
    fn test_mismatch_keeps_first_entry() {
        let catalog = Catalog::new("test");
        catalog.register(TypeKey::mangled("_Z3Foo"), TypeKind::Class, 8, "Foo").unwrap();

        let err = catalog.register(TypeKey::mangled("_Z3Foo"), TypeKind::Enum, 4, "Foo").unwrap_err();
        assert!(matches!(err, ReflexError::DuplicateKindMismatch { existing_kind: TypeKind::Class, requested_kind: TypeKind::Enum, .. }));

        let entry = catalog.lookup(&TypeKey::mangled("_Z3Foo")).unwrap();
        assert_eq!(entry.kind(), TypeKind::Class);
        assert_eq!(entry.size(), 8);
        assert_eq!(catalog.type_count(), 1);
    }

    #[test]
    fn test_name_ties_resolve_to_first_registration() {
        let catalog = Catalog::new("test");
        let first = catalog.register(TypeKey::mangled("_Z1T"), TypeKind::Class, 4, "T").unwrap();
        catalog.register(TypeKey::named("T"), TypeKind::Typedef, 4, "T").unwrap();

        assert_eq!(catalog.lookup_name("T").unwrap().handle(), first.handle());
        assert_eq!(catalog.lookup_name("::T").unwrap().handle(), first.handle());

        assert!(catalog.hide_type(first.handle()).unwrap());
        assert_eq!(catalog.lookup_name("T").unwrap().kind(), TypeKind::Typedef);
        assert!(catalog.unhide_type(first.handle()).unwrap());
        assert_eq!(catalog.lookup_name("T").unwrap().handle(), first.handle());
    }

    #[test]
    fn test_scope_shadowing() {
        let catalog = Catalog::new("test");
        let global = catalog.global_scope();
        let int = catalog.register(TypeKey::named("int"), TypeKind::Fundamental, 4, "int").unwrap();
        let double = catalog.register(TypeKey::named("double"), TypeKind::Fundamental, 8, "double").unwrap();

        let s = catalog.declare_scope(global, "S", ScopeKind::Namespace).unwrap();
        catalog.add_member(global, "x", ScopeMember::Type(int.handle())).unwrap();
        catalog.add_member(s, "x", ScopeMember::Type(double.handle())).unwrap();

        assert_eq!(catalog.resolve(s, "x"), Some(ScopeMember::Type(double.handle())));
        assert_eq!(catalog.resolve(global, "x"), Some(ScopeMember::Type(int.handle())));
        assert_eq!(catalog.resolve(s, "missing"), None);
    }

    #[test]
    fn test_declare_class_links_type_and_scope() {
        let catalog = Catalog::new("test");
        let geo = catalog.declare_scope(catalog.global_scope(), "geo", ScopeKind::Namespace).unwrap();
        let point = catalog.declare_class(geo, "Point", TypeKey::mangled("_ZN3geo5PointE"), TypeKind::Class, 16).unwrap();

        let info = catalog.scope(point).unwrap();
        assert_eq!(info.qualified_name, "geo::Point");
        assert_eq!(info.kind, ScopeKind::Class);

        let entry = catalog.lookup_name("geo::Point").unwrap();
        assert_eq!(info.type_facet, Some(entry.handle()));
        assert_eq!(catalog.scope_of_type(entry.handle()), Some(point));
        assert_eq!(catalog.scope_by_name("::geo::Point"), Some(point));

        let again = catalog.declare_class(geo, "Point", TypeKey::mangled("_ZN3geo5PointE"), TypeKind::Class, 16).unwrap();
        assert_eq!(again, point);

        let err = catalog.declare_class(geo, "Point", TypeKey::mangled("_ZN3geo6Point2E"), TypeKind::Class, 16).unwrap_err();
        assert!(matches!(err, ReflexError::DuplicateMember { .. }));

        let err = catalog.declare_class(geo, "Alias", TypeKey::named("geo::Alias"), TypeKind::Typedef, 16).unwrap_err();
        assert!(matches!(err, ReflexError::NotAScopeType { kind: TypeKind::Typedef, .. }));
    }

    #[test]
    fn test_type_facet_is_fixed_once_attached() {
        let catalog = Catalog::new("test");
        let global = catalog.global_scope();
        let shape = catalog.declare_class(global, "Shape", TypeKey::mangled("5Shape"), TypeKind::Class, 8).unwrap();
        let first = catalog.lookup(&TypeKey::mangled("5Shape")).unwrap();
        let other = catalog.register(TypeKey::mangled("5Other"), TypeKind::Class, 8, "Other").unwrap();

        catalog.attach_type(shape, first.handle()).unwrap();
        let err = catalog.attach_type(shape, other.handle()).unwrap_err();
        assert!(matches!(err, ReflexError::TypeFacetConflict { existing, requested, .. } if existing == first.handle() && requested == other.handle()));

        assert_eq!(catalog.scope(shape).unwrap().type_facet, Some(first.handle()));
        assert_eq!(catalog.scope_of_type(first.handle()), Some(shape));
        assert_eq!(catalog.scope_of_type(other.handle()), None);
    }

    #[test]
    fn test_add_member_rejects_unknown_handle() {
        let catalog = Catalog::new("test");
        let err = catalog.add_member(catalog.global_scope(), "x", ScopeMember::Type(TypeHandle(9))).unwrap_err();
        assert_eq!(err, ReflexError::UnknownHandle(TypeHandle(9)));
        assert!(catalog.members(catalog.global_scope()).unwrap().is_empty());
    }

    #[test]
    fn test_iteration_in_registration_order() {
        let catalog = Catalog::new("test");
        for name in ["a", "b", "c"] {
            catalog.register(TypeKey::named(name), TypeKind::Fundamental, 4, name).unwrap();
        }
        let names: Vec<String> = catalog.types().iter().map(|entry| entry.name().to_string()).collect();
        assert_eq!(names, ["a", "b", "c"]);
        assert_eq!(catalog.type_at(1).unwrap().name(), "b");
        assert!(catalog.type_at(3).is_none());
        assert_eq!(catalog.scope_count(), 1);
        assert!(catalog.scopes()[0].is_global());
    }

    #[test]
    fn test_callbacks_see_new_registrations_only() {
        let catalog = Arc::new(Catalog::new("test"));
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = seen.clone();
        let observer = catalog.clone();
        let id = catalog.register_callback(
            Arc::new(move |event: &RegistrationEvent| {
                if let RegistrationEvent::TypeRegistered(entry) = event {
                    // the writer lock is released by now
                    assert!(observer.lookup(entry.key()).is_some());
                    sink.lock().push(entry.name().to_string());
                }
            }),
            NotifySelection::types(),
        );

        catalog.register(TypeKey::named("int"), TypeKind::Fundamental, 4, "int").unwrap();
        catalog.register(TypeKey::named("int"), TypeKind::Fundamental, 4, "int").unwrap();
        catalog.declare_scope(catalog.global_scope(), "ns", ScopeKind::Namespace).unwrap();
        assert_eq!(*seen.lock(), ["int"]);

        assert!(catalog.unregister_callback(id));
        catalog.register(TypeKey::named("long"), TypeKind::Fundamental, 8, "long").unwrap();
        assert_eq!(seen.lock().len(), 1);
    }

    #[test]
    fn test_concurrent_registration() {
        let catalog = Arc::new(Catalog::new("test"));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let catalog = catalog.clone();
                std::thread::spawn(move || {
                    for i in 0..32 {
                        let name = format!("T{}", i);
                        catalog.register(TypeKey::named(name.clone()), TypeKind::Struct, 8, &name).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(catalog.type_count(), 32);
    }
}
