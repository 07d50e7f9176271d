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

//! Registration notifications
//!
//! Observers are told about new types, scopes and members after the catalog
//! has released its writer lock, so they are free to query the catalog.

use super::entry::{TypeEntry, TypeKind};
use crate::scope::{ScopeId, ScopeInfo, ScopeMember};
use std::sync::Arc;

/// Identifier returned when a callback is registered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackId(u64);

/// Something that was newly registered in a catalog
#[derive(Debug, Clone)]
pub enum RegistrationEvent {
    TypeRegistered(Arc<TypeEntry>),
    ScopeDeclared(ScopeInfo),
    MemberAdded { scope: ScopeId, name: String, member: ScopeMember },
}

/// Observer of catalog registrations
pub trait RegistrationCallback: Send + Sync {
    fn notify(&self, event: &RegistrationEvent);
}

impl<F> RegistrationCallback for F
where
    F: Fn(&RegistrationEvent) + Send + Sync,
{
    fn notify(&self, event: &RegistrationEvent) {
        self(event)
    }
}

/// Which events a callback wants to see
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifySelection {
    pub types: bool,
    pub scopes: bool,
    pub members: bool,
    /// Restrict type events to these kinds; `None` means every kind
    pub type_kinds: Option<Vec<TypeKind>>,
}

impl Default for NotifySelection {
    fn default() -> Self {
        Self::all()
    }
}

impl NotifySelection {
    pub fn all() -> Self {
        Self { types: true, scopes: true, members: true, type_kinds: None }
    }

    pub fn types() -> Self {
        Self { types: true, scopes: false, members: false, type_kinds: None }
    }

    pub fn types_of(kinds: impl IntoIterator<Item = TypeKind>) -> Self {
        Self { type_kinds: Some(kinds.into_iter().collect()), ..Self::types() }
    }

    pub fn members() -> Self {
        Self { types: false, scopes: false, members: true, type_kinds: None }
    }

    pub fn matches(&self, event: &RegistrationEvent) -> bool {
        match event {
            RegistrationEvent::TypeRegistered(entry) => {
                self.types && self.type_kinds.as_ref().map_or(true, |kinds| kinds.contains(&entry.kind()))
            }
            RegistrationEvent::ScopeDeclared(_) => self.scopes,
            RegistrationEvent::MemberAdded { .. } => self.members,
        }
    }
}

struct Subscription {
    id: CallbackId,
    selection: NotifySelection,
    callback: Arc<dyn RegistrationCallback>,
}

/// Registered observers in registration order
#[derive(Default)]
pub(crate) struct Notifier {
    next_id: u64,
    subscriptions: Vec<Subscription>,
}

impl Notifier {
    pub(crate) fn subscribe(&mut self, callback: Arc<dyn RegistrationCallback>, selection: NotifySelection) -> CallbackId {
        let id = CallbackId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription { id, selection, callback });
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: CallbackId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|subscription| subscription.id != id);
        self.subscriptions.len() != before
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Callbacks interested in `event`, cloned so the caller can drop the lock before invoking them
    pub(crate) fn interested(&self, event: &RegistrationEvent) -> Vec<Arc<dyn RegistrationCallback>> {
        self.subscriptions.iter().filter(|subscription| subscription.selection.matches(event)).map(|subscription| subscription.callback.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{TypeHandle, TypeKey};

    fn type_event(kind: TypeKind) -> RegistrationEvent {
        RegistrationEvent::TypeRegistered(Arc::new(TypeEntry::new(TypeHandle(0), TypeKey::named("T"), kind, 4, "T".to_string())))
    }

    #[test]
    fn test_selection_filters_kinds() {
        let selection = NotifySelection::types_of([TypeKind::Class, TypeKind::Enum]);
        assert!(selection.matches(&type_event(TypeKind::Enum)));
        assert!(!selection.matches(&type_event(TypeKind::Fundamental)));
        assert!(!selection.matches(&RegistrationEvent::MemberAdded {
            scope: ScopeId::GLOBAL,
            name: "x".to_string(),
            member: ScopeMember::Type(TypeHandle(0)),
        }));
    }

    #[test]
    fn test_unsubscribe() {
        let mut notifier = Notifier::default();
        let noop = |_: &RegistrationEvent| {};
        let first = notifier.subscribe(Arc::new(noop), NotifySelection::all());
        let second = notifier.subscribe(Arc::new(noop), NotifySelection::members());

        assert_eq!(notifier.interested(&type_event(TypeKind::Class)).len(), 1);
        assert!(notifier.unsubscribe(first));
        assert!(!notifier.unsubscribe(first));
        assert!(notifier.interested(&type_event(TypeKind::Class)).is_empty());
        assert!(notifier.unsubscribe(second));
        assert!(notifier.is_empty());
    }
}
