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

//! Scope tree storage and hierarchical name resolution

use super::{ScopeId, ScopeInfo, ScopeKind, ScopeMember};
use crate::catalog::TypeHandle;
use crate::error::{ReflexError, ReflexResult};
use indexmap::IndexMap;
use std::collections::HashMap;

const SCOPE_SEPARATOR: &str = "::";

#[derive(Debug, Clone)]
struct ScopeNode {
    name: String,
    qualified_name: String,
    kind: ScopeKind,
    parent: Option<ScopeId>,
    type_facet: Option<TypeHandle>,
    members: IndexMap<String, ScopeMember>,
}

/// Outcome of a scope declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Declared {
    Created(ScopeId),
    Existing(ScopeId),
}

impl Declared {
    #[cfg(test)]
    pub(crate) fn id(self) -> ScopeId {
        match self {
            Declared::Created(id) | Declared::Existing(id) => id,
        }
    }
}

/// All scopes of a catalog, owned by their parents through member bindings
#[derive(Debug, Clone)]
pub(crate) struct ScopeTree {
    nodes: Vec<ScopeNode>,
    by_name: HashMap<String, ScopeId>,
    by_type: HashMap<TypeHandle, ScopeId>,
}

impl Default for ScopeTree {
    fn default() -> Self {
        let global = ScopeNode {
            name: String::new(),
            qualified_name: String::new(),
            kind: ScopeKind::Namespace,
            parent: None,
            type_facet: None,
            members: IndexMap::new(),
        };
        let mut by_name = HashMap::new();
        by_name.insert(String::new(), ScopeId::GLOBAL);
        Self { nodes: vec![global], by_name, by_type: HashMap::new() }
    }
}

impl ScopeTree {
    fn node(&self, id: ScopeId) -> ReflexResult<&ScopeNode> {
        self.nodes.get(id.index()).ok_or(ReflexError::UnknownScope(id))
    }

    fn display_name(&self, id: ScopeId) -> String {
        match self.nodes.get(id.index()) {
            Some(node) if node.qualified_name.is_empty() => SCOPE_SEPARATOR.to_string(),
            Some(node) => node.qualified_name.clone(),
            None => id.to_string(),
        }
    }

    pub(crate) fn contains(&self, id: ScopeId) -> bool {
        id.index() < self.nodes.len()
    }

    pub(crate) fn declare(&mut self, parent: ScopeId, name: &str, kind: ScopeKind) -> ReflexResult<Declared> {
        let parent_node = self.node(parent)?;

        if let Some(existing) = parent_node.members.get(name) {
            return match existing {
                ScopeMember::Scope(id) => {
                    let existing_kind = self.nodes[id.index()].kind;
                    if existing_kind == kind {
                        Ok(Declared::Existing(*id))
                    } else {
                        Err(ReflexError::ScopeKindMismatch { name: self.display_name(*id), existing: existing_kind, requested: kind })
                    }
                }
                _ => Err(ReflexError::DuplicateMember { scope: self.display_name(parent), name: name.to_string() }),
            };
        }

        let qualified_name =
            if parent_node.qualified_name.is_empty() { name.to_string() } else { format!("{}{}{}", parent_node.qualified_name, SCOPE_SEPARATOR, name) };

        let id = ScopeId(self.nodes.len() as u32);
        self.nodes.push(ScopeNode {
            name: name.to_string(),
            qualified_name: qualified_name.clone(),
            kind,
            parent: Some(parent),
            type_facet: None,
            members: IndexMap::new(),
        });
        self.nodes[parent.index()].members.insert(name.to_string(), ScopeMember::Scope(id));
        self.by_name.entry(qualified_name).or_insert(id);
        Ok(Declared::Created(id))
    }

    /// Bind `name` in `scope`. Returns `false` when the identical binding already existed.
    pub(crate) fn add_member(&mut self, scope: ScopeId, name: &str, member: ScopeMember) -> ReflexResult<bool> {
        let node = self.node(scope)?;

        if let ScopeMember::Scope(child) = member {
            let child_node = self.node(child)?;
            if child_node.parent != Some(scope) || child_node.name != name {
                return Err(ReflexError::ScopeReparent { scope: self.display_name(scope), name: self.display_name(child) });
            }
        }

        match node.members.get(name) {
            Some(existing) if *existing == member => Ok(false),
            Some(_) => Err(ReflexError::DuplicateMember { scope: self.display_name(scope), name: name.to_string() }),
            None => {
                self.nodes[scope.index()].members.insert(name.to_string(), member);
                Ok(true)
            }
        }
    }

    pub(crate) fn attach_type(&mut self, scope: ScopeId, handle: TypeHandle) -> ReflexResult<()> {
        let node = self.node(scope)?;
        match node.type_facet {
            Some(existing) if existing == handle => return Ok(()),
            Some(existing) => {
                return Err(ReflexError::TypeFacetConflict { scope: node.qualified_name.clone(), existing, requested: handle });
            }
            None => {}
        }
        self.nodes[scope.index()].type_facet = Some(handle);
        self.by_type.entry(handle).or_insert(scope);
        Ok(())
    }

    /// Direct member of `scope`, without looking at enclosing scopes
    pub(crate) fn member(&self, scope: ScopeId, name: &str) -> Option<ScopeMember> {
        self.nodes.get(scope.index())?.members.get(name).copied()
    }

    /// Look `name` up in `start`, then in each enclosing scope up to the global scope
    pub(crate) fn resolve(&self, start: ScopeId, name: &str) -> Option<ScopeMember> {
        let mut current = Some(start);
        while let Some(id) = current {
            let node = self.nodes.get(id.index())?;
            if let Some(member) = node.members.get(name) {
                return Some(*member);
            }
            current = node.parent;
        }
        None
    }

    /// Resolve `a::b::c`: the first component hierarchically from `start`
    /// (or from the global scope for a leading `::`), the rest as direct members
    pub(crate) fn resolve_qualified(&self, start: ScopeId, path: &str) -> Option<ScopeMember> {
        let (start, path) = match path.strip_prefix(SCOPE_SEPARATOR) {
            Some(rest) => (ScopeId::GLOBAL, rest),
            None => (start, path),
        };
        let mut components = path.split(SCOPE_SEPARATOR);
        let mut member = self.resolve(start, components.next()?)?;

        for component in components {
            let scope = self.scope_for_member(&member)?;
            member = *self.nodes[scope.index()].members.get(component)?;
        }
        Some(member)
    }

    /// Scope to descend into when a qualified name continues past `member`
    fn scope_for_member(&self, member: &ScopeMember) -> Option<ScopeId> {
        match member {
            ScopeMember::Scope(id) => Some(*id),
            ScopeMember::Type(handle) => self.by_type.get(handle).copied(),
            _ => None,
        }
    }

    pub(crate) fn by_name(&self, qualified_name: &str) -> Option<ScopeId> {
        let name = qualified_name.strip_prefix(SCOPE_SEPARATOR).unwrap_or(qualified_name);
        self.by_name.get(name).copied()
    }

    pub(crate) fn by_type(&self, handle: TypeHandle) -> Option<ScopeId> {
        self.by_type.get(&handle).copied()
    }

    pub(crate) fn info(&self, id: ScopeId) -> Option<ScopeInfo> {
        let node = self.nodes.get(id.index())?;
        Some(ScopeInfo {
            id,
            name: node.name.clone(),
            qualified_name: node.qualified_name.clone(),
            kind: node.kind,
            parent: node.parent,
            type_facet: node.type_facet,
            member_count: node.members.len(),
        })
    }

    pub(crate) fn members(&self, id: ScopeId) -> Option<Vec<(String, ScopeMember)>> {
        let node = self.nodes.get(id.index())?;
        Some(node.members.iter().map(|(name, member)| (name.clone(), *member)).collect())
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }
}
