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

//! Reflex Core
//!
//! Runtime reflection model for C++ types discovered from compiled
//! dictionaries or from an interpreter: a catalog of type entries, the
//! namespace/class scope tree built on top of it, builders for fundamental
//! and enum types, the dynamic lookup bridge an interpreter falls back to when
//! static resolution fails, and type-directed printing of the resulting values.
//!
//! # Example
//!
//! ```
//! use reflex_core::{Catalog, ScopeKind, ScopeMember, TypeKey, TypeKind};
//!
//! let catalog = Catalog::new("demo");
//! catalog.register_builtin_fundamentals().unwrap();
//!
//! let geo = catalog.declare_scope(catalog.global_scope(), "geo", ScopeKind::Namespace).unwrap();
//! let point = catalog
//!     .declare_class(geo, "Point", TypeKey::mangled("_ZN3geo5PointE"), TypeKind::Class, 16)
//!     .unwrap();
//!
//! let resolved = catalog.resolve_qualified(catalog.global_scope(), "geo::Point");
//! assert_eq!(resolved, Some(ScopeMember::Scope(point)));
//! ```

pub mod builders;
pub mod catalog;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod lookup;
pub mod printer;
pub mod scope;
pub mod value;

pub use builders::{BUILTIN_FUNDAMENTALS, EnumEntry, Enumerator, FundamentalClass};
pub use catalog::{
    CallbackId, Catalog, NotifySelection, RegistrationCallback, RegistrationEvent, TypeEntry, TypeHandle, TypeKey, TypeKind, global, init_global,
    teardown_global,
};
pub use config::{CatalogConfig, LookupConfig, ReflexConfig, ReplConfig};
pub use dictionary::{Declaration, Dictionary, DictionaryLoader, LoadReport, SkippedDeclaration};
pub use error::{ReflexError, ReflexResult};
pub use lookup::{DynamicLookup, InterpreterCallbacks, LookupError, ResolverId, SymbolTable, lookup_bounded, lookup_with_timeout};
pub use printer::{Formatter, PrintContext, ValuePrinter};
pub use scope::{Modifiers, ScopeId, ScopeInfo, ScopeKind, ScopeMember};
pub use value::{Payload, Scalar, Value};
