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

//! Process-wide catalog
//!
//! The global catalog is created explicitly and torn down explicitly.
//! Catalogs built with [`Catalog::new`] are independent of it.

use super::Catalog;
use crate::config::CatalogConfig;
use parking_lot::RwLock;
use std::sync::{Arc, OnceLock};
use tracing::info;

fn global_cell() -> &'static RwLock<Option<Arc<Catalog>>> {
    static GLOBAL: OnceLock<RwLock<Option<Arc<Catalog>>>> = OnceLock::new();
    GLOBAL.get_or_init(|| RwLock::new(None))
}

/// Create the process-wide catalog. If it already exists, the existing
/// catalog is returned and `config` is ignored.
pub fn init_global(config: CatalogConfig) -> Arc<Catalog> {
    let mut cell = global_cell().write();
    if let Some(existing) = cell.as_ref() {
        return existing.clone();
    }
    let catalog = Arc::new(Catalog::with_config(config));
    *cell = Some(catalog.clone());
    catalog
}

/// The process-wide catalog, if initialised
pub fn global() -> Option<Arc<Catalog>> {
    global_cell().read().clone()
}

/// Drop the process-wide catalog. Handles obtained from it stay valid until
/// their last holder releases them.
pub fn teardown_global() {
    if let Some(catalog) = global_cell().write().take() {
        info!(catalog = catalog.name(), types = catalog.type_count(), "tearing down global catalog");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{TypeKey, TypeKind};

    // The only test touching the process-wide catalog
    #[test]
    fn test_global_lifecycle() {
        teardown_global();
        assert!(global().is_none());

        let catalog = init_global(CatalogConfig::named("process"));
        catalog.register(TypeKey::named("int"), TypeKind::Fundamental, 4, "int").unwrap();

        let again = init_global(CatalogConfig::named("ignored"));
        assert!(Arc::ptr_eq(&catalog, &again));
        assert_eq!(global().unwrap().name(), "process");

        teardown_global();
        assert!(global().is_none());
        assert_eq!(catalog.type_count(), 1);

        let fresh = init_global(CatalogConfig::default());
        assert_eq!(fresh.type_count(), 0);
        teardown_global();
    }
}
