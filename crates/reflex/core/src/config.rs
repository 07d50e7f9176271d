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

//! Configuration for catalogs, dynamic lookup and the REPL front-end

use serde::{Deserialize, Serialize};

/// Default nesting limit for dynamic lookups
pub const DEFAULT_MAX_LOOKUP_DEPTH: usize = 50;

/// Primitive widths accepted by default: `void`, then 1 through 16 bytes
pub const DEFAULT_FUNDAMENTAL_WIDTHS: [usize; 6] = [0, 1, 2, 4, 8, 16];

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReflexConfig {
    pub catalog: CatalogConfig,
    pub lookup: LookupConfig,
    pub repl: ReplConfig,
}

/// Catalog configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Name reported in diagnostics
    pub name: String,
    /// Byte widths accepted for fundamental types
    pub fundamental_widths: Vec<usize>,
    /// Log a warning when a name lookup hits several registrations
    pub warn_on_ambiguous_names: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            name: "global".to_string(),
            fundamental_widths: DEFAULT_FUNDAMENTAL_WIDTHS.to_vec(),
            warn_on_ambiguous_names: true,
        }
    }
}

impl CatalogConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    pub fn supports_width(&self, size: usize) -> bool {
        self.fundamental_widths.contains(&size)
    }
}

/// Dynamic lookup configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Maximum number of nested lookups on one thread
    pub max_depth: usize,
    /// Timeout applied by front-ends that bound lookups, in milliseconds
    pub timeout_ms: Option<u64>,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self { max_depth: DEFAULT_MAX_LOOKUP_DEPTH, timeout_ms: None }
    }
}

/// REPL front-end configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplConfig {
    pub prompt: String,
    /// Scope the session starts in, `::` for the global scope
    pub initial_scope: String,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self { prompt: "reflex> ".to_string(), initial_scope: "::".to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ReflexConfig::default();
        assert_eq!(config.lookup.max_depth, 50);
        assert!(config.catalog.supports_width(4));
        assert!(config.catalog.supports_width(0));
        assert!(!config.catalog.supports_width(3));
        assert_eq!(config.repl.initial_scope, "::");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: ReflexConfig = serde_json::from_str(r#"{ "lookup": { "max_depth": 8 } }"#).unwrap();
        assert_eq!(config.lookup.max_depth, 8);
        assert_eq!(config.lookup.timeout_ms, None);
        assert_eq!(config.catalog, CatalogConfig::default());
    }
}
