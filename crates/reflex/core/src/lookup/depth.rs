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

//! Per-thread nesting guard for dynamic lookups

use super::LookupError;
use metrics::counter;
use std::cell::Cell;
use tracing::warn;

thread_local! {
    static DEPTH: Cell<usize> = const { Cell::new(0) };
    static EXCEEDED: Cell<bool> = const { Cell::new(false) };
}

/// Held for the duration of one lookup; releases its level on drop
pub(crate) struct DepthGuard {
    outermost: bool,
}

impl DepthGuard {
    pub(crate) fn enter(name: &str, limit: usize) -> Result<Self, LookupError> {
        let depth = DEPTH.with(Cell::get) + 1;
        if depth == 1 {
            EXCEEDED.with(|flag| flag.set(false));
        }
        if depth > limit {
            EXCEEDED.with(|flag| flag.set(true));
            counter!("reflex_lookup_depth_exceeded", 1);
            warn!(name, limit, "dynamic lookup nesting limit exceeded");
            return Err(LookupError::LookupDepthExceeded { name: name.to_string(), limit });
        }
        DEPTH.with(|cell| cell.set(depth));
        Ok(Self { outermost: depth == 1 })
    }

    pub(crate) fn is_outermost(&self) -> bool {
        self.outermost
    }

    /// Whether any lookup nested in the current chain hit the limit
    pub(crate) fn limit_was_hit(&self) -> bool {
        EXCEEDED.with(Cell::get)
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        DEPTH.with(|cell| cell.set(cell.get().saturating_sub(1)));
        if self.outermost {
            EXCEEDED.with(|flag| flag.set(false));
        }
    }
}

/// Current nesting depth on this thread
pub(crate) fn current_depth() -> usize {
    DEPTH.with(Cell::get)
}
