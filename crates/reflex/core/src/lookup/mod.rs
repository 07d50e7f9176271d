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

//! Dynamic lookup
//!
//! When an interpreter cannot resolve a name statically it asks the
//! registered [`InterpreterCallbacks`], in registration order, for a value.
//! Callbacks may themselves trigger nested lookups; nesting is bounded per
//! thread so runaway recursion fails cleanly instead of overflowing the stack.

mod depth;
mod symbols;

pub use symbols::SymbolTable;

use crate::config::LookupConfig;
use crate::value::Value;
use depth::DepthGuard;
use metrics::counter;
use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, trace};

/// Dynamic lookup failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("use of undeclared identifier '{0}'")]
    UnresolvedSymbol(String),

    #[error("lookup of '{name}' exceeded the nesting limit of {limit}")]
    LookupDepthExceeded { name: String, limit: usize },
}

/// Hook an interpreter falls back to for names it cannot resolve
pub trait InterpreterCallbacks: Send + Sync {
    /// Produce a value for `name`, or `Ok(None)` to let the next callback try.
    /// `lookup` may be used for nested lookups.
    fn lookup_object(&self, name: &str, lookup: &DynamicLookup) -> Result<Option<Value>, LookupError>;
}

impl<F> InterpreterCallbacks for F
where
    F: Fn(&str, &DynamicLookup) -> Result<Option<Value>, LookupError> + Send + Sync,
{
    fn lookup_object(&self, name: &str, lookup: &DynamicLookup) -> Result<Option<Value>, LookupError> {
        self(name, lookup)
    }
}

/// Identifier of a registered lookup callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResolverId(u64);

/// Ordered chain of lookup callbacks
pub struct DynamicLookup {
    config: LookupConfig,
    next_id: AtomicU64,
    callbacks: RwLock<Vec<(ResolverId, Arc<dyn InterpreterCallbacks>)>>,
}

impl Default for DynamicLookup {
    fn default() -> Self {
        Self::with_config(LookupConfig::default())
    }
}

impl DynamicLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: LookupConfig) -> Self {
        Self { config, next_id: AtomicU64::new(0), callbacks: RwLock::new(Vec::new()) }
    }

    pub fn config(&self) -> &LookupConfig {
        &self.config
    }

    pub fn register(&self, callback: Arc<dyn InterpreterCallbacks>) -> ResolverId {
        let id = ResolverId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.callbacks.write().push((id, callback));
        id
    }

    pub fn unregister(&self, id: ResolverId) -> bool {
        let mut callbacks = self.callbacks.write();
        let before = callbacks.len();
        callbacks.retain(|(existing, _)| *existing != id);
        callbacks.len() != before
    }

    pub fn resolver_count(&self) -> usize {
        self.callbacks.read().len()
    }

    /// Ask each callback in turn for `name`; the first value wins
    pub fn lookup_object(&self, name: &str) -> Result<Value, LookupError> {
        counter!("reflex_dynamic_lookups", 1);
        let guard = DepthGuard::enter(name, self.config.max_depth)?;
        trace!(name, depth = depth::current_depth(), "dynamic lookup");

        // callbacks may register further callbacks or look up recursively
        let callbacks: Vec<Arc<dyn InterpreterCallbacks>> = self.callbacks.read().iter().map(|(_, callback)| callback.clone()).collect();

        let mut result = Err(LookupError::UnresolvedSymbol(name.to_string()));
        for callback in callbacks {
            match callback.lookup_object(name, self) {
                Ok(Some(value)) => {
                    result = Ok(value);
                    break;
                }
                Ok(None) => continue,
                Err(err) => {
                    result = Err(err);
                    break;
                }
            }
        }

        if guard.is_outermost() && guard.limit_was_hit() {
            return Err(LookupError::LookupDepthExceeded { name: name.to_string(), limit: self.config.max_depth });
        }
        if let Err(LookupError::UnresolvedSymbol(_)) = &result {
            counter!("reflex_unresolved_symbols", 1);
            debug!(name, "symbol not resolved dynamically");
        }
        result
    }

    /// Boolean form: stores the value in `out` on success
    pub fn try_lookup_object(&self, name: &str, out: &mut Option<Value>) -> bool {
        match self.lookup_object(name) {
            Ok(value) => {
                *out = Some(value);
                true
            }
            Err(_) => false,
        }
    }
}

/// Run a lookup on a worker thread and give up after `timeout`
///
/// An expired lookup reports [`LookupError::UnresolvedSymbol`]. The worker is
/// left to finish on its own; its result is discarded.
pub fn lookup_with_timeout(lookup: &Arc<DynamicLookup>, name: &str, timeout: Duration) -> Result<Value, LookupError> {
    let (tx, rx) = mpsc::channel();
    let worker = lookup.clone();
    let symbol = name.to_string();
    thread::spawn(move || {
        let _ = tx.send(worker.lookup_object(&symbol));
    });

    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(_) => {
            counter!("reflex_lookup_timeouts", 1);
            debug!(name, timeout_ms = timeout.as_millis() as u64, "dynamic lookup timed out");
            Err(LookupError::UnresolvedSymbol(name.to_string()))
        }
    }
}

/// Lookup bounded by the configured timeout, if any
pub fn lookup_bounded(lookup: &Arc<DynamicLookup>, name: &str) -> Result<Value, LookupError> {
    match lookup.config().timeout_ms {
        Some(ms) => lookup_with_timeout(lookup, name, Duration::from_millis(ms)),
        None => lookup.lookup_object(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TypeHandle;
    use crate::value::Scalar;

    type Answer = Result<Option<Value>, LookupError>;

    fn int_value(v: i64) -> Value {
        Value::scalar(TypeHandle(0), Scalar::Signed(v))
    }

    #[test]
    fn test_no_resolver_is_unresolved() {
        let lookup = DynamicLookup::new();
        assert_eq!(lookup.lookup_object("missing"), Err(LookupError::UnresolvedSymbol("missing".to_string())));

        let mut out = None;
        assert!(!lookup.try_lookup_object("missing", &mut out));
        assert!(out.is_none());
    }

    #[test]
    fn test_first_resolver_wins() {
        let lookup = DynamicLookup::new();
        lookup.register(Arc::new(|_: &str, _: &DynamicLookup| -> Answer { Ok(None) }));
        let second = lookup.register(Arc::new(|name: &str, _: &DynamicLookup| -> Answer { Ok((name == "x").then(|| int_value(1))) }));
        lookup.register(Arc::new(|_: &str, _: &DynamicLookup| -> Answer { Ok(Some(int_value(2))) }));

        assert_eq!(lookup.lookup_object("x").unwrap().as_scalar(), Some(Scalar::Signed(1)));
        assert_eq!(lookup.lookup_object("y").unwrap().as_scalar(), Some(Scalar::Signed(2)));

        assert!(lookup.unregister(second));
        assert_eq!(lookup.lookup_object("x").unwrap().as_scalar(), Some(Scalar::Signed(2)));
        assert_eq!(lookup.resolver_count(), 2);
    }

    #[test]
    fn test_depth_limit() {
        let lookup = DynamicLookup::with_config(LookupConfig { max_depth: 50, timeout_ms: None });
        let calls = Arc::new(AtomicU64::new(0));
        let counter = calls.clone();
        lookup.register(Arc::new(move |name: &str, lookup: &DynamicLookup| -> Answer {
            counter.fetch_add(1, Ordering::SeqCst);
            lookup.lookup_object(name).map(Some)
        }));

        let err = lookup.lookup_object("loop").unwrap_err();
        assert_eq!(err, LookupError::LookupDepthExceeded { name: "loop".to_string(), limit: 50 });
        assert_eq!(calls.load(Ordering::SeqCst), 50);
        assert_eq!(depth::current_depth(), 0);
    }

    #[test]
    fn test_swallowed_overflow_still_reported() {
        let lookup = DynamicLookup::with_config(LookupConfig { max_depth: 3, timeout_ms: None });
        lookup.register(Arc::new(|name: &str, lookup: &DynamicLookup| -> Answer {
            match lookup.lookup_object(name) {
                Ok(value) => Ok(Some(value)),
                Err(_) => Ok(Some(int_value(0))),
            }
        }));

        let err = lookup.lookup_object("deep").unwrap_err();
        assert!(matches!(err, LookupError::LookupDepthExceeded { limit: 3, .. }));

        // the flag does not leak into the next chain
        let fresh = DynamicLookup::new();
        fresh.register(Arc::new(|_: &str, _: &DynamicLookup| -> Answer { Ok(Some(int_value(7))) }));
        assert!(fresh.lookup_object("ok").is_ok());
    }

    #[test]
    fn test_timeout_maps_to_unresolved() {
        let lookup = Arc::new(DynamicLookup::new());
        lookup.register(Arc::new(|_: &str, _: &DynamicLookup| -> Answer {
            thread::sleep(Duration::from_millis(500));
            Ok(Some(int_value(1)))
        }));

        let err = lookup_with_timeout(&lookup, "slow", Duration::from_millis(10)).unwrap_err();
        assert_eq!(err, LookupError::UnresolvedSymbol("slow".to_string()));
    }

    #[test]
    fn test_bounded_lookup_without_timeout() {
        let lookup = Arc::new(DynamicLookup::new());
        lookup.register(Arc::new(|_: &str, _: &DynamicLookup| -> Answer { Ok(Some(int_value(4))) }));
        assert_eq!(lookup_bounded(&lookup, "n").unwrap().as_scalar(), Some(Scalar::Signed(4)));
    }
}
