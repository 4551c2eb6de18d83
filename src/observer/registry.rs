use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::observer::traits::{Hook, Observer};

/// Per-model mapping from hook to the ordered list of subscribers.
///
/// Registration appends; insertion order is invocation order and the same
/// observer registered twice runs twice. Purely additive, no removal.
/// Lookup clones the `Arc` list out so dispatch never holds the lock across
/// an `await`; registration is expected at setup time, not concurrently with
/// in-flight dispatch.
#[derive(Default)]
pub struct ObserverRegistry {
    observers: RwLock<HashMap<Hook, Vec<Arc<dyn Observer>>>>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, hook: Hook, observer: Arc<dyn Observer>) {
        let name = observer.name().to_string();
        let mut observers = self.observers.write().expect("observer registry poisoned");
        observers.entry(hook).or_default().push(observer);

        tracing::debug!("Registered observer '{}' for hook '{}'", name, hook);
    }

    /// The ordered subscriber sequence for a hook; empty when none registered.
    pub fn subscribers_for(&self, hook: Hook) -> Vec<Arc<dyn Observer>> {
        let observers = self.observers.read().expect("observer registry poisoned");
        observers.get(&hook).cloned().unwrap_or_default()
    }
}

impl std::fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let observers = self.observers.read().expect("observer registry poisoned");
        let mut entries = f.debug_map();
        for (hook, subscribers) in observers.iter() {
            entries.key(&hook.as_str()).value(&subscribers.len());
        }
        entries.finish()
    }
}
