use alloc::rc::Rc;
use core::any::Any;

use crate::key::{KeyMap, ScopeKey};

/// Side-table of item-supplied capability objects.
///
/// An item may expose an arbitrary api object (for example "hand me your
/// uncommitted local state") that outside callers retrieve by id without
/// subscribing to any event. Entries are purely additive metadata: absence is
/// never an error, and an entry never outlives its item.
pub(crate) struct ImperativeRegistry<K> {
    entries: KeyMap<K, Rc<dyn Any>>,
}

impl<K: ScopeKey> ImperativeRegistry<K> {
    pub(crate) fn new() -> Self {
        Self {
            entries: KeyMap::new(),
        }
    }

    pub(crate) fn register(&mut self, id: K, api: Rc<dyn Any>) {
        self.entries.insert(id, api);
    }

    /// Idempotent: unregistering an unknown or already-released id is a no-op.
    pub(crate) fn unregister(&mut self, id: &K) {
        self.entries.remove(id);
    }

    pub(crate) fn get(&self, id: &K) -> Option<Rc<dyn Any>> {
        self.entries.get(id).map(Rc::clone)
    }

    pub(crate) fn get_as<T: Any>(&self, id: &K) -> Option<Rc<T>> {
        self.get(id).and_then(|api| api.downcast::<T>().ok())
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
