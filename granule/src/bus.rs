use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::RefCell;

use crate::key::{KeyMap, ScopeKey};

type Handler<P> = Rc<RefCell<dyn FnMut(&P)>>;

struct Registry<E, P> {
    slots: KeyMap<E, Vec<(u64, Handler<P>)>>,
    next_id: u64,
    #[cfg_attr(not(feature = "tracing"), allow(dead_code))]
    name: &'static str,
    destroyed: bool,
}

/// A single-threaded publish/subscribe registry keyed by event.
///
/// Broadcast is synchronous and runs handlers in registration order. Each
/// handler failure is isolated: a panicking subscriber is logged and the
/// remaining subscribers still run (the broadcaster never observes it).
/// Handlers subscribed while a broadcast is in flight do not see that event.
pub(crate) struct SharedBus<E, P> {
    inner: Rc<RefCell<Registry<E, P>>>,
}

impl<E, P> Clone for SharedBus<E, P> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<E: ScopeKey + 'static, P: 'static> SharedBus<E, P> {
    pub(crate) fn new(name: &'static str) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Registry {
                slots: KeyMap::new(),
                next_id: 0,
                name,
                destroyed: false,
            })),
        }
    }

    pub(crate) fn subscribe(&self, event: E, handler: impl FnMut(&P) + 'static) -> Subscription {
        let mut reg = self.inner.borrow_mut();
        if reg.destroyed {
            gwarn!(bus = reg.name, "subscribe on a destroyed bus ignored");
            return Subscription::dead();
        }
        let id = reg.next_id;
        reg.next_id += 1;
        let slot: Handler<P> = Rc::new(RefCell::new(handler));
        reg.slots.entry(event.clone()).or_default().push((id, slot));
        drop(reg);

        let weak = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                Self::unsubscribe(&inner, &event, id);
            }
        })
    }

    fn unsubscribe(inner: &Rc<RefCell<Registry<E, P>>>, event: &E, id: u64) {
        let mut reg = inner.borrow_mut();
        if let Some(handlers) = reg.slots.get_mut(event) {
            handlers.retain(|(hid, _)| *hid != id);
            if handlers.is_empty() {
                reg.slots.remove(event);
            }
        }
    }

    pub(crate) fn broadcast(&self, event: &E, payload: &P) {
        let snapshot: Vec<Handler<P>> = {
            let reg = self.inner.borrow();
            match reg.slots.get(event) {
                Some(handlers) => handlers.iter().map(|(_, h)| Rc::clone(h)).collect(),
                None => return,
            }
        };
        gtrace!(event = ?event, handlers = snapshot.len(), "broadcast");
        for handler in snapshot {
            invoke(&handler, payload, event);
        }
    }

    /// Drops every handler registered for `event`.
    pub(crate) fn clear(&self, event: &E) {
        self.inner.borrow_mut().slots.remove(event);
    }

    pub(crate) fn clear_all(&self) {
        self.inner.borrow_mut().slots.clear();
    }

    #[cfg(test)]
    pub(crate) fn handler_count(&self, event: &E) -> usize {
        self.inner
            .borrow()
            .slots
            .get(event)
            .map_or(0, |handlers| handlers.len())
    }

    /// Tears the bus down. Remaining subscriptions signal a probable resource
    /// leak by a collaborator that failed to dispose, so they are diagnosed,
    /// but teardown always completes.
    pub(crate) fn destroy(&self) {
        let mut reg = self.inner.borrow_mut();
        let remaining: usize = reg.slots.values().map(Vec::len).sum();
        if remaining > 0 {
            gwarn!(
                bus = reg.name,
                handlers = remaining,
                "destroying event bus with live subscriptions"
            );
        }
        reg.slots.clear();
        reg.destroyed = true;
    }
}

#[cfg(feature = "std")]
fn invoke<E: core::fmt::Debug, P>(handler: &Handler<P>, payload: &P, event: &E) {
    use std::panic::{AssertUnwindSafe, catch_unwind};

    let result = catch_unwind(AssertUnwindSafe(|| {
        (handler.borrow_mut())(payload);
    }));
    if result.is_err() {
        gwarn!(event = ?event, "subscriber panicked during broadcast; continuing");
    }
}

#[cfg(not(feature = "std"))]
fn invoke<E: core::fmt::Debug, P>(handler: &Handler<P>, payload: &P, _event: &E) {
    (handler.borrow_mut())(payload);
}

/// Disposer handle returned by every subscription.
///
/// `dispose` is idempotent. Dropping the handle without disposing leaves the
/// handler registered (it is reported when the owning bus is destroyed), which
/// matches subscribers that intentionally live for the whole scope.
#[must_use = "dropping a Subscription does not unsubscribe; call dispose() when done"]
pub struct Subscription {
    dispose: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    fn new(dispose: impl FnOnce() + 'static) -> Self {
        Self {
            dispose: Some(Box::new(dispose)),
        }
    }

    fn dead() -> Self {
        Self { dispose: None }
    }

    pub fn dispose(&mut self) {
        if let Some(dispose) = self.dispose.take() {
            dispose();
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.dispose.is_none()
    }
}

impl core::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Subscription")
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
