use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;

use crate::bus::{SharedBus, Subscription};
use crate::coordinator::{Effect, MountCoordinator};
use crate::error::ScopeError;
use crate::host::HostTree;
use crate::key::ScopeKey;
use crate::store::ScopeStore;
use crate::types::{InsertPayload, ItemChannel, ItemRef, ListChannel, ListEvent, MovePayload, ScopeItem};

/// A scoped collection: an ordered sequence of keyed items where every item
/// owns an independent rendering root inside one host container.
///
/// All mutations are synchronous against the collection and the host tree;
/// mount notifications and root destruction are queued and run on the next
/// [`flush`](Scope::flush). Hosts call `flush` from their microtask or frame
/// loop.
///
/// `U` is the payload type of the upward channel, the item-to-ancestor side
/// band that bypasses the structural events entirely.
pub struct Scope<K, V, H, U = ()>
where
    K: ScopeKey + 'static,
    V: Clone + 'static,
    H: HostTree<K, V>,
    U: 'static,
{
    store: ScopeStore<K, V>,
    coordinator: MountCoordinator<K, V, H>,
    upward: SharedBus<String, (K, U)>,
    destroyed: bool,
    torn_down: bool,
}

impl<K, V, H, U> Scope<K, V, H, U>
where
    K: ScopeKey + 'static,
    V: Clone + 'static,
    H: HostTree<K, V>,
    U: 'static,
{
    /// Builds the scope and performs the batch initial mount: every item gets
    /// a tagged node and a root, with a single structural mutation of the
    /// live container. Mount notifications for the batch fire on the first
    /// `flush`, in collection order.
    pub fn new(host: H, initial: Vec<ScopeItem<K, V>>) -> Self {
        let store = ScopeStore::new(initial);
        let mut coordinator = MountCoordinator::new(host);
        coordinator.batch_mount(store.items());
        gdebug!(items = store.items().len(), "scope created");
        Self {
            store,
            coordinator,
            upward: SharedBus::new("granule.upward"),
            destroyed: false,
            torn_down: false,
        }
    }

    // ---- controller ----------------------------------------------------

    /// Inserts a new item before `before_id`, or at the end when `before_id`
    /// is `None` or names an id that is not in the scope (logged fallback).
    pub fn insert(&mut self, id: K, data: V, before_id: Option<K>) -> Result<(), ScopeError<K>> {
        self.ensure_live()?;
        let index = self
            .store
            .commit_insert(id.clone(), data, before_id.as_ref())?;
        let next = self.store.items().get(index + 1).map(|item| item.id.clone());
        let state = self.store.items()[index].state.clone();
        self.coordinator.mount_item(id.clone(), &state, next.as_ref());
        self.store.broadcast_list(&ListEvent::Insert(InsertPayload {
            id,
            data: state,
            before_id,
        }));
        Ok(())
    }

    /// Deletes an item. Never an error: an unknown id is a logged no-op that
    /// still announces the delete, so list subscribers can reconcile against
    /// ids they learned out of band.
    ///
    /// For a live item the unmount notification fires synchronously with the
    /// item's final state, while its node is still attached; the rendering
    /// root is destroyed on the next `flush`.
    pub fn delete(&mut self, id: &K) {
        if self.destroyed {
            gwarn!(id = ?id, "delete on a destroyed scope ignored");
            return;
        }
        if let Some(index) = self.store.index_of(id) {
            self.store
                .broadcast_item(&ItemChannel::Unmount(id.clone()), &self.store.items()[index].state);
            self.coordinator.unmount_item(id);
            // The delete announcement goes out while the item is still in the
            // sequence, so collaborators may read its final state.
            self.store.broadcast_list(&ListEvent::Delete(id.clone()));
            self.store.clear_item_channels(id);
            self.store.registry_mut().unregister(id);
            self.store.commit_remove(id);
        } else {
            gwarn!(id = ?id, "delete of unknown item");
            self.store.broadcast_list(&ListEvent::Delete(id.clone()));
        }
    }

    /// Relocates `ids` as one contiguous block before `before_id` (or to the
    /// end). The block keeps the items' current relative order. Rendering
    /// roots are never touched by a move.
    ///
    /// An empty `ids` is a true no-op: nothing is validated, nothing is
    /// broadcast.
    pub fn move_items(&mut self, ids: &[K], before_id: Option<&K>) -> Result<(), ScopeError<K>> {
        self.ensure_live()?;
        if ids.is_empty() {
            return Ok(());
        }
        let payload = self.store.commit_move(ids, before_id)?;
        let block: Vec<K> = self.store.items()[payload.to_index..payload.to_index + ids.len()]
            .iter()
            .map(|item| item.id.clone())
            .collect();
        let next = self
            .store
            .items()
            .get(payload.to_index + ids.len())
            .map(|item| item.id.clone());
        self.coordinator.move_items(&block, next.as_ref());
        self.store.broadcast_list(&ListEvent::Move(payload));
        Ok(())
    }

    /// Replaces an item's state in place and re-renders its subtree. The
    /// change is announced on the item's update channel only; list
    /// subscribers never hear about it.
    pub fn update(&mut self, id: &K, data: V) -> Result<(), ScopeError<K>> {
        self.ensure_live()?;
        let index = self.store.commit_update(id, data)?;
        let state = self.store.items()[index].state.clone();
        self.coordinator.update_item(id, &state);
        self.store
            .broadcast_item(&ItemChannel::Update(id.clone()), &state);
        Ok(())
    }

    /// The current sequence, in order.
    pub fn state(&self) -> &[ScopeItem<K, V>] {
        self.store.items()
    }

    pub fn item(&self, id: &K) -> Option<&ScopeItem<K, V>> {
        self.store.item(id)
    }

    pub fn has_item(&self, id: &K) -> bool {
        self.store.has_item(id)
    }

    // ---- subscriptions -------------------------------------------------

    pub fn on_insert(&self, mut handler: impl FnMut(&InsertPayload<K, V>) + 'static) -> Subscription {
        self.store.list_bus().subscribe(ListChannel::Insert, move |event| {
            if let ListEvent::Insert(payload) = event {
                handler(payload);
            }
        })
    }

    pub fn on_delete(&self, mut handler: impl FnMut(&K) + 'static) -> Subscription {
        self.store.list_bus().subscribe(ListChannel::Delete, move |event| {
            if let ListEvent::Delete(id) = event {
                handler(id);
            }
        })
    }

    pub fn on_move(&self, mut handler: impl FnMut(&MovePayload<K>) + 'static) -> Subscription {
        self.store.list_bus().subscribe(ListChannel::Move, move |event| {
            if let ListEvent::Move(payload) = event {
                handler(payload);
            }
        })
    }

    pub fn on_item_update(&self, id: K, handler: impl FnMut(&V) + 'static) -> Subscription {
        self.store.item_bus().subscribe(ItemChannel::Update(id), handler)
    }

    /// Fires once per mount, after the item's node is attached and rendered,
    /// during the `flush` that follows the mutation.
    pub fn on_item_mount(&self, id: K, handler: impl FnMut(&V) + 'static) -> Subscription {
        self.store.item_bus().subscribe(ItemChannel::Mount(id), handler)
    }

    /// Fires synchronously inside `delete` and `destroy`, with the item's
    /// final state, before its handlers are cleared.
    pub fn on_item_unmount(&self, id: K, handler: impl FnMut(&V) + 'static) -> Subscription {
        self.store.item_bus().subscribe(ItemChannel::Unmount(id), handler)
    }

    // ---- upward channel ------------------------------------------------

    /// Subscribes to a named item-to-ancestor event.
    pub fn on_upward(
        &self,
        event: impl Into<String>,
        mut handler: impl FnMut(&K, &U) + 'static,
    ) -> Subscription {
        self.upward
            .subscribe(event.into(), move |(id, payload): &(K, U)| handler(id, payload))
    }

    /// Emits a named event on behalf of `id`. The emitting item does not need
    /// a live subscriber; an emit nobody listens to is silently dropped.
    pub fn emit_upward(&self, id: &K, event: &str, payload: U) {
        if !self.store.has_item(id) {
            gwarn!(id = ?id, event, "upward emit from an item not in scope");
        }
        self.upward
            .broadcast(&String::from(event), &(id.clone(), payload));
    }

    // ---- imperative registry -------------------------------------------

    /// Attaches a capability object to a live item. The entry is released
    /// when the item is deleted or the scope is destroyed.
    pub fn register_imperative(&mut self, id: K, api: Rc<dyn Any>) {
        if !self.store.has_item(&id) {
            gwarn!(id = ?id, "imperative registration for an item not in scope ignored");
            return;
        }
        self.store.registry_mut().register(id, api);
    }

    /// Idempotent; unknown ids are ignored.
    pub fn unregister_imperative(&mut self, id: &K) {
        self.store.registry_mut().unregister(id);
    }

    pub fn imperative(&self, id: &K) -> Option<Rc<dyn Any>> {
        self.store.registry().get(id)
    }

    pub fn imperative_as<T: Any>(&self, id: &K) -> Option<Rc<T>> {
        self.store.registry().get_as::<T>(id)
    }

    /// The item's host node handle plus its imperative entry, if mounted.
    pub fn item_ref(&self, id: &K) -> Option<ItemRef<H::Node>> {
        let node = self.coordinator.node(id)?;
        Some(ItemRef {
            node,
            imperative: self.store.registry().get(id),
        })
    }

    // ---- lifecycle -----------------------------------------------------

    /// Drains the deferred effect queue: mount notifications (skipping any
    /// whose item was deleted or replaced since queueing) and root disposal.
    /// Effects queued by handlers during the drain run in the same drain.
    /// After `destroy`, the first `flush` completes the deferred teardown.
    pub fn flush(&mut self) {
        while let Some(effect) = self.coordinator.pop_effect() {
            match effect {
                Effect::Mount { id, generation } => {
                    if self.destroyed || !self.coordinator.generation_matches(&id, generation) {
                        continue;
                    }
                    if let Some(item) = self.store.item(&id) {
                        self.store
                            .broadcast_item(&ItemChannel::Mount(id.clone()), &item.state);
                    }
                }
                Effect::DisposeRoot(root) => self.coordinator.dispose_root(root),
            }
        }
        if self.destroyed && !self.torn_down {
            self.store.list_bus().destroy();
            self.store.item_bus().destroy();
            self.upward.destroy();
            self.torn_down = true;
        }
    }

    /// Number of queued effects awaiting the next `flush`.
    pub fn pending_effects(&self) -> usize {
        self.coordinator.pending_effects()
    }

    /// Tears the scope down. The synchronous phase notifies unmount per item
    /// in collection order, releases the registry and detaches every node;
    /// roots are disposed and the buses destroyed in the next `flush` (or in
    /// `Drop`). Idempotent.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        let order: Vec<K> = self.store.items().iter().map(|item| item.id.clone()).collect();
        gdebug!(items = order.len(), "scope destroy");
        for id in &order {
            if let Some(item) = self.store.item(id) {
                self.store
                    .broadcast_item(&ItemChannel::Unmount(id.clone()), &item.state);
            }
        }
        self.store.registry_mut().clear();
        self.coordinator.strip_all(&order);
        self.store.clear_items();
        self.destroyed = true;
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    // ---- host access ---------------------------------------------------

    pub fn host(&self) -> &H {
        self.coordinator.host()
    }

    pub fn host_mut(&mut self) -> &mut H {
        self.coordinator.host_mut()
    }

    fn ensure_live(&self) -> Result<(), ScopeError<K>> {
        if self.destroyed {
            Err(ScopeError::Destroyed)
        } else {
            Ok(())
        }
    }
}

impl<K, V, H, U> Drop for Scope<K, V, H, U>
where
    K: ScopeKey + 'static,
    V: Clone + 'static,
    H: HostTree<K, V>,
    U: 'static,
{
    fn drop(&mut self) {
        self.destroy();
        self.flush();
    }
}
