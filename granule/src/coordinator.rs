use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::marker::PhantomData;

use crate::host::HostTree;
use crate::key::{KeyMap, ScopeKey};
use crate::types::ScopeItem;

/// Work deferred out of a mutation into the next drain.
///
/// Mount notifications and root destruction both happen off the mutation's
/// own stack: notifications so subscribers observe a fully attached node, and
/// disposal so a handler running inside the triggering broadcast never sees
/// its root die under it.
pub(crate) enum Effect<K, R> {
    Mount { id: K, generation: u64 },
    DisposeRoot(R),
}

struct Slot<N, R> {
    node: N,
    root: R,
    generation: u64,
}

/// Exclusive owner of the `id -> {node, root, generation}` table.
///
/// Every structural change to the host container goes through here. The
/// generation stamp makes queued `Mount` effects self-invalidating: an item
/// deleted (or deleted and reinserted) before the drain no longer carries the
/// generation the effect was queued with, so the stale notification is
/// dropped instead of firing against the wrong incarnation.
pub(crate) struct MountCoordinator<K, V, H: HostTree<K, V>> {
    host: H,
    slots: KeyMap<K, Slot<H::Node, H::Root>>,
    effects: VecDeque<Effect<K, H::Root>>,
    next_generation: u64,
    _state: PhantomData<fn(&V)>,
}

impl<K: ScopeKey, V, H: HostTree<K, V>> MountCoordinator<K, V, H> {
    pub(crate) fn new(host: H) -> Self {
        Self {
            host,
            slots: KeyMap::new(),
            effects: VecDeque::new(),
            next_generation: 0,
            _state: PhantomData,
        }
    }

    /// Mounts the initial collection in phases: all nodes are created and
    /// tagged detached, attached as one batch (exactly one structural
    /// mutation of the live tree), then every root is instantiated, then
    /// every subtree is rendered, then the mount effects are queued in
    /// collection order.
    pub(crate) fn batch_mount(&mut self, items: &[ScopeItem<K, V>]) {
        let mut nodes = Vec::with_capacity(items.len());
        for item in items {
            let node = self.host.create_node(&item.state);
            self.host.set_anchor(&node, &item.id);
            nodes.push(node);
        }
        self.host.append_all(&nodes);
        let mut roots = Vec::with_capacity(items.len());
        for node in &nodes {
            roots.push(self.host.create_root(node));
        }
        for ((item, _), root) in items.iter().zip(&nodes).zip(&mut roots) {
            self.host.render(root, &item.id, &item.state);
        }
        for ((item, node), root) in items.iter().zip(nodes).zip(roots) {
            let generation = self.next_generation;
            self.next_generation += 1;
            self.slots.insert(
                item.id.clone(),
                Slot {
                    node,
                    root,
                    generation,
                },
            );
            self.effects.push_back(Effect::Mount {
                id: item.id.clone(),
                generation,
            });
        }
    }

    /// Mounts one item before the anchor of `before` (append when `None`).
    /// `before` is the id of the item that follows the new one in the already
    /// committed sequence, so a missing anchor here means the host tree has
    /// drifted from the collection.
    pub(crate) fn mount_item(&mut self, id: K, state: &V, before: Option<&K>) {
        let node = self.host.create_node(state);
        self.host.set_anchor(&node, &id);
        match before {
            Some(before_id) => match self.host.node_by_anchor(before_id) {
                Some(reference) => self.host.insert_before(&node, &reference),
                None => {
                    gwarn!(before = ?before_id, "anchor for insert target missing; appending");
                    self.host.append(&node);
                }
            },
            None => self.host.append(&node),
        }
        self.install(id, node, state);
    }

    fn install(&mut self, id: K, node: H::Node, state: &V) {
        let mut root = self.host.create_root(&node);
        self.host.render(&mut root, &id, state);
        let generation = self.next_generation;
        self.next_generation += 1;
        self.slots.insert(
            id.clone(),
            Slot {
                node,
                root,
                generation,
            },
        );
        self.effects.push_back(Effect::Mount { id, generation });
    }

    /// Detaches the item's node now; the root dies in the next drain.
    pub(crate) fn unmount_item(&mut self, id: &K) {
        if let Some(slot) = self.slots.remove(id) {
            self.host.remove(&slot.node);
            self.effects.push_back(Effect::DisposeRoot(slot.root));
        } else {
            gwarn!(id = ?id, "no mounted slot for removed item");
        }
    }

    /// Relocates the block's nodes before the target anchor, preserving the
    /// order of `ids` (callers pass the committed block order). Roots are
    /// untouched. Missing anchors degrade per node: a missing member is
    /// skipped, a missing target turns the move into an append.
    pub(crate) fn move_items(&mut self, ids: &[K], before: Option<&K>) {
        let reference = before.and_then(|before_id| {
            let found = self.host.node_by_anchor(before_id);
            if found.is_none() {
                gwarn!(before = ?before_id, "anchor for move target missing; appending block");
            }
            found
        });
        for id in ids {
            let Some(node) = self.host.node_by_anchor(id) else {
                gwarn!(id = ?id, "anchor for moved item missing; skipping");
                continue;
            };
            match &reference {
                Some(reference) => self.host.insert_before(&node, reference),
                None => self.host.append(&node),
            }
        }
    }

    /// Re-renders the item's existing subtree in place.
    pub(crate) fn update_item(&mut self, id: &K, state: &V) {
        if let Some(slot) = self.slots.get_mut(id) {
            self.host.render(&mut slot.root, id, state);
        }
    }

    /// Synchronous half of teardown: detach every node in collection order
    /// and queue every root for disposal.
    pub(crate) fn strip_all(&mut self, order: &[K]) {
        for id in order {
            if let Some(slot) = self.slots.remove(id) {
                self.host.remove(&slot.node);
                self.effects.push_back(Effect::DisposeRoot(slot.root));
            }
        }
        for (_, slot) in core::mem::take(&mut self.slots) {
            self.host.remove(&slot.node);
            self.effects.push_back(Effect::DisposeRoot(slot.root));
        }
    }

    pub(crate) fn pop_effect(&mut self) -> Option<Effect<K, H::Root>> {
        self.effects.pop_front()
    }

    pub(crate) fn pending_effects(&self) -> usize {
        self.effects.len()
    }

    /// A queued `Mount` is live only while its slot still carries the same
    /// generation it was stamped with.
    pub(crate) fn generation_matches(&self, id: &K, generation: u64) -> bool {
        self.slots
            .get(id)
            .is_some_and(|slot| slot.generation == generation)
    }

    pub(crate) fn dispose_root(&mut self, root: H::Root) {
        self.host.destroy_root(root);
    }

    pub(crate) fn node(&self, id: &K) -> Option<H::Node> {
        self.slots.get(id).map(|slot| slot.node.clone())
    }

    pub(crate) fn host(&self) -> &H {
        &self.host
    }

    pub(crate) fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}
