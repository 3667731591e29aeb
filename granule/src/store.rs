use alloc::vec::Vec;

use crate::bus::SharedBus;
use crate::key::ScopeKey;
use crate::registry::ImperativeRegistry;
use crate::{ItemChannel, ListChannel, ListEvent, MovePayload, ScopeError, ScopeItem};

/// The ordered collection plus its mutation protocol.
///
/// All commits are synchronous and immediate: `items()` reflects every
/// completed call exactly. Commits do not broadcast by themselves; the scope
/// drives the mount coordinator and the buses around each commit so that
/// structural host work happens before external collaborators observe the
/// event (the same ordering subscribers get from registration order).
pub(crate) struct ScopeStore<K, V> {
    items: Vec<ScopeItem<K, V>>,
    list_bus: SharedBus<ListChannel, ListEvent<K, V>>,
    item_bus: SharedBus<ItemChannel<K>, V>,
    registry: ImperativeRegistry<K>,
}

impl<K: ScopeKey + 'static, V: 'static> ScopeStore<K, V> {
    pub(crate) fn new(items: Vec<ScopeItem<K, V>>) -> Self {
        Self {
            items,
            list_bus: SharedBus::new("granule.list"),
            item_bus: SharedBus::new("granule.item"),
            registry: ImperativeRegistry::new(),
        }
    }

    pub(crate) fn items(&self) -> &[ScopeItem<K, V>] {
        &self.items
    }

    pub(crate) fn index_of(&self, id: &K) -> Option<usize> {
        self.items.iter().position(|item| item.id == *id)
    }

    pub(crate) fn item(&self, id: &K) -> Option<&ScopeItem<K, V>> {
        self.items.iter().find(|item| item.id == *id)
    }

    pub(crate) fn has_item(&self, id: &K) -> bool {
        self.index_of(id).is_some()
    }

    /// Places the new item before `before_id` when that id is present; a
    /// missing target falls back to append (soft inconsistency), an existing
    /// `id` is a programmer error. Returns the insertion index.
    pub(crate) fn commit_insert(
        &mut self,
        id: K,
        data: V,
        before_id: Option<&K>,
    ) -> Result<usize, ScopeError<K>> {
        if self.has_item(&id) {
            return Err(ScopeError::DuplicateId(id));
        }
        let index = match before_id {
            Some(before) => match self.index_of(before) {
                Some(index) => index,
                None => {
                    gwarn!(before = ?before, "insert target not in scope; appending");
                    self.items.len()
                }
            },
            None => self.items.len(),
        };
        self.items.insert(index, ScopeItem::new(id, data));
        Ok(index)
    }

    /// Removes and returns the item, or `None` for an unknown id.
    pub(crate) fn commit_remove(&mut self, id: &K) -> Option<ScopeItem<K, V>> {
        let index = self.index_of(id)?;
        Some(self.items.remove(index))
    }

    /// Relocates `ids` as one block to just before `before_id` (or the end).
    ///
    /// The moved block keeps the items' original relative order regardless of
    /// the order the caller named them in. Removal walks indices from highest
    /// to lowest so earlier removals cannot invalidate later ones; the target
    /// index is then adjusted down by the number of removed items that sat
    /// before it.
    pub(crate) fn commit_move(
        &mut self,
        ids: &[K],
        before_id: Option<&K>,
    ) -> Result<MovePayload<K>, ScopeError<K>> {
        debug_assert!(!ids.is_empty(), "empty moves are filtered by the scope");

        let mut from_indexes = Vec::with_capacity(ids.len());
        for id in ids {
            let index = self
                .index_of(id)
                .ok_or_else(|| ScopeError::UnknownId(id.clone()))?;
            if from_indexes.contains(&index) {
                return Err(ScopeError::DuplicateMoveId(id.clone()));
            }
            from_indexes.push(index);
        }

        let target = match before_id {
            Some(before) => self
                .index_of(before)
                .ok_or_else(|| ScopeError::UnknownTarget(before.clone()))?,
            None => self.items.len(),
        };

        let mut descending = from_indexes.clone();
        descending.sort_unstable_by(|a, b| b.cmp(a));
        let mut block: Vec<ScopeItem<K, V>> = Vec::with_capacity(descending.len());
        for index in &descending {
            block.insert(0, self.items.remove(*index));
        }

        let removed_before_target = from_indexes.iter().filter(|&&i| i < target).count();
        let to_index = target - removed_before_target;
        for (offset, item) in block.into_iter().enumerate() {
            self.items.insert(to_index + offset, item);
        }

        Ok(MovePayload {
            ids: ids.to_vec(),
            before_id: before_id.cloned(),
            from_indexes,
            to_index,
        })
    }

    /// Replaces the item's state in place. Position is unaffected; the change
    /// is announced on the per-item update channel only.
    pub(crate) fn commit_update(&mut self, id: &K, data: V) -> Result<usize, ScopeError<K>> {
        let index = self
            .index_of(id)
            .ok_or_else(|| ScopeError::UnknownId(id.clone()))?;
        self.items[index].state = data;
        Ok(index)
    }

    pub(crate) fn clear_items(&mut self) {
        self.items.clear();
    }

    pub(crate) fn broadcast_list(&self, event: &ListEvent<K, V>) {
        self.list_bus.broadcast(&event.channel(), event);
    }

    pub(crate) fn broadcast_item(&self, channel: &ItemChannel<K>, state: &V) {
        self.item_bus.broadcast(channel, state);
    }

    /// Drops every handler on the item's update/mount/unmount channels.
    /// List-level channels are a separate bus and are never disturbed.
    pub(crate) fn clear_item_channels(&self, id: &K) {
        for channel in ItemChannel::all_for(id) {
            self.item_bus.clear(&channel);
        }
    }

    pub(crate) fn list_bus(&self) -> &SharedBus<ListChannel, ListEvent<K, V>> {
        &self.list_bus
    }

    pub(crate) fn item_bus(&self) -> &SharedBus<ItemChannel<K>, V> {
        &self.item_bus
    }

    pub(crate) fn registry(&self) -> &ImperativeRegistry<K> {
        &self.registry
    }

    pub(crate) fn registry_mut(&mut self) -> &mut ImperativeRegistry<K> {
        &mut self.registry
    }
}
