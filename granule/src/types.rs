use alloc::rc::Rc;
use alloc::vec::Vec;
use core::any::Any;

/// One tracked item: an opaque id plus host-owned state.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScopeItem<K, V> {
    pub id: K,
    pub state: V,
}

impl<K, V> ScopeItem<K, V> {
    pub fn new(id: K, state: V) -> Self {
        Self { id, state }
    }
}

/// Payload of a list insert event.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InsertPayload<K, V> {
    pub id: K,
    pub data: V,
    /// The target the caller asked for, even when placement fell back to
    /// append because the target was missing.
    pub before_id: Option<K>,
}

/// Payload of a list move event.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovePayload<K> {
    /// Moved ids in the order the caller named them.
    pub ids: Vec<K>,
    pub before_id: Option<K>,
    /// Index each moved id occupied before the move.
    pub from_indexes: Vec<usize>,
    /// Index at which the moved block was re-inserted.
    pub to_index: usize,
}

/// List-structural events, one tagged variant per operation.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ListEvent<K, V> {
    Insert(InsertPayload<K, V>),
    Delete(K),
    Move(MovePayload<K>),
}

impl<K, V> ListEvent<K, V> {
    pub fn channel(&self) -> ListChannel {
        match self {
            Self::Insert(_) => ListChannel::Insert,
            Self::Delete(_) => ListChannel::Delete,
            Self::Move(_) => ListChannel::Move,
        }
    }
}

/// Subscription key for the list-structural bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ListChannel {
    Insert,
    Delete,
    Move,
}

/// Subscription key for the per-item bus.
///
/// Every channel is scoped to one id so deleting an item can clear exactly its
/// handlers without disturbing any other channel.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ItemChannel<K> {
    Update(K),
    Mount(K),
    Unmount(K),
}

impl<K: Clone> ItemChannel<K> {
    pub(crate) fn all_for(id: &K) -> [Self; 3] {
        [
            Self::Update(id.clone()),
            Self::Mount(id.clone()),
            Self::Unmount(id.clone()),
        ]
    }
}

/// Read-only view of one live item's host presence.
pub struct ItemRef<N> {
    /// Handle to the item's tagged host-tree node.
    pub node: N,
    /// Capability object the item registered, if any.
    pub imperative: Option<Rc<dyn Any>>,
}

impl<N: core::fmt::Debug> core::fmt::Debug for ItemRef<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ItemRef")
            .field("node", &self.node)
            .field("imperative", &self.imperative.is_some())
            .finish()
    }
}
