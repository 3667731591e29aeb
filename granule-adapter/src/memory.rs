use alloc::vec::Vec;

use granule::{HostTree, ScopeKey};

/// Handle to a node in a [`MemoryHost`] slab.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(usize);

/// Handle to a rendering root in a [`MemoryHost`] slab.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RootId(usize);

struct NodeEntry<K> {
    anchor: Option<K>,
}

struct RootEntry {
    alive: bool,
}

/// Slab-backed in-memory host tree.
///
/// Stands in for a DOM container in tests and examples: nodes and roots are
/// slab indices, the attached container is an ordered `Vec`, and every
/// structural mutation of that container is counted so callers can assert
/// how much live-tree churn an operation caused.
pub struct MemoryHost<K, V> {
    nodes: Vec<NodeEntry<K>>,
    roots: Vec<RootEntry>,
    order: Vec<NodeId>,
    renders: Vec<(K, V)>,
    structural_ops: usize,
}

impl<K: ScopeKey, V: Clone> MemoryHost<K, V> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            roots: Vec::new(),
            order: Vec::new(),
            renders: Vec::new(),
            structural_ops: 0,
        }
    }

    /// Anchors of the attached nodes, in container order.
    pub fn attached_ids(&self) -> Vec<K> {
        self.order
            .iter()
            .filter_map(|node| self.nodes[node.0].anchor.clone())
            .collect()
    }

    pub fn is_attached(&self, id: &K) -> bool {
        self.node_by_anchor(id).is_some()
    }

    /// Number of structural mutations applied to the attached container.
    pub fn structural_ops(&self) -> usize {
        self.structural_ops
    }

    pub fn live_roots(&self) -> usize {
        self.roots.iter().filter(|root| root.alive).count()
    }

    pub fn destroyed_roots(&self) -> usize {
        self.roots.iter().filter(|root| !root.alive).count()
    }

    /// Every render that ran, in order.
    pub fn renders(&self) -> &[(K, V)] {
        &self.renders
    }

    pub fn render_count(&self, id: &K) -> usize {
        self.renders.iter().filter(|(k, _)| k == id).count()
    }

    /// Detaches the node carrying `id` without going through the engine, to
    /// simulate a host tree that drifted out of sync. Returns whether a node
    /// was detached. The engine degrades with a warning when it later fails
    /// to find the anchor.
    pub fn detach_node(&mut self, id: &K) -> bool {
        match self.node_by_anchor(id) {
            Some(node) => {
                self.order.retain(|n| *n != node);
                self.structural_ops += 1;
                true
            }
            None => false,
        }
    }
}

impl<K: ScopeKey, V: Clone> Default for MemoryHost<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: ScopeKey, V: Clone> HostTree<K, V> for MemoryHost<K, V> {
    type Node = NodeId;
    type Root = RootId;

    fn create_node(&mut self, _state: &V) -> NodeId {
        self.nodes.push(NodeEntry { anchor: None });
        NodeId(self.nodes.len() - 1)
    }

    fn set_anchor(&mut self, node: &NodeId, id: &K) {
        self.nodes[node.0].anchor = Some(id.clone());
    }

    fn node_by_anchor(&self, id: &K) -> Option<NodeId> {
        self.order
            .iter()
            .copied()
            .find(|node| self.nodes[node.0].anchor.as_ref() == Some(id))
    }

    fn insert_before(&mut self, node: &NodeId, reference: &NodeId) {
        self.order.retain(|n| n != node);
        match self.order.iter().position(|n| n == reference) {
            Some(at) => self.order.insert(at, *node),
            None => self.order.push(*node),
        }
        self.structural_ops += 1;
    }

    fn append(&mut self, node: &NodeId) {
        self.order.retain(|n| n != node);
        self.order.push(*node);
        self.structural_ops += 1;
    }

    fn append_all(&mut self, nodes: &[NodeId]) {
        // The whole batch lands as one structural mutation.
        self.order.extend_from_slice(nodes);
        self.structural_ops += 1;
    }

    fn remove(&mut self, node: &NodeId) {
        self.order.retain(|n| n != node);
        self.structural_ops += 1;
    }

    fn create_root(&mut self, _node: &NodeId) -> RootId {
        self.roots.push(RootEntry { alive: true });
        RootId(self.roots.len() - 1)
    }

    fn render(&mut self, _root: &mut RootId, id: &K, state: &V) {
        self.renders.push((id.clone(), state.clone()));
    }

    fn destroy_root(&mut self, root: RootId) {
        self.roots[root.0].alive = false;
    }
}
