/// The inbound boundary to the host UI layer.
///
/// The engine is UI-agnostic: everything it needs from a rendering framework
/// is a container it has exclusive write access to, nodes that can carry an
/// anchor tag and be repositioned among their siblings, and an independent,
/// disposable rendering root per node. A DOM adapter maps this onto elements
/// and framework roots; `granule-adapter` ships an in-memory implementation.
///
/// Contract notes:
/// - `create_node` returns a *detached* node; it only joins the container
///   through `append`, `append_all` or `insert_before`.
/// - The anchor tag set via `set_anchor` is the single source of truth for
///   "where is item X currently rendered"; `node_by_anchor` queries it within
///   this host's container only.
/// - `Node` is a cheap handle (like a DOM element reference): cloning it never
///   clones the underlying node.
pub trait HostTree<K, V> {
    /// Cheap, cloneable handle to a host-tree node.
    type Node: Clone;
    /// An independent rendering context bound to one node.
    type Root;

    fn create_node(&mut self, state: &V) -> Self::Node;
    fn set_anchor(&mut self, node: &Self::Node, id: &K);
    fn node_by_anchor(&self, id: &K) -> Option<Self::Node>;

    /// Inserts `node` into the container immediately before `reference`.
    fn insert_before(&mut self, node: &Self::Node, reference: &Self::Node);
    /// Appends `node` at the end of the container.
    fn append(&mut self, node: &Self::Node);
    /// Attaches a detached batch to the container.
    ///
    /// The default appends one by one; hosts with a fragment primitive should
    /// override this to attach the whole batch in a single structural
    /// mutation of the live tree.
    fn append_all(&mut self, nodes: &[Self::Node]) {
        for node in nodes {
            self.append(node);
        }
    }
    /// Detaches `node` from the container.
    fn remove(&mut self, node: &Self::Node);

    fn create_root(&mut self, node: &Self::Node) -> Self::Root;
    /// Renders the item's subtree into `root`.
    fn render(&mut self, root: &mut Self::Root, id: &K, state: &V);
    /// Destroys a rendering root whose node has already been detached.
    fn destroy_root(&mut self, root: Self::Root);
}
