use std::cell::OnceCell;

use plist_value::{Dictionary, IndexPath, Item};

/// Index of a proxy node in its [`Tree`]'s arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug)]
struct NodeData {
    parent: Option<NodeId>,
    /// Position within the parent's children; unused for the root.
    index: usize,
    /// Materialised lazily on first visit; `Some` length must equal the
    /// element count of the item at this node's path.
    children: Option<Vec<NodeId>>,
    /// Derived by walking parent links; taken whenever an ancestor's
    /// sibling index shifts.
    path: OnceCell<IndexPath>,
}

impl NodeData {
    fn new(parent: Option<NodeId>, index: usize) -> Self {
        NodeData { parent, index, children: None, path: OnceCell::new() }
    }
}

/// Single owner of one canonical root item plus the proxy node tree the UI
/// addresses.
///
/// Proxy nodes are identity-bearing handles; they store no item. A node's
/// item is always computed from its index path against the current root, so
/// it can never go stale. Nodes are created lazily on first visit, which is
/// why the child accessors take `&mut self`.
///
/// Structural edits must keep the two trees in lockstep: after every
/// successful mutation each materialised node has exactly as many children
/// as the item at its path has elements.
#[derive(Debug)]
pub struct Tree {
    root_item: Item,
    root: NodeId,
    nodes: Vec<NodeData>,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// An empty document: the root item is an empty dictionary.
    pub fn new() -> Self {
        Self::with_root(Item::Dictionary(Dictionary::new()))
    }

    pub fn with_root(root_item: Item) -> Self {
        Tree {
            root_item,
            root: NodeId(0),
            nodes: vec![NodeData::new(None, 0)],
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn root_item(&self) -> &Item {
        &self.root_item
    }

    /// The item at `path` in the canonical tree.
    ///
    /// # Panics
    ///
    /// Panics if `path` does not address a node (see
    /// [`Item::item_at`]).
    pub fn item_at<'a>(&'a self, path: &IndexPath) -> &'a Item {
        self.root_item.item_at(path)
    }

    /// Replaces the item at `path`. The new root is fully built off to the
    /// side and swapped in with a single assignment, so a reader never
    /// observes a partially rebuilt tree.
    pub fn set_item(&mut self, path: &IndexPath, item: Item) {
        let new_root = self.root_item.with_item_at(path, item);
        self.root_item = new_root;
    }

    /// The node's index path, derived from parent links and cached until an
    /// ancestor's sibling index shifts.
    pub fn index_path(&self, node: NodeId) -> IndexPath {
        self.data(node)
            .path
            .get_or_init(|| {
                let mut indexes = Vec::new();
                let mut current = node;
                while let Some(parent) = self.data(current).parent {
                    indexes.push(self.data(current).index);
                    current = parent;
                }
                indexes.reverse();
                IndexPath::from(indexes)
            })
            .clone()
    }

    /// The item the node addresses; computed, never cached.
    pub fn item(&self, node: NodeId) -> &Item {
        let path = self.index_path(node);
        self.root_item.item_at(&path)
    }

    pub fn is_expandable(&self, node: NodeId) -> bool {
        self.item(node).is_collection()
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.data(node).parent
    }

    /// The node's position within its parent.
    pub fn sibling_index(&self, node: NodeId) -> usize {
        self.data(node).index
    }

    pub fn child_count(&mut self, node: NodeId) -> usize {
        self.ensure_children(node);
        self.children(node).len()
    }

    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn child(&mut self, node: NodeId, index: usize) -> NodeId {
        self.ensure_children(node);
        self.children(node)[index]
    }

    /// Resolves `path` to a proxy node, materialising nodes along the way.
    ///
    /// # Panics
    ///
    /// Panics if `path` does not address a node.
    pub fn node_at(&mut self, path: &IndexPath) -> NodeId {
        let mut node = self.root;
        for index in path.indexes() {
            node = self.child(node, index);
        }
        node
    }

    /// Inserts a proxy child at `index`, shifting the indices of the
    /// children at `index` and after by +1.
    ///
    /// # Panics
    ///
    /// Panics if the node's item is not a collection or `index` is beyond
    /// the child list.
    pub fn insert_child(&mut self, node: NodeId, index: usize) {
        assert!(
            self.is_expandable(node),
            "structural insert on a node whose item is not a collection"
        );
        // never-visited children materialise from the current item, which
        // already reflects the insert
        if self.data(node).children.is_none() {
            self.ensure_children(node);
            return;
        }
        let child = self.create_node(node, index);
        self.children_mut(node).insert(index, child);
        self.reindex_children(node, index);
    }

    /// Removes the proxy child at `index`, shifting the indices of the
    /// children after it by −1. The removed subtree's arena slots stay
    /// behind unreferenced until the tree drops.
    ///
    /// # Panics
    ///
    /// Panics if the node's item is not a collection or `index` is out of
    /// range.
    pub fn remove_child(&mut self, node: NodeId, index: usize) {
        assert!(
            self.is_expandable(node),
            "structural remove on a node whose item is not a collection"
        );
        if self.data(node).children.is_none() {
            self.ensure_children(node);
            return;
        }
        self.children_mut(node).remove(index);
        self.reindex_children(node, index);
    }

    /// Discards the node's proxy children and rebuilds them from the
    /// current element count of its item. Required after an edit that
    /// changes collection-ness, where child count and identity may be
    /// unrelated to the old shape.
    pub fn regenerate_children(&mut self, node: NodeId) {
        self.data_mut(node).children = None;
        self.ensure_children(node);
    }

    fn data(&self, node: NodeId) -> &NodeData {
        &self.nodes[node.0]
    }

    fn data_mut(&mut self, node: NodeId) -> &mut NodeData {
        &mut self.nodes[node.0]
    }

    fn children(&self, node: NodeId) -> &[NodeId] {
        self.data(node).children.as_deref().unwrap_or(&[])
    }

    fn children_mut(&mut self, node: NodeId) -> &mut Vec<NodeId> {
        self.data_mut(node)
            .children
            .get_or_insert_with(Vec::new)
    }

    fn create_node(&mut self, parent: NodeId, index: usize) -> NodeId {
        self.nodes.push(NodeData::new(Some(parent), index));
        NodeId(self.nodes.len() - 1)
    }

    fn ensure_children(&mut self, node: NodeId) {
        if self.data(node).children.is_some() {
            return;
        }
        let count = self.item(node).element_count();
        let children: Vec<NodeId> = (0..count).map(|i| self.create_node(node, i)).collect();
        self.data_mut(node).children = Some(children);
    }

    /// Renumbers the children at `from` and after, and drops the cached
    /// paths of every node in their subtrees.
    fn reindex_children(&mut self, node: NodeId, from: usize) {
        let shifted: Vec<NodeId> = self.children(node).iter().copied().skip(from).collect();
        for (offset, child) in shifted.into_iter().enumerate() {
            self.data_mut(child).index = from + offset;
            self.invalidate_paths(child);
        }
    }

    fn invalidate_paths(&mut self, node: NodeId) {
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            let data = self.data_mut(id);
            data.path.take();
            if let Some(children) = &data.children {
                stack.extend(children.iter().copied());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plist_value::Array;

    fn sample_tree() -> Tree {
        let inner: Array = vec![Item::Boolean(true), Item::Boolean(false)].into();
        let mut root = Dictionary::new();
        root.push("list", Item::Array(inner)).unwrap();
        root.push("name", Item::String("sample".into())).unwrap();
        Tree::with_root(Item::Dictionary(root))
    }

    #[test]
    fn new_tree_has_an_empty_dictionary_root() {
        let mut tree = Tree::new();
        assert_eq!(tree.root_item(), &Item::Dictionary(Dictionary::new()));
        let root = tree.root();
        assert!(tree.is_expandable(root));
        assert_eq!(tree.child_count(root), 0);
    }

    #[test]
    fn node_items_are_computed_from_the_current_root() {
        let mut tree = sample_tree();
        let root = tree.root();
        let list = tree.child(root, 0);
        let first = tree.child(list, 0);
        assert_eq!(tree.item(first), &Item::Boolean(true));

        tree.set_item(&vec![0, 0].into(), Item::String("now a string".into()));
        // same proxy node, fresh item
        assert_eq!(tree.item(first), &Item::String("now a string".into()));
    }

    #[test]
    fn child_counts_mirror_element_counts() {
        let mut tree = sample_tree();
        let root = tree.root();
        assert_eq!(tree.child_count(root), 2);
        let list = tree.child(root, 0);
        assert_eq!(tree.child_count(list), 2);
        let name = tree.child(root, 1);
        assert_eq!(tree.child_count(name), 0);
        assert!(!tree.is_expandable(name));
    }

    #[test]
    fn insert_and_remove_shift_sibling_indices() {
        let mut tree = sample_tree();
        let root = tree.root();
        let list = tree.child(root, 0);
        let first = tree.child(list, 0);
        let second = tree.child(list, 1);
        assert_eq!(tree.index_path(second), vec![0, 1].into());

        let mut array: Array = vec![Item::Boolean(true), Item::Boolean(false)].into();
        array.insert(0, Item::String("inserted".into()));
        tree.set_item(&vec![0].into(), Item::Array(array));
        tree.insert_child(list, 0);

        assert_eq!(tree.child_count(list), 3);
        assert_eq!(tree.index_path(first), vec![0, 1].into());
        assert_eq!(tree.index_path(second), vec![0, 2].into());
        assert_eq!(tree.item(first), &Item::Boolean(true));

        let mut array: Array = match tree.item_at(&vec![0].into()) {
            Item::Array(array) => array.clone(),
            _ => unreachable!(),
        };
        array.remove(0);
        tree.set_item(&vec![0].into(), Item::Array(array));
        tree.remove_child(list, 0);

        assert_eq!(tree.child_count(list), 2);
        assert_eq!(tree.index_path(first), vec![0, 0].into());
        assert_eq!(tree.index_path(second), vec![0, 1].into());
    }

    #[test]
    fn regenerate_children_follows_collection_changes() {
        let mut tree = sample_tree();
        let root = tree.root();
        let list = tree.child(root, 0);
        assert_eq!(tree.child_count(list), 2);

        tree.set_item(&vec![0].into(), Item::Boolean(false));
        tree.regenerate_children(list);
        assert_eq!(tree.child_count(list), 0);

        tree.set_item(
            &vec![0].into(),
            Item::Array(vec![Item::Boolean(true)].into()),
        );
        tree.regenerate_children(list);
        assert_eq!(tree.child_count(list), 1);
    }

    #[test]
    fn node_at_resolves_paths() {
        let mut tree = sample_tree();
        let node = tree.node_at(&vec![0, 1].into());
        assert_eq!(tree.item(node), &Item::Boolean(false));
        assert_eq!(tree.node_at(&IndexPath::root()), tree.root());
    }

    #[test]
    #[should_panic(expected = "not a collection")]
    fn structural_insert_on_a_scalar_node_panics() {
        let mut tree = sample_tree();
        let root = tree.root();
        let name = tree.child(root, 1);
        tree.insert_child(name, 0);
    }
}
