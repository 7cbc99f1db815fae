use plist_value::{Dictionary, DictionaryKeyCollision, IndexPath, Item, ItemKind};

use crate::edit::{Edit, NodeOperation};
use crate::tree::{NodeId, Tree};

/// One open document: a [`Tree`] plus explicit LIFO undo and redo stacks of
/// [`Edit`] values.
///
/// Every mutation goes through the [`Document::edit`] funnel, which records
/// the inverse edit before applying. Undo replays the recorded edit through
/// the same funnel, producing the redo edit for free. The stacks must be
/// consumed strictly LIFO; replaying a recorded edit against a tree that
/// has diverged through some other path is a caller-contract violation, not
/// a checked error.
#[derive(Debug, Default)]
pub struct Document {
    tree: Tree,
    undo_stack: Vec<Edit>,
    redo_stack: Vec<Edit>,
}

impl Document {
    /// A new document whose root item is an empty dictionary.
    pub fn new() -> Self {
        Self::with_root_item(Item::Dictionary(Dictionary::new()))
    }

    pub fn with_root_item(item: Item) -> Self {
        Document {
            tree: Tree::with_root(item),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Mutable tree access for the read-side proxy surface (child lookup
    /// materialises nodes). Structural edits must go through the document,
    /// or undo recording is bypassed.
    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// The mutation funnel: replaces the item at `path`, performs
    /// `operation` on the node there, and records the inverse on the undo
    /// stack. Any edit not arriving via undo/redo clears the redo stack.
    pub fn edit(&mut self, path: &IndexPath, item: Item, operation: Option<NodeOperation>) {
        self.redo_stack.clear();
        let inverse = self.apply(Edit::new(path.clone(), item, operation));
        self.undo_stack.push(inverse);
    }

    /// Replays the most recent edit's inverse. Returns `false` when there
    /// is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(edit) = self.undo_stack.pop() else {
            return false;
        };
        let inverse = self.apply(edit);
        self.redo_stack.push(inverse);
        true
    }

    /// Undo of the undo. Returns `false` when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(edit) = self.redo_stack.pop() else {
            return false;
        };
        let inverse = self.apply(edit);
        self.undo_stack.push(inverse);
        true
    }

    fn apply(&mut self, edit: Edit) -> Edit {
        let Edit { path, item, operation } = edit;
        let previous = self.tree.item_at(&path).clone();
        self.tree.set_item(&path, item);
        if let Some(operation) = operation {
            let node = self.tree.node_at(&path);
            match operation {
                NodeOperation::InsertChild(index) => self.tree.insert_child(node, index),
                NodeOperation::RemoveChild(index) => self.tree.remove_child(node, index),
                NodeOperation::RegenerateChild(index) => {
                    let child = self.tree.child(node, index);
                    self.tree.regenerate_children(child);
                }
                NodeOperation::RegenerateAll => self.tree.regenerate_children(node),
            }
        }
        Edit::new(path, previous, operation.map(NodeOperation::inverted))
    }

    // Composite edits. Each computes the new item for the mutated node's
    // parent (or the node itself) and funnels it through `edit`.

    /// Appends a default child (arrays: empty string element; dictionaries:
    /// fresh key with an empty string value) and returns its index.
    ///
    /// # Panics
    ///
    /// Panics if the node's item is not a collection.
    pub fn add_child(&mut self, node: NodeId) -> usize {
        let index = self.tree.item(node).element_count();
        self.insert_child(node, index);
        index
    }

    /// Inserts a default child at `index`.
    ///
    /// # Panics
    ///
    /// Panics if the node's item is not a collection or `index` is beyond
    /// the element count.
    pub fn insert_child(&mut self, node: NodeId, index: usize) {
        let path = self.tree.index_path(node);
        let new_item = match self.tree.item(node) {
            Item::Array(array) => {
                let mut array = array.clone();
                array.insert(index, Item::String(String::new()));
                Item::Array(array)
            }
            Item::Dictionary(dictionary) => {
                let mut dictionary = dictionary.clone();
                let key = dictionary.unused_key();
                // unused_key never returns a live key
                let _ = dictionary.insert(index, key, Item::String(String::new()));
                Item::Dictionary(dictionary)
            }
            item => panic!("cannot insert a child into {} item", item.kind()),
        };
        self.edit(&path, new_item, Some(NodeOperation::InsertChild(index)));
    }

    /// Removes the child at `index`.
    ///
    /// # Panics
    ///
    /// Panics if the node's item is not a collection or `index` is out of
    /// range.
    pub fn remove_child(&mut self, node: NodeId, index: usize) {
        let path = self.tree.index_path(node);
        let new_item = match self.tree.item(node) {
            Item::Array(array) => {
                let mut array = array.clone();
                array.remove(index);
                Item::Array(array)
            }
            Item::Dictionary(dictionary) => {
                let mut dictionary = dictionary.clone();
                dictionary.remove(index);
                Item::Dictionary(dictionary)
            }
            item => panic!("cannot remove a child from {} item", item.kind()),
        };
        self.edit(&path, new_item, Some(NodeOperation::RemoveChild(index)));
    }

    /// Replaces the node's item with a leaf value of the same shape. For
    /// edits that change the child count, use the structural composites.
    pub fn set_value(&mut self, node: NodeId, item: Item) {
        let path = self.tree.index_path(node);
        self.edit(&path, item, None);
    }

    /// Converts the node's item to `kind` (a total conversion) and rebuilds
    /// the node's proxy children, whose count and identity may be unrelated
    /// to the old shape.
    pub fn set_kind(&mut self, node: NodeId, kind: ItemKind) {
        if self.tree.item(node).kind() == kind {
            return;
        }
        let converted = self.tree.item(node).converting(kind);
        match self.tree.parent(node) {
            None => {
                self.edit(&IndexPath::root(), converted, Some(NodeOperation::RegenerateAll));
            }
            Some(parent) => {
                let index = self.tree.sibling_index(node);
                let parent_path = self.tree.index_path(parent);
                let new_parent = match self.tree.item(parent) {
                    Item::Array(array) => {
                        let mut array = array.clone();
                        array.replace(index, converted);
                        Item::Array(array)
                    }
                    Item::Dictionary(dictionary) => {
                        let mut dictionary = dictionary.clone();
                        dictionary.set_value(index, converted);
                        Item::Dictionary(dictionary)
                    }
                    // the node has a parent, so the parent is a collection
                    item => panic!("parent of a node is {} item", item.kind()),
                };
                self.edit(
                    &parent_path,
                    new_parent,
                    Some(NodeOperation::RegenerateChild(index)),
                );
            }
        }
    }

    /// Renames the dictionary pair at `index` of the node's item. A
    /// collision with a live key rejects the edit and records nothing.
    ///
    /// # Panics
    ///
    /// Panics if the node's item is not a dictionary or `index` is out of
    /// range.
    pub fn set_key(
        &mut self,
        node: NodeId,
        index: usize,
        key: impl Into<String>,
    ) -> Result<(), DictionaryKeyCollision> {
        let path = self.tree.index_path(node);
        let Item::Dictionary(dictionary) = self.tree.item(node) else {
            panic!("cannot rename a key of {} item", self.tree.item(node).kind());
        };
        let mut dictionary = dictionary.clone();
        dictionary.set_key(index, key)?;
        self.edit(&path, Item::Dictionary(dictionary), None);
        Ok(())
    }

    /// Inserts a `key: value` pair at `index` of the node's dictionary
    /// item. A collision with a live key rejects the edit and records
    /// nothing.
    ///
    /// # Panics
    ///
    /// Panics if the node's item is not a dictionary or `index` is beyond
    /// the pair count.
    pub fn insert_pair(
        &mut self,
        node: NodeId,
        index: usize,
        key: impl Into<String>,
        value: Item,
    ) -> Result<(), DictionaryKeyCollision> {
        let path = self.tree.index_path(node);
        let Item::Dictionary(dictionary) = self.tree.item(node) else {
            panic!("cannot insert a pair into {} item", self.tree.item(node).kind());
        };
        let mut dictionary = dictionary.clone();
        dictionary.insert(index, key, value)?;
        self.edit(
            &path,
            Item::Dictionary(dictionary),
            Some(NodeOperation::InsertChild(index)),
        );
        Ok(())
    }
}
