use plist_value::{IndexPath, Item};

/// A structural operation on the proxy node addressed by an edit's path,
/// applied after the item swap to keep node shape and element counts in
/// lockstep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeOperation {
    /// Insert a proxy child at the index, shifting later siblings by +1.
    InsertChild(usize),
    /// Remove the proxy child at the index, shifting later siblings by −1.
    RemoveChild(usize),
    /// Rebuild the proxy children of the child at the index.
    RegenerateChild(usize),
    /// Rebuild the proxy children of the addressed node itself.
    RegenerateAll,
}

impl NodeOperation {
    /// The operation that undoes this one: insert and remove swap,
    /// regeneration is its own inverse.
    pub fn inverted(self) -> NodeOperation {
        match self {
            NodeOperation::InsertChild(index) => NodeOperation::RemoveChild(index),
            NodeOperation::RemoveChild(index) => NodeOperation::InsertChild(index),
            NodeOperation::RegenerateChild(index) => NodeOperation::RegenerateChild(index),
            NodeOperation::RegenerateAll => NodeOperation::RegenerateAll,
        }
    }
}

/// One self-describing invocation of the mutation funnel: replace the item
/// at `path`, then perform `operation` on the node there.
///
/// Applying an edit yields its inverse (the prior item with the inverted
/// operation), which is what the undo stack stores.
#[derive(Debug, Clone, PartialEq)]
pub struct Edit {
    pub path: IndexPath,
    pub item: Item,
    pub operation: Option<NodeOperation>,
}

impl Edit {
    pub fn new(path: IndexPath, item: Item, operation: Option<NodeOperation>) -> Self {
        Edit { path, item, operation }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_remove_are_mutual_inverses() {
        assert_eq!(
            NodeOperation::InsertChild(3).inverted(),
            NodeOperation::RemoveChild(3)
        );
        assert_eq!(
            NodeOperation::RemoveChild(0).inverted(),
            NodeOperation::InsertChild(0)
        );
    }

    #[test]
    fn regeneration_is_self_inverse() {
        for operation in [NodeOperation::RegenerateChild(2), NodeOperation::RegenerateAll] {
            assert_eq!(operation.inverted(), operation);
            assert_eq!(operation.inverted().inverted(), operation);
        }
    }
}
