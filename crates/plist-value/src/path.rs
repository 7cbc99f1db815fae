use core::fmt::{self, Display};

use crate::value::Item;

/// Ordered list of integer offsets locating a node relative to a root item.
///
/// Each step indexes an array element or a dictionary pair-value; the empty
/// path denotes the root itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct IndexPath(Vec<usize>);

impl IndexPath {
    /// The empty path, addressing the root.
    pub fn root() -> Self {
        IndexPath(Vec::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<usize> {
        self.0.get(position).copied()
    }

    pub fn first(&self) -> Option<usize> {
        self.0.first().copied()
    }

    pub fn last(&self) -> Option<usize> {
        self.0.last().copied()
    }

    /// The path of the addressed node's parent, or `None` at the root.
    pub fn parent(&self) -> Option<IndexPath> {
        let (_, rest) = self.0.split_last()?;
        Some(IndexPath(rest.to_vec()))
    }

    pub fn appending(&self, index: usize) -> IndexPath {
        let mut indexes = self.0.clone();
        indexes.push(index);
        IndexPath(indexes)
    }

    pub fn indexes(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }
}

impl From<Vec<usize>> for IndexPath {
    fn from(indexes: Vec<usize>) -> Self {
        IndexPath(indexes)
    }
}

impl FromIterator<usize> for IndexPath {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        IndexPath(iter.into_iter().collect())
    }
}

impl Display for IndexPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("root")?;
        for index in &self.0 {
            write!(f, ".{index}")?;
        }
        Ok(())
    }
}

impl Item {
    /// The item addressed by `path`.
    ///
    /// # Panics
    ///
    /// Panics on a non-empty path into a scalar or an out-of-range index;
    /// callers are expected to have validated the shape first.
    pub fn item_at<'a>(&'a self, path: &IndexPath) -> &'a Item {
        let mut item = self;
        for index in path.indexes() {
            item = match item {
                Item::Array(array) => array
                    .get(index)
                    .unwrap_or_else(|| panic!("index path {path} out of range")),
                Item::Dictionary(dictionary) => {
                    &dictionary
                        .pair(index)
                        .unwrap_or_else(|| panic!("index path {path} out of range"))
                        .value
                }
                _ => panic!("non-empty index path {path} into scalar item"),
            };
        }
        item
    }

    /// Returns a new root with the node at `path` replaced by `item`,
    /// rebuilding only the collections along the path. `self` is never
    /// mutated; an empty path replaces the whole item.
    ///
    /// # Panics
    ///
    /// Panics on a non-empty path into a scalar or an out-of-range index.
    pub fn with_item_at(&self, path: &IndexPath, item: Item) -> Item {
        self.replacing(path, 0, item)
    }

    fn replacing(&self, path: &IndexPath, position: usize, new_item: Item) -> Item {
        if position == path.len() {
            return new_item;
        }
        // position < len, checked above
        let index = path.get(position).unwrap_or_default();
        match self {
            Item::Array(array) => {
                let child = array
                    .get(index)
                    .unwrap_or_else(|| panic!("index path {path} out of range"));
                let replaced = child.replacing(path, position + 1, new_item);
                let mut array = array.clone();
                array.replace(index, replaced);
                Item::Array(array)
            }
            Item::Dictionary(dictionary) => {
                let pair = dictionary
                    .pair(index)
                    .unwrap_or_else(|| panic!("index path {path} out of range"));
                let replaced = pair.value.replacing(path, position + 1, new_item);
                let mut dictionary = dictionary.clone();
                dictionary.set_value(index, replaced);
                Item::Dictionary(dictionary)
            }
            _ => panic!("non-empty index path {path} into scalar item"),
        }
    }
}
