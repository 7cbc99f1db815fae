use core::fmt::{self, Display};
use core::hash::{Hash, Hasher};
use std::sync::Arc;

use ahash::AHashSet;
use thiserror::Error;

use crate::value::Item;

/// A dictionary insert or rename targeted an already-present key.
///
/// Recoverable by contract: the edit is rejected and the caller surfaces the
/// collision, it never aborts the document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("dictionary already contains key {key:?}")]
pub struct DictionaryKeyCollision {
    pub key: String,
}

/// Ordered sequence of items. Order is significant; elements need not be
/// unique.
///
/// Storage is shared on clone and copied on first write, so rebuilding the
/// ancestors of an edited node does not copy untouched siblings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Array(Arc<Vec<Item>>);

impl Array {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.0.iter()
    }

    pub fn push(&mut self, item: Item) {
        Arc::make_mut(&mut self.0).push(item);
    }

    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert(&mut self, index: usize, item: Item) {
        Arc::make_mut(&mut self.0).insert(index, item);
    }

    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn replace(&mut self, index: usize, item: Item) {
        Arc::make_mut(&mut self.0)[index] = item;
    }

    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn remove(&mut self, index: usize) -> Item {
        Arc::make_mut(&mut self.0).remove(index)
    }
}

impl From<Vec<Item>> for Array {
    fn from(items: Vec<Item>) -> Self {
        Array(Arc::new(items))
    }
}

impl FromIterator<Item> for Array {
    fn from_iter<I: IntoIterator<Item = Item>>(iter: I) -> Self {
        Array(Arc::new(iter.into_iter().collect()))
    }
}

impl<'a> IntoIterator for &'a Array {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Display for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, item) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            item.fmt(f)?;
        }
        f.write_str("]")
    }
}

/// One `key: value` entry of a [`Dictionary`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyValuePair {
    pub key: String,
    pub value: Item,
}

impl KeyValuePair {
    pub fn new(key: impl Into<String>, value: Item) -> Self {
        KeyValuePair { key: key.into(), value }
    }

    pub fn with_key(&self, key: impl Into<String>) -> Self {
        KeyValuePair { key: key.into(), value: self.value.clone() }
    }

    pub fn with_value(&self, value: Item) -> Self {
        KeyValuePair { key: self.key.clone(), value }
    }
}

impl Display for KeyValuePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\": {}", self.key, self.value)
    }
}

#[derive(Debug, Clone, Default)]
struct DictionaryInner {
    pairs: Vec<KeyValuePair>,
    keys: AHashSet<String>,
}

/// Ordered sequence of key/value pairs with unique keys.
///
/// Pair order is insertion order and is never re-sorted; round-tripping a
/// hand-written document must reproduce its key order exactly, which is what
/// distinguishes this from a plain map.
#[derive(Debug, Clone, Default)]
pub struct Dictionary(Arc<DictionaryInner>);

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.pairs.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.keys.contains(key)
    }

    pub fn pair(&self, index: usize) -> Option<&KeyValuePair> {
        self.0.pairs.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, KeyValuePair> {
        self.0.pairs.iter()
    }

    /// Appends a pair. Fails without modifying the dictionary if `key` is
    /// already present.
    pub fn push(&mut self, key: impl Into<String>, value: Item) -> Result<(), DictionaryKeyCollision> {
        let index = self.len();
        self.insert(index, key, value)
    }

    /// Inserts a pair at `index`, shifting later pairs. Fails without
    /// modifying the dictionary if `key` is already present.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert(
        &mut self,
        index: usize,
        key: impl Into<String>,
        value: Item,
    ) -> Result<(), DictionaryKeyCollision> {
        let key = key.into();
        if self.contains_key(&key) {
            return Err(DictionaryKeyCollision { key });
        }
        let inner = Arc::make_mut(&mut self.0);
        inner.keys.insert(key.clone());
        inner.pairs.insert(index, KeyValuePair::new(key, value));
        Ok(())
    }

    /// Renames the pair at `index`. Renaming a pair to its own key is a
    /// no-op; renaming onto any other live key fails without modifying the
    /// dictionary.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn set_key(&mut self, index: usize, key: impl Into<String>) -> Result<(), DictionaryKeyCollision> {
        let key = key.into();
        if self.0.pairs[index].key == key {
            return Ok(());
        }
        if self.contains_key(&key) {
            return Err(DictionaryKeyCollision { key });
        }
        let inner = Arc::make_mut(&mut self.0);
        let pair = &mut inner.pairs[index];
        inner.keys.remove(&pair.key);
        inner.keys.insert(key.clone());
        pair.key = key;
        Ok(())
    }

    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn set_value(&mut self, index: usize, value: Item) {
        let inner = Arc::make_mut(&mut self.0);
        inner.pairs[index].value = value;
    }

    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn remove(&mut self, index: usize) -> KeyValuePair {
        let inner = Arc::make_mut(&mut self.0);
        let pair = inner.pairs.remove(index);
        inner.keys.remove(&pair.key);
        pair
    }

    /// Returns a key that is not present in the dictionary: `"New item"`,
    /// then `"New item 2"`, `"New item 3"`, …
    pub fn unused_key(&self) -> String {
        let mut key = String::from("New item");
        let mut counter = 1;
        while self.contains_key(&key) {
            counter += 1;
            key = format!("New item {counter}");
        }
        key
    }
}

impl PartialEq for Dictionary {
    fn eq(&self, other: &Self) -> bool {
        self.0.pairs == other.0.pairs
    }
}

impl Eq for Dictionary {}

impl Hash for Dictionary {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.pairs.hash(state);
    }
}

impl Display for Dictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, pair) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            pair.fmt(f)?;
        }
        f.write_str("]")
    }
}
