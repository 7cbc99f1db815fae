//! Value model for property-list documents.
//!
//! An [`Item`] is one property-list value: a scalar (boolean, data, date,
//! number, string) or one of the two ordered collections ([`Array`],
//! [`Dictionary`]). Items are plain values with structural equality; editing
//! a nested node means building a new root that differs along one
//! [`IndexPath`] and swapping it in, which [`Item::with_item_at`] does with
//! copy-on-write sharing of the untouched subtrees.

/// The two ordered containers and their key-collision error.
pub mod collections;

/// Total conversions between item kinds.
pub mod convert;

/// Conversion contract for externally decoded object graphs.
pub mod object;

/// Integer index paths and get/set-by-path over an item tree.
pub mod path;

/// The item union, its kind tag, and the number scalar.
pub mod value;

pub use collections::{Array, Dictionary, DictionaryKeyCollision, KeyValuePair};
pub use object::{ConversionError, ObjectGraph};
pub use path::IndexPath;
pub use value::{Item, ItemKind, Number};
