use core::fmt::{self, Display};
use core::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};

use crate::collections::{Array, Dictionary};

/// Date text format shared by the XML codec and display output:
/// `yyyy-MM-dd'T'HH:mm:ss'Z'`, always UTC.
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// One property-list value.
///
/// The union is closed: every document is built from exactly these seven
/// cases. Assigning or cloning an item copies the whole logical subtree;
/// shared storage is never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Item {
    Array(Array),
    Boolean(bool),
    Data(Vec<u8>),
    Date(DateTime<Utc>),
    Dictionary(Dictionary),
    Number(Number),
    String(String),
}

/// The kind tag of an [`Item`], used to drive type conversions and UI type
/// menus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Array,
    Boolean,
    Data,
    Date,
    Dictionary,
    Number,
    String,
}

impl Item {
    pub fn kind(&self) -> ItemKind {
        match self {
            Item::Array(_) => ItemKind::Array,
            Item::Boolean(_) => ItemKind::Boolean,
            Item::Data(_) => ItemKind::Data,
            Item::Date(_) => ItemKind::Date,
            Item::Dictionary(_) => ItemKind::Dictionary,
            Item::Number(_) => ItemKind::Number,
            Item::String(_) => ItemKind::String,
        }
    }

    /// Whether the item is one of the two ordered containers.
    pub fn is_collection(&self) -> bool {
        matches!(self, Item::Array(_) | Item::Dictionary(_))
    }

    /// Element count for collections, zero for scalars.
    pub fn element_count(&self) -> usize {
        match self {
            Item::Array(array) => array.len(),
            Item::Dictionary(dictionary) => dictionary.len(),
            _ => 0,
        }
    }
}

impl ItemKind {
    /// The default value of the kind: empty collection, `false`, empty data,
    /// the UTC epoch, zero, or the empty string.
    pub fn default_item(self) -> Item {
        match self {
            ItemKind::Array => Item::Array(Array::new()),
            ItemKind::Boolean => Item::Boolean(false),
            ItemKind::Data => Item::Data(Vec::new()),
            ItemKind::Date => Item::Date(DateTime::UNIX_EPOCH),
            ItemKind::Dictionary => Item::Dictionary(Dictionary::new()),
            ItemKind::Number => Item::Number(Number::from(0)),
            ItemKind::String => Item::String(String::new()),
        }
    }
}

impl Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ItemKind::Array => "Array",
            ItemKind::Boolean => "Boolean",
            ItemKind::Data => "Data",
            ItemKind::Date => "Date",
            ItemKind::Dictionary => "Dictionary",
            ItemKind::Number => "Number",
            ItemKind::String => "String",
        };
        f.write_str(name)
    }
}

impl Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Array(array) => array.fmt(f),
            Item::Boolean(boolean) => f.write_str(if *boolean { "true" } else { "false" }),
            Item::Data(data) => write!(f, "<{} bytes>", data.len()),
            Item::Date(date) => write!(f, "{}", date.format(DATE_FORMAT)),
            Item::Dictionary(dictionary) => dictionary.fmt(f),
            Item::Number(number) => number.fmt(f),
            Item::String(string) => write!(f, "\"{string}\""),
        }
    }
}

/// A property-list number: one decimal value.
///
/// Wraps an `f64` with total equality and hashing so that items can be
/// compared and hashed structurally. `-0.0` is normalised to `0.0` on
/// construction; beyond that, equality is bit-for-bit.
#[derive(Debug, Clone, Copy)]
pub struct Number(f64);

impl Number {
    pub fn new(value: f64) -> Self {
        // -0.0 must compare and hash equal to 0.0
        Number(if value == 0.0 { 0.0 } else { value })
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Whether the value is exactly integral. Integral numbers are written
    /// as `integer` by the XML codec, everything else as `real`.
    pub fn is_integral(self) -> bool {
        self.0.is_finite() && self.0.trunc() == self.0
    }

    /// The value as an integer, when it is exactly integral and fits in
    /// `i64`. Integral magnitudes beyond that range stay decimal.
    pub fn as_i64(self) -> Option<i64> {
        // i64::MAX as f64 rounds up to 2^63, so the upper bound is strict
        let in_range = self.0 >= i64::MIN as f64 && self.0 < i64::MAX as f64;
        (self.is_integral() && in_range).then(|| self.0 as i64)
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for Number {}

impl Hash for Number {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::new(value)
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::new(value as f64)
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_i64() {
            Some(integer) => write!(f, "{integer}"),
            None => write!(f, "{}", self.0),
        }
    }
}
