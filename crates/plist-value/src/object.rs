use core::fmt::{self, Display};

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::collections::{Array, Dictionary};
use crate::value::{Item, Number};

/// A decoded object graph produced by an external property-list
/// deserializer (binary or classic formats).
///
/// The graph is looser than [`Item`]: dictionary keys are arbitrary objects
/// and binary documents may carry `CF$UID` references, so converting to an
/// item can fail. The XML codec never goes through this type.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectGraph {
    Array(Vec<ObjectGraph>),
    Boolean(bool),
    Data(Vec<u8>),
    Date(DateTime<Utc>),
    Dictionary(Vec<(ObjectGraph, ObjectGraph)>),
    Integer(i64),
    Real(f64),
    String(String),
    Uid(u64),
}

/// Converting an externally decoded object graph to an item failed. The
/// caller may retry the document through an alternate decoder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("non-string dictionary key {key}")]
    NonStringDictionaryKey { key: String },
    #[error("unsupported object type {object}")]
    UnsupportedObjectType { object: String },
}

impl ObjectGraph {
    /// Converts the graph into an item. Fails on a non-string dictionary key
    /// or an object with no item representation; nothing partial is
    /// produced.
    pub fn to_item(&self) -> Result<Item, ConversionError> {
        match self {
            ObjectGraph::Array(elements) => {
                let mut array = Array::new();
                for element in elements {
                    array.push(element.to_item()?);
                }
                Ok(Item::Array(array))
            }
            ObjectGraph::Boolean(boolean) => Ok(Item::Boolean(*boolean)),
            ObjectGraph::Data(data) => Ok(Item::Data(data.clone())),
            ObjectGraph::Date(date) => Ok(Item::Date(*date)),
            ObjectGraph::Dictionary(pairs) => {
                let mut dictionary = Dictionary::new();
                for (key, value) in pairs {
                    let ObjectGraph::String(key) = key else {
                        return Err(ConversionError::NonStringDictionaryKey {
                            key: key.to_string(),
                        });
                    };
                    // a platform dictionary cannot hold duplicate keys; if a
                    // hand-built graph does anyway, the first pair wins
                    let _ = dictionary.push(key.clone(), value.to_item()?);
                }
                Ok(Item::Dictionary(dictionary))
            }
            ObjectGraph::Integer(value) => Ok(Item::Number(Number::from(*value))),
            ObjectGraph::Real(value) => Ok(Item::Number(Number::from(*value))),
            ObjectGraph::String(string) => Ok(Item::String(string.clone())),
            ObjectGraph::Uid(_) => Err(ConversionError::UnsupportedObjectType {
                object: self.to_string(),
            }),
        }
    }
}

impl Item {
    /// The object-graph representation of the item, for handing back to a
    /// platform serializer. Infallible: every item case has a graph case.
    pub fn to_object_graph(&self) -> ObjectGraph {
        match self {
            Item::Array(array) => {
                ObjectGraph::Array(array.iter().map(Item::to_object_graph).collect())
            }
            Item::Boolean(boolean) => ObjectGraph::Boolean(*boolean),
            Item::Data(data) => ObjectGraph::Data(data.clone()),
            Item::Date(date) => ObjectGraph::Date(*date),
            Item::Dictionary(dictionary) => ObjectGraph::Dictionary(
                dictionary
                    .iter()
                    .map(|pair| {
                        (
                            ObjectGraph::String(pair.key.clone()),
                            pair.value.to_object_graph(),
                        )
                    })
                    .collect(),
            ),
            Item::Number(number) => match number.as_i64() {
                Some(integer) => ObjectGraph::Integer(integer),
                None => ObjectGraph::Real(number.value()),
            },
            Item::String(string) => ObjectGraph::String(string.clone()),
        }
    }
}

impl Display for ObjectGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectGraph::Array(elements) => write!(f, "array of {} objects", elements.len()),
            ObjectGraph::Boolean(boolean) => boolean.fmt(f),
            ObjectGraph::Data(data) => write!(f, "{} bytes", data.len()),
            ObjectGraph::Date(date) => date.fmt(f),
            ObjectGraph::Dictionary(pairs) => write!(f, "dictionary of {} pairs", pairs.len()),
            ObjectGraph::Integer(value) => value.fmt(f),
            ObjectGraph::Real(value) => value.fmt(f),
            ObjectGraph::String(string) => write!(f, "{string:?}"),
            ObjectGraph::Uid(value) => write!(f, "CF$UID {value}"),
        }
    }
}
