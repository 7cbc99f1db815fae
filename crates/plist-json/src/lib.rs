//! Lossy JSON projection of property-list items.
//!
//! JSON has no data, date or key-order-free dictionary distinctions, so the
//! mapping is deliberately asymmetric: [`item_to_value`] renders data as
//! base64 text and dates as their canonical timestamp text, and
//! [`value_to_item`] reads every JSON string back as a plain string item.
//! Round-tripping an item through JSON is therefore not identity; the XML
//! codec is the faithful one.

mod error;

pub use error::Error;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use plist_value::value::DATE_FORMAT;
use plist_value::{Dictionary, Item, Number};
use serde_json::Value as JsonValue;

pub fn item_to_value(item: &Item) -> Result<JsonValue, Error> {
    match item {
        Item::Array(array) => {
            let mut result = Vec::with_capacity(array.len());
            for element in array {
                result.push(item_to_value(element)?);
            }
            Ok(JsonValue::Array(result))
        }
        Item::Boolean(boolean) => Ok(JsonValue::Bool(*boolean)),
        Item::Data(data) => Ok(JsonValue::String(BASE64.encode(data))),
        Item::Date(date) => Ok(JsonValue::String(date.format(DATE_FORMAT).to_string())),
        Item::Dictionary(dictionary) => {
            let mut result = serde_json::Map::new();
            for pair in dictionary.iter() {
                result.insert(pair.key.clone(), item_to_value(&pair.value)?);
            }
            Ok(JsonValue::Object(result))
        }
        Item::Number(number) => convert_number(number),
        Item::String(string) => Ok(JsonValue::String(string.clone())),
    }
}

fn convert_number(number: &Number) -> Result<JsonValue, Error> {
    if let Some(integer) = number.as_i64() {
        return Ok(JsonValue::Number(integer.into()));
    }
    serde_json::Number::from_f64(number.value())
        .map(JsonValue::Number)
        .ok_or_else(|| Error::InvalidNumber(number.to_string()))
}

pub fn value_to_item(value: &JsonValue) -> Result<Item, Error> {
    match value {
        JsonValue::Null => Err(Error::UnsupportedValue(
            "null has no property-list form".to_string(),
        )),
        JsonValue::Bool(boolean) => Ok(Item::Boolean(*boolean)),
        JsonValue::Number(number) => {
            let value = number
                .as_f64()
                .ok_or_else(|| Error::UnsupportedValue(format!("number {number} overflows")))?;
            Ok(Item::Number(Number::new(value)))
        }
        JsonValue::String(string) => Ok(Item::String(string.clone())),
        JsonValue::Array(elements) => {
            let mut array = Vec::with_capacity(elements.len());
            for element in elements {
                array.push(value_to_item(element)?);
            }
            Ok(Item::Array(array.into()))
        }
        JsonValue::Object(object) => {
            let mut dictionary = Dictionary::new();
            for (key, value) in object {
                let item = value_to_item(value)?;
                // serde_json maps cannot hold duplicate keys
                let _ = dictionary.push(key.clone(), item);
            }
            Ok(Item::Dictionary(dictionary))
        }
    }
}

#[cfg(test)]
mod tests;
