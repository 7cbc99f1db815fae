use chrono::DateTime;

use crate::collections::{Array, Dictionary};
use crate::value::{Item, ItemKind, Number};

impl Item {
    /// Converts the item to `kind`, always producing some valid item of the
    /// target kind.
    ///
    /// Mapped pairs convert their value: array elements become fresh-keyed
    /// dictionary pairs and vice versa, booleans map to 1/0 and to
    /// `"true"`/`"false"`, dates map to whole seconds since the UTC epoch,
    /// numbers map to decimal text. Every unmapped pair (data to number,
    /// date to string, …) yields the default value of the target kind.
    pub fn converting(&self, kind: ItemKind) -> Item {
        if self.kind() == kind {
            return self.clone();
        }
        match (self, kind) {
            (Item::Array(array), ItemKind::Dictionary) => {
                let mut dictionary = Dictionary::new();
                for element in array {
                    let key = dictionary.unused_key();
                    // unused_key never returns a live key
                    let _ = dictionary.push(key, element.clone());
                }
                Item::Dictionary(dictionary)
            }
            (Item::Dictionary(dictionary), ItemKind::Array) => {
                let array: Array = dictionary.iter().map(|pair| pair.value.clone()).collect();
                Item::Array(array)
            }
            (Item::Boolean(boolean), ItemKind::Number) => {
                Item::Number(Number::from(if *boolean { 1 } else { 0 }))
            }
            (Item::Number(number), ItemKind::Boolean) => Item::Boolean(number.value() != 0.0),
            (Item::Boolean(boolean), ItemKind::String) => {
                Item::String(String::from(if *boolean { "true" } else { "false" }))
            }
            (Item::String(string), ItemKind::Boolean) => {
                let text = string.trim();
                Item::Boolean(text.eq_ignore_ascii_case("true") || text.eq_ignore_ascii_case("yes"))
            }
            (Item::Date(date), ItemKind::Number) => Item::Number(Number::from(date.timestamp())),
            (Item::Number(number), ItemKind::Date) => Item::Date(
                DateTime::from_timestamp(number.value() as i64, 0)
                    .unwrap_or(DateTime::UNIX_EPOCH),
            ),
            (Item::Number(number), ItemKind::String) => Item::String(number.to_string()),
            (Item::String(string), ItemKind::Number) => match string.trim().parse::<f64>() {
                // "inf" and "NaN" parse but have no document form
                Ok(value) if value.is_finite() => Item::Number(Number::from(value)),
                _ => ItemKind::Number.default_item(),
            },
            _ => kind.default_item(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    const ALL_KINDS: [ItemKind; 7] = [
        ItemKind::Array,
        ItemKind::Boolean,
        ItemKind::Data,
        ItemKind::Date,
        ItemKind::Dictionary,
        ItemKind::Number,
        ItemKind::String,
    ];

    #[test]
    fn conversion_is_total() {
        let mut dictionary = Dictionary::new();
        dictionary.push("a", Item::Boolean(true)).unwrap();
        let samples = [
            Item::Array(vec![Item::Boolean(true), Item::String("x".into())].into()),
            Item::Boolean(true),
            Item::Data(vec![1, 2, 3]),
            Item::Date(Utc.with_ymd_and_hms(2001, 1, 1, 0, 0, 0).unwrap()),
            Item::Dictionary(dictionary),
            Item::Number(Number::new(2.5)),
            Item::String("hello".into()),
        ];
        for item in &samples {
            for kind in ALL_KINDS {
                assert_eq!(item.converting(kind).kind(), kind, "{item} -> {kind}");
            }
        }
    }

    #[test]
    fn converting_to_the_same_kind_is_identity() {
        let item = Item::String("same".into());
        assert_eq!(item.converting(ItemKind::String), item);
    }

    #[test]
    fn array_to_dictionary_generates_fresh_keys() {
        let array: Array = vec![Item::Boolean(true), Item::Boolean(false)].into();
        let Item::Dictionary(dictionary) = Item::Array(array).converting(ItemKind::Dictionary)
        else {
            panic!("expected dictionary");
        };
        assert_eq!(dictionary.len(), 2);
        assert_eq!(dictionary.pair(0).unwrap().value, Item::Boolean(true));
        assert_eq!(dictionary.pair(1).unwrap().value, Item::Boolean(false));
        assert_ne!(dictionary.pair(0).unwrap().key, dictionary.pair(1).unwrap().key);
    }

    #[test]
    fn dictionary_to_array_keeps_values_in_order() {
        let mut dictionary = Dictionary::new();
        dictionary.push("b", Item::Number(Number::from(1))).unwrap();
        dictionary.push("a", Item::Number(Number::from(2))).unwrap();
        let converted = Item::Dictionary(dictionary).converting(ItemKind::Array);
        assert_eq!(
            converted,
            Item::Array(
                vec![Item::Number(Number::from(1)), Item::Number(Number::from(2))].into()
            )
        );
    }

    #[test]
    fn boolean_string_round_trip_is_identity() {
        for boolean in [true, false] {
            let text = Item::Boolean(boolean).converting(ItemKind::String);
            assert_eq!(text.converting(ItemKind::Boolean), Item::Boolean(boolean));
        }
        assert_eq!(
            Item::String("YES".into()).converting(ItemKind::Boolean),
            Item::Boolean(true)
        );
        assert_eq!(
            Item::String("no".into()).converting(ItemKind::Boolean),
            Item::Boolean(false)
        );
    }

    #[test]
    fn date_number_round_trip_in_seconds() {
        let date = Utc.with_ymd_and_hms(2020, 6, 1, 12, 30, 15).unwrap();
        let number = Item::Date(date).converting(ItemKind::Number);
        assert_eq!(number, Item::Number(Number::from(date.timestamp())));
        assert_eq!(number.converting(ItemKind::Date), Item::Date(date));
    }

    #[test]
    fn non_finite_number_text_falls_back_to_the_default() {
        for text in ["inf", "-inf", "NaN", "Infinity"] {
            assert_eq!(
                Item::String(text.into()).converting(ItemKind::Number),
                Item::Number(Number::from(0)),
                "{text}"
            );
        }
    }

    #[test]
    fn unmapped_pairs_fall_back_to_defaults() {
        assert_eq!(
            Item::Data(vec![1]).converting(ItemKind::Number),
            Item::Number(Number::from(0))
        );
        assert_eq!(
            Item::Date(DateTime::UNIX_EPOCH).converting(ItemKind::String),
            Item::String(String::new())
        );
        assert_eq!(
            Item::String("not a number".into()).converting(ItemKind::Number),
            Item::Number(Number::from(0))
        );
    }
}
