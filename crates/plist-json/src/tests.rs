use chrono::{TimeZone, Utc};
use plist_value::{Dictionary, Item, Number};
use serde_json::json;

use crate::{Error, item_to_value, value_to_item};

#[test]
fn items_project_to_the_expected_json_shapes() {
    let mut dictionary = Dictionary::new();
    dictionary.push("flag", Item::Boolean(true)).unwrap();
    dictionary.push("count", Item::Number(Number::from(3))).unwrap();
    dictionary.push("ratio", Item::Number(Number::new(0.5))).unwrap();
    dictionary.push("blob", Item::Data(vec![0, 1, 2, 3])).unwrap();
    dictionary
        .push("when", Item::Date(Utc.with_ymd_and_hms(2020, 6, 1, 12, 30, 15).unwrap()))
        .unwrap();
    dictionary
        .push("list", Item::Array(vec![Item::String("x".into())].into()))
        .unwrap();

    let value = item_to_value(&Item::Dictionary(dictionary)).unwrap();
    assert_eq!(
        value,
        json!({
            "flag": true,
            "count": 3,
            "ratio": 0.5,
            "blob": "AAECAw==",
            "when": "2020-06-01T12:30:15Z",
            "list": ["x"],
        })
    );
}

#[test]
fn dictionary_order_survives_into_the_json_object() {
    let mut dictionary = Dictionary::new();
    for key in ["zeta", "alpha", "mu"] {
        dictionary.push(key, Item::Boolean(false)).unwrap();
    }
    let value = item_to_value(&Item::Dictionary(dictionary)).unwrap();
    let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, ["zeta", "alpha", "mu"]);
}

#[test]
fn integral_numbers_render_without_a_fraction() {
    let value = item_to_value(&Item::Number(Number::new(4.0))).unwrap();
    assert_eq!(serde_json::to_string(&value).unwrap(), "4");
}

#[test]
fn json_values_read_back_as_items() {
    let value = json!({
        "name": "demo",
        "on": false,
        "sizes": [1, 2.5],
    });
    let item = value_to_item(&value).unwrap();
    let Item::Dictionary(dictionary) = item else {
        panic!("expected dictionary");
    };
    assert_eq!(dictionary.pair(0).unwrap().value, Item::String("demo".into()));
    assert_eq!(dictionary.pair(1).unwrap().value, Item::Boolean(false));
    assert_eq!(
        dictionary.pair(2).unwrap().value,
        Item::Array(vec![Item::Number(Number::from(1)), Item::Number(Number::new(2.5))].into())
    );
}

#[test]
fn json_strings_stay_plain_strings() {
    // no date or data sniffing on the way back in
    let item = value_to_item(&json!("2020-06-01T12:30:15Z")).unwrap();
    assert_eq!(item, Item::String("2020-06-01T12:30:15Z".into()));
}

#[test]
fn null_is_rejected() {
    assert!(matches!(
        value_to_item(&serde_json::Value::Null),
        Err(Error::UnsupportedValue(_))
    ));
    assert!(matches!(
        value_to_item(&json!([1, null])),
        Err(Error::UnsupportedValue(_))
    ));
}
