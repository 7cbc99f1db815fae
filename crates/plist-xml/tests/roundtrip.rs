use chrono::{TimeZone, Utc};
use plist_value::{Dictionary, Item, ItemKind, Number};
use plist_xml::{read, write};

fn sample() -> Item {
    let mut server = Dictionary::new();
    server.push("host", Item::String("example.com".into())).unwrap();
    server.push("port", Item::Number(Number::from(8080))).unwrap();
    server.push("secure", Item::Boolean(true)).unwrap();

    let mut root = Dictionary::new();
    root.push("server", Item::Dictionary(server)).unwrap();
    root.push(
        "retries",
        Item::Array(vec![Item::Number(Number::from(1)), Item::Number(Number::new(1.5))].into()),
    )
    .unwrap();
    root.push("token", Item::Data(vec![0xde, 0xad, 0xbe, 0xef])).unwrap();
    root.push(
        "expires",
        Item::Date(Utc.with_ymd_and_hms(2030, 1, 2, 3, 4, 5).unwrap()),
    )
    .unwrap();
    root.push("note", Item::String("a < b & c".into())).unwrap();
    Item::Dictionary(root)
}

#[test]
fn written_documents_read_back_equal() {
    let item = sample();
    let document = write(&item);
    assert_eq!(read(&document).unwrap(), item);
}

#[test]
fn integral_values_beyond_i64_round_trip() {
    let item = Item::Number(Number::new(1e300));
    assert_eq!(read(&write(&item)).unwrap(), item);
}

#[test]
fn converted_number_items_always_have_a_readable_form() {
    // "inf" text converts to the default number, not an unwritable value
    let item = Item::String("inf".into()).converting(ItemKind::Number);
    assert_eq!(read(&write(&item)).unwrap(), item);
}

#[test]
fn round_trip_preserves_dictionary_order() {
    let mut dictionary = Dictionary::new();
    for key in ["zeta", "alpha", "mu"] {
        dictionary.push(key, Item::Boolean(false)).unwrap();
    }
    let item = Item::Dictionary(dictionary);
    let Item::Dictionary(read_back) = read(&write(&item)).unwrap() else {
        panic!("expected dictionary");
    };
    let keys: Vec<&str> = read_back.iter().map(|pair| pair.key.as_str()).collect();
    assert_eq!(keys, ["zeta", "alpha", "mu"]);
}
