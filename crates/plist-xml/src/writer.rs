use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use plist_value::value::DATE_FORMAT;
use plist_value::{Item, Number};

const XML_HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
    <!DOCTYPE plist PUBLIC \"-//Apple//DTD PLIST 1.0//EN\" \
    \"http://www.apple.com/DTDs/PropertyList-1.0.dtd\">\n";

/// Serialises an item as a complete property-list XML document: header,
/// doctype, `<plist version="1.0">` wrapper, tab-indented body.
///
/// Dictionary pairs are written in their stored order. Writing never fails:
/// every item has an XML form.
pub fn write(item: &Item) -> String {
    let mut out = String::from(XML_HEADER);
    out.push_str("<plist version=\"1.0\">\n");
    write_item(&mut out, item, 0);
    out.push_str("</plist>\n");
    out
}

/// [`write`] as UTF-8 bytes, for handing straight to a file write.
pub fn write_document_bytes(item: &Item) -> Vec<u8> {
    write(item).into_bytes()
}

fn write_item(out: &mut String, item: &Item, depth: usize) {
    indent(out, depth);
    match item {
        Item::Array(array) => {
            if array.is_empty() {
                out.push_str("<array/>\n");
            } else {
                out.push_str("<array>\n");
                for element in array {
                    write_item(out, element, depth + 1);
                }
                indent(out, depth);
                out.push_str("</array>\n");
            }
        }
        Item::Dictionary(dictionary) => {
            if dictionary.is_empty() {
                out.push_str("<dict/>\n");
            } else {
                out.push_str("<dict>\n");
                for pair in dictionary.iter() {
                    indent(out, depth + 1);
                    out.push_str("<key>");
                    escape_into(out, &pair.key);
                    out.push_str("</key>\n");
                    write_item(out, &pair.value, depth + 1);
                }
                indent(out, depth);
                out.push_str("</dict>\n");
            }
        }
        Item::Boolean(true) => out.push_str("<true/>\n"),
        Item::Boolean(false) => out.push_str("<false/>\n"),
        Item::Data(data) => {
            out.push_str("<data>");
            out.push_str(&BASE64.encode(data));
            out.push_str("</data>\n");
        }
        Item::Date(date) => {
            out.push_str("<date>");
            out.push_str(&date.format(DATE_FORMAT).to_string());
            out.push_str("</date>\n");
        }
        Item::Number(number) => write_number(out, number),
        Item::String(string) => {
            out.push_str("<string>");
            escape_into(out, string);
            out.push_str("</string>\n");
        }
    }
}

// Integral numbers round-trip through <integer> so reading the output
// classifies them the same way the platform serialiser would.
fn write_number(out: &mut String, number: &Number) {
    match number.as_i64() {
        Some(integer) => {
            out.push_str("<integer>");
            out.push_str(&integer.to_string());
            out.push_str("</integer>\n");
        }
        None => {
            out.push_str("<real>");
            out.push_str(&number.value().to_string());
            out.push_str("</real>\n");
        }
    }
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push('\t');
    }
}

fn escape_into(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use plist_value::{Array, Dictionary};

    fn body(item: &Item) -> String {
        let document = write(item);
        let start = document.find("<plist version=\"1.0\">\n").unwrap()
            + "<plist version=\"1.0\">\n".len();
        let end = document.find("</plist>").unwrap();
        document[start..end].to_string()
    }

    #[test]
    fn document_carries_header_doctype_and_wrapper() {
        let document = write(&Item::Boolean(true));
        assert!(document.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"));
        assert!(document.contains("<!DOCTYPE plist PUBLIC \"-//Apple//DTD PLIST 1.0//EN\""));
        assert!(document.contains("<plist version=\"1.0\">\n"));
        assert!(document.ends_with("</plist>\n"));
    }

    #[test]
    fn single_pair_dictionary_renders_as_expected() {
        let mut dictionary = Dictionary::new();
        dictionary.push("A", Item::Boolean(true)).unwrap();
        assert_eq!(
            body(&Item::Dictionary(dictionary)),
            "<dict>\n\t<key>A</key>\n\t<true/>\n</dict>\n"
        );
    }

    #[test]
    fn empty_collections_self_close() {
        assert_eq!(body(&Item::Array(Array::new())), "<array/>\n");
        assert_eq!(body(&Item::Dictionary(Dictionary::new())), "<dict/>\n");
    }

    #[test]
    fn numbers_split_into_integer_and_real() {
        assert_eq!(
            body(&Item::Number(Number::from(-7))),
            "<integer>-7</integer>\n"
        );
        assert_eq!(body(&Item::Number(Number::new(2.5))), "<real>2.5</real>\n");
    }

    #[test]
    fn integral_values_beyond_i64_are_written_as_real() {
        let text = body(&Item::Number(Number::new(1e300)));
        assert!(text.starts_with("<real>"), "{text}");
        let text = body(&Item::Number(Number::new(-1e300)));
        assert!(text.starts_with("<real>"), "{text}");
    }

    #[test]
    fn leaves_render_their_canonical_text() {
        assert_eq!(
            body(&Item::Date(Utc.with_ymd_and_hms(2020, 6, 1, 12, 30, 15).unwrap())),
            "<date>2020-06-01T12:30:15Z</date>\n"
        );
        assert_eq!(
            body(&Item::Data(vec![0, 1, 2, 3])),
            "<data>AAECAw==</data>\n"
        );
        assert_eq!(
            body(&Item::String("a & <b>".into())),
            "<string>a &amp; &lt;b&gt;</string>\n"
        );
    }

    #[test]
    fn nesting_indents_with_tabs() {
        let mut inner = Dictionary::new();
        inner.push("k", Item::Number(Number::from(1))).unwrap();
        let item = Item::Array(vec![Item::Dictionary(inner)].into());
        assert_eq!(
            body(&item),
            "<array>\n\t<dict>\n\t\t<key>k</key>\n\t\t<integer>1</integer>\n\t</dict>\n</array>\n"
        );
    }
}
