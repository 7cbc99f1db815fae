use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::NaiveDateTime;

use plist_value::value::DATE_FORMAT;
use plist_value::{Array, Dictionary, Item, Number};

use crate::error::InvalidDocument;

/// Parses a property-list XML document into an item, preserving dictionary
/// pair order exactly as encountered.
///
/// The whole read aborts with [`InvalidDocument`] on any unrecognised
/// element, malformed key/value pairing, duplicate dictionary key, or leaf
/// decode failure; no partial tree is ever returned.
pub fn read(source: &str) -> Result<Item, InvalidDocument> {
    let mut reader = Reader::new(source);
    reader.skip_misc();
    let (name, self_closing) = reader.read_start_tag()?;
    if name != "plist" {
        return Err(InvalidDocument::new(format!(
            "expected plist root element, found <{name}>"
        )));
    }
    if self_closing {
        return Err(InvalidDocument::new("plist element has no content"));
    }
    reader.skip_misc();
    let item = reader.read_item()?;
    reader.skip_misc();
    reader.read_end_tag("plist")?;
    reader.skip_misc();
    if !reader.at_end() {
        return Err(InvalidDocument::new("content after the plist element"));
    }
    Ok(item)
}

struct Reader<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(source: &'a str) -> Self {
        Reader { source, pos: 0 }
    }

    fn read_item(&mut self) -> Result<Item, InvalidDocument> {
        let (name, self_closing) = self.read_start_tag()?;
        match name.as_str() {
            "array" => {
                let mut array = Array::new();
                if !self_closing {
                    loop {
                        self.skip_misc();
                        if self.at_close_tag() {
                            break;
                        }
                        array.push(self.read_item()?);
                    }
                    self.read_end_tag("array")?;
                }
                Ok(Item::Array(array))
            }
            "dict" => {
                let mut dictionary = Dictionary::new();
                if !self_closing {
                    loop {
                        self.skip_misc();
                        if self.at_close_tag() {
                            break;
                        }
                        let (child, child_self_closing) = self.read_start_tag()?;
                        if child != "key" {
                            return Err(InvalidDocument::new(format!(
                                "expected <key> in dict, found <{child}>"
                            )));
                        }
                        let key = self.element_text("key", child_self_closing)?;
                        self.skip_misc();
                        if self.at_close_tag() || self.at_end() {
                            // odd child count: a key with no value
                            return Err(InvalidDocument::new(format!(
                                "dictionary key {key:?} has no value"
                            )));
                        }
                        let value = self.read_item()?;
                        dictionary.push(key, value).map_err(|collision| {
                            InvalidDocument::new(format!(
                                "duplicate dictionary key {:?}",
                                collision.key
                            ))
                        })?;
                    }
                    self.read_end_tag("dict")?;
                }
                Ok(Item::Dictionary(dictionary))
            }
            "data" => {
                let text = self.element_text("data", self_closing)?;
                let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
                let data = BASE64
                    .decode(compact.as_bytes())
                    .map_err(|_| InvalidDocument::new("malformed base64 in data element"))?;
                Ok(Item::Data(data))
            }
            "date" => {
                let text = self.element_text("date", self_closing)?;
                let date = NaiveDateTime::parse_from_str(text.trim(), DATE_FORMAT)
                    .map_err(|_| {
                        InvalidDocument::new(format!("malformed date text {:?}", text.trim()))
                    })?
                    .and_utc();
                Ok(Item::Date(date))
            }
            "integer" | "real" => {
                let text = self.element_text(&name, self_closing)?;
                let value: f64 = text
                    .trim()
                    .parse()
                    .ok()
                    .filter(|value: &f64| value.is_finite())
                    .ok_or_else(|| {
                        InvalidDocument::new(format!("malformed number text {:?}", text.trim()))
                    })?;
                Ok(Item::Number(Number::from(value)))
            }
            "true" | "false" => {
                // literal booleans are empty tags
                let text = self.element_text(&name, self_closing)?;
                if !text.is_empty() {
                    return Err(InvalidDocument::new(format!(
                        "boolean element <{name}> must be empty"
                    )));
                }
                Ok(Item::Boolean(name == "true"))
            }
            "string" => {
                let text = self.element_text("string", self_closing)?;
                Ok(Item::String(text))
            }
            _ => Err(InvalidDocument::new(format!(
                "unrecognized element <{name}>"
            ))),
        }
    }

    /// Text content of the current element up to its matching end tag, with
    /// entity references decoded. `self_closing` elements have empty text.
    fn element_text(&mut self, name: &str, self_closing: bool) -> Result<String, InvalidDocument> {
        if self_closing {
            return Ok(String::new());
        }
        let text = self.read_text()?;
        self.read_end_tag(name)?;
        Ok(text)
    }

    // Scanner primitives. The input is sliced at ASCII delimiters only, so
    // byte positions always fall on character boundaries.

    fn bytes(&self) -> &'a [u8] {
        self.source.as_bytes()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes().get(self.pos).copied()
    }

    fn starts_with(&self, prefix: &str) -> bool {
        self.bytes()[self.pos..].starts_with(prefix.as_bytes())
    }

    fn at_close_tag(&self) -> bool {
        self.starts_with("</")
    }

    /// Skips whitespace, comments, processing instructions and the doctype.
    /// Anything else (including stray text) is left for the caller to
    /// reject.
    fn skip_misc(&mut self) {
        loop {
            while matches!(self.peek(), Some(b) if b.is_ascii_whitespace()) {
                self.pos += 1;
            }
            if self.starts_with("<!--") {
                self.skip_until("-->");
            } else if self.starts_with("<?") {
                self.skip_until("?>");
            } else if self.starts_with("<!") {
                self.skip_until(">");
            } else {
                return;
            }
        }
    }

    fn skip_until(&mut self, terminator: &str) {
        match self.source[self.pos..].find(terminator) {
            Some(offset) => self.pos += offset + terminator.len(),
            // unterminated construct: land on the end, the next read fails
            None => self.pos = self.source.len(),
        }
    }

    fn read_name(&mut self) -> Result<String, InvalidDocument> {
        let start = self.pos;
        while matches!(
            self.peek(),
            Some(b) if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b':')
        ) {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(InvalidDocument::new("malformed tag"));
        }
        Ok(self.source[start..self.pos].to_string())
    }

    /// Reads `<name …>` or `<name …/>`, returning the element name and
    /// whether the tag was self-closing. Attributes are skipped.
    fn read_start_tag(&mut self) -> Result<(String, bool), InvalidDocument> {
        if self.peek() != Some(b'<') {
            return Err(InvalidDocument::new("expected an element"));
        }
        self.pos += 1;
        let name = self.read_name()?;
        loop {
            match self.peek() {
                None => return Err(InvalidDocument::new("unexpected end of input in tag")),
                Some(b'>') => {
                    self.pos += 1;
                    return Ok((name, false));
                }
                Some(b'/') if self.starts_with("/>") => {
                    self.pos += 2;
                    return Ok((name, true));
                }
                Some(quote @ (b'"' | b'\'')) => {
                    self.pos += 1;
                    while let Some(b) = self.peek() {
                        self.pos += 1;
                        if b == quote {
                            break;
                        }
                    }
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    fn read_end_tag(&mut self, name: &str) -> Result<(), InvalidDocument> {
        if !self.at_close_tag() {
            return Err(InvalidDocument::new(format!(
                "expected </{name}> closing tag"
            )));
        }
        self.pos += 2;
        let found = self.read_name()?;
        if found != name {
            return Err(InvalidDocument::new(format!(
                "mismatched closing tag: expected </{name}>, found </{found}>"
            )));
        }
        while matches!(self.peek(), Some(b) if b.is_ascii_whitespace()) {
            self.pos += 1;
        }
        if self.peek() != Some(b'>') {
            return Err(InvalidDocument::new(format!("malformed </{name}> tag")));
        }
        self.pos += 1;
        Ok(())
    }

    /// Raw character data up to the next `<`, with entities decoded.
    fn read_text(&mut self) -> Result<String, InvalidDocument> {
        let start = self.pos;
        while matches!(self.peek(), Some(b) if b != b'<') {
            self.pos += 1;
        }
        decode_entities(&self.source[start..self.pos])
    }
}

fn decode_entities(raw: &str) -> Result<String, InvalidDocument> {
    if !raw.contains('&') {
        return Ok(raw.to_string());
    }
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        let end = rest
            .find(';')
            .ok_or_else(|| InvalidDocument::new("unterminated entity reference"))?;
        let entity = &rest[1..end];
        match entity {
            "amp" => out.push('&'),
            "lt" => out.push('<'),
            "gt" => out.push('>'),
            "quot" => out.push('"'),
            "apos" => out.push('\''),
            _ => {
                let code = if let Some(hex) = entity.strip_prefix("#x").or_else(|| entity.strip_prefix("#X")) {
                    u32::from_str_radix(hex, 16).ok()
                } else if let Some(dec) = entity.strip_prefix('#') {
                    dec.parse().ok()
                } else {
                    None
                };
                let ch = code.and_then(char::from_u32).ok_or_else(|| {
                    InvalidDocument::new(format!("unknown entity reference &{entity};"))
                })?;
                out.push(ch);
            }
        }
        rest = &rest[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}
