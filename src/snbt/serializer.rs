//! Rendering tags back to SNBT text.

use crate::{Compound, Kind, List, NbtString, Value};

/// Serialize with the default options: spaced separators, one line.
pub fn to_string(value: &Value) -> String {
    Serializer::new().serialize(value)
}

/// Serialize with no optional whitespace at all.
pub fn to_string_compact(value: &Value) -> String {
    Serializer::compact().serialize(value)
}

/// Serialize with four-space indentation.
pub fn to_string_pretty(value: &Value) -> String {
    Serializer::indented("    ").serialize(value)
}

/// Configurable SNBT serializer.
///
/// Indentation expands compounds and lists whose element type is itself
/// an array, list or compound; scalar lists and arrays stay on one line
/// even when indenting. The quote character is chosen per string so that
/// no escaping is needed where possible, or forced with [`Serializer::quote`].
///
/// ```
/// use nbtkit::snbt::{self, Serializer};
///
/// let value = snbt::from_str("{label: \"it's here\"}").unwrap();
/// assert_eq!(snbt::to_string(&value), r#"{label: "it's here"}"#);
/// assert_eq!(Serializer::compact().serialize(&value), r#"{label:"it's here"}"#);
/// ```
pub struct Serializer {
    indentation: Option<String>,
    comma: &'static str,
    colon: &'static str,
    semicolon: &'static str,
    indent: String,
    previous_indent: String,
    quote: Option<char>,
}

impl Serializer {
    pub fn new() -> Serializer {
        Serializer {
            indentation: None,
            comma: ", ",
            colon: ": ",
            semicolon: "; ",
            indent: String::new(),
            previous_indent: String::new(),
            quote: None,
        }
    }

    pub fn compact() -> Serializer {
        Serializer {
            comma: ",",
            colon: ":",
            semicolon: ";",
            ..Serializer::new()
        }
    }

    pub fn indented(indentation: &str) -> Serializer {
        Serializer {
            indentation: Some(indentation.to_owned()),
            ..Serializer::new()
        }
    }

    /// Force every string to use the given quote character.
    pub fn quote(mut self, quote: char) -> Serializer {
        self.quote = Some(quote);
        self
    }

    /// Return the literal representation of a tag.
    pub fn serialize(&mut self, value: &Value) -> String {
        let mut out = String::new();
        self.write_value(value, &mut out);
        out
    }

    fn write_value(&mut self, value: &Value, out: &mut String) {
        match value {
            Value::Byte(v) => {
                out.push_str(itoa::Buffer::new().format(*v));
                out.push('b');
            }
            Value::Short(v) => {
                out.push_str(itoa::Buffer::new().format(*v));
                out.push('s');
            }
            Value::Int(v) => out.push_str(itoa::Buffer::new().format(*v)),
            Value::Long(v) => {
                out.push_str(itoa::Buffer::new().format(*v));
                out.push('L');
            }
            Value::Float(v) => {
                out.push_str(ryu::Buffer::new().format(*v));
                out.push('f');
            }
            Value::Double(v) => {
                out.push_str(ryu::Buffer::new().format(*v));
                out.push('d');
            }
            Value::String(v) => out.push_str(&self.escape_string(&v.to_text())),
            Value::ByteArray(v) => self.write_array(out, "B", v.iter().map(|n| {
                let mut s = itoa::Buffer::new().format(*n).to_owned();
                s.push('B');
                s
            })),
            Value::IntArray(v) => self.write_array(
                out,
                "I",
                v.iter().map(|n| itoa::Buffer::new().format(*n).to_owned()),
            ),
            Value::LongArray(v) => self.write_array(out, "L", v.iter().map(|n| {
                let mut s = itoa::Buffer::new().format(*n).to_owned();
                s.push('L');
                s
            })),
            Value::List(list) => self.write_list(list, out),
            Value::Compound(compound) => self.write_compound(compound, out),
        }
    }

    fn write_array(&self, out: &mut String, prefix: &str, items: impl Iterator<Item = String>) {
        out.push('[');
        out.push_str(prefix);
        out.push_str(self.semicolon);
        let mut first = true;
        for item in items {
            if !first {
                out.push_str(self.comma);
            }
            first = false;
            out.push_str(&item);
        }
        out.push(']');
    }

    fn push_depth(&mut self) -> (String, String) {
        let saved = (self.previous_indent.clone(), self.indent.clone());
        if let Some(indentation) = &self.indentation {
            self.previous_indent = self.indent.clone();
            self.indent.push_str(indentation);
        }
        saved
    }

    fn pop_depth(&mut self, saved: (String, String)) {
        self.previous_indent = saved.0;
        self.indent = saved.1;
    }

    fn write_list(&mut self, list: &List, out: &mut String) {
        // Lists of scalars stay on one line even when indenting.
        let expand = self.indentation.is_some()
            && !list.is_empty()
            && matches!(
                list.subtype(),
                Kind::ByteArray
                    | Kind::IntArray
                    | Kind::LongArray
                    | Kind::List(_)
                    | Kind::Compound
            );
        let saved = self.push_depth();

        out.push('[');
        if expand {
            out.push('\n');
            out.push_str(&self.indent);
        }
        let mut first = true;
        for item in list {
            if !first {
                out.push_str(self.comma);
                if expand {
                    out.push('\n');
                    out.push_str(&self.indent);
                }
            }
            first = false;
            self.write_value(item, out);
        }
        if expand {
            out.push('\n');
            out.push_str(&self.previous_indent);
        }
        out.push(']');

        self.pop_depth(saved);
    }

    fn write_compound(&mut self, compound: &Compound, out: &mut String) {
        let expand = self.indentation.is_some() && !compound.is_empty();
        let saved = self.push_depth();

        out.push('{');
        if expand {
            out.push('\n');
            out.push_str(&self.indent);
        }
        let mut first = true;
        for (key, item) in compound {
            if !first {
                out.push_str(self.comma);
                if expand {
                    out.push('\n');
                    out.push_str(&self.indent);
                }
            }
            first = false;
            out.push_str(&self.stringify_compound_key(key));
            out.push_str(self.colon);
            self.write_value(item, out);
        }
        if expand {
            out.push('\n');
            out.push_str(&self.previous_indent);
        }
        out.push('}');

        self.pop_depth(saved);
    }

    /// Escape the compound key if it can't be represented unquoted.
    fn stringify_compound_key(&self, key: &NbtString) -> String {
        let text = key.to_text();
        let unquoted = !text.is_empty()
            && text
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '+' | '-'));
        if unquoted {
            text.into_owned()
        } else {
            self.escape_string(&text)
        }
    }

    /// Return the escaped literal representation of a string. The quote
    /// is the forced one if set, otherwise whichever quote character the
    /// string does not already contain, preferring double quotes.
    fn escape_string(&self, string: &str) -> String {
        let quote = self.quote.unwrap_or_else(|| {
            match string.find(|c: char| c == '"' || c == '\'').map(|i| &string[i..i + 1]) {
                Some("\"") => '\'',
                Some(_) => '"',
                None => '"',
            }
        });

        let mut result = String::with_capacity(string.len() + 2);
        result.push(quote);
        for c in string.chars() {
            if c == '\\' || c == quote {
                result.push('\\');
            }
            result.push(c);
        }
        result.push(quote);
        result
    }
}

impl Default for Serializer {
    fn default() -> Self {
        Serializer::new()
    }
}
